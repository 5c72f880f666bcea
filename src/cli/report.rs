//! Console change report.
//!
//! Headers and XML changes go to stdout; properties changes go to stderr,
//! as the agent tooling this replaces did.

use crate::domain::FileUpdate;
use std::path::Path;

pub fn print_run_header(simulate: bool) {
    if simulate {
        println!("During an actual run, the following updates will be applied:");
    } else {
        println!("The following updates are applied:");
    }
}

pub fn print_file_banner(path: &Path) {
    println!("\n******** {}", path.display());
}

pub fn print_xml_changes(update: &FileUpdate) {
    for change in &update.changes {
        println!("{}", change);
    }
}

pub fn print_properties_changes(update: &FileUpdate) {
    for change in &update.changes {
        eprintln!("{}", change);
    }
}
