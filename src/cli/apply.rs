//! Run controller
//!
//! Drives a run through its stages strictly in order:
//! loading overrides, discovering targets, updating XML descriptors, then
//! updating properties files. The first error ends the run.

use anyhow::{Context, Result};
use std::fmt;
use tracing::{debug, info};

use super::report;
use crate::config::{load_overrides, RunConfig};
use crate::domain::FileUpdate;
use crate::scan::locate_targets;
use crate::update::{update_properties_file, update_xml_file};

/// Stage of a run, used to label progress and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Discovering,
    UpdatingXml,
    UpdatingProperties,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Loading => "loading overrides",
            Stage::Discovering => "discovering target files",
            Stage::UpdatingXml => "updating XML descriptors",
            Stage::UpdatingProperties => "updating properties files",
            Stage::Done => "done",
        };
        f.write_str(label)
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_changed: usize,
    pub files_written: usize,
    pub changes: usize,
}

impl RunSummary {
    fn record(&mut self, update: &FileUpdate) {
        self.files_processed += 1;
        self.changes += update.changes.len();
        if update.is_changed() {
            self.files_changed += 1;
        }
        if update.written {
            self.files_written += 1;
        }
    }
}

/// Execute one run and print its change report.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    report::print_run_header(config.simulate);

    let mut stage = Stage::Loading;
    debug!(%stage, input = %config.input_path.display());
    let overrides = load_overrides(&config.input_path).with_context(|| format!("{stage} failed"))?;

    stage = Stage::Discovering;
    debug!(%stage, root = %config.package_path.display());
    let targets = locate_targets(&config.package_path).with_context(|| format!("{stage} failed"))?;
    if targets.is_empty() {
        tracing::warn!("No target files found under {}", config.package_path.display());
    }

    let mut summary = RunSummary::default();

    stage = Stage::UpdatingXml;
    debug!(%stage, files = targets.xml.len());
    for path in &targets.xml {
        let update = update_xml_file(path, &overrides, config.simulate)
            .with_context(|| format!("{stage} failed"))?;
        report::print_file_banner(path);
        report::print_xml_changes(&update);
        summary.record(&update);
    }

    stage = Stage::UpdatingProperties;
    debug!(%stage, files = targets.properties.len());
    for path in &targets.properties {
        let update = update_properties_file(path, &overrides, config.simulate)
            .with_context(|| format!("{stage} failed"))?;
        report::print_file_banner(path);
        report::print_properties_changes(&update);
        summary.record(&update);
    }

    stage = Stage::Done;
    info!(
        %stage,
        simulate = config.simulate,
        files = summary.files_processed,
        changed = summary.files_changed,
        written = summary.files_written,
        changes = summary.changes,
        "Run complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdateError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const XML: &str = "<controller-info>\n  <!-- key -->\n  <accountAccessKey>OLDKEY</accountAccessKey>\n</controller-info>\n";
    const PROPS: &str = "account-access-key=OLD1\naccount-access-key=OLD2\n";

    fn package(tmp: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let root = tmp.path().join("pkg");
        let conf = root.join("agent/conf");
        fs::create_dir_all(&conf).expect("mkdir");
        fs::write(conf.join("controller-info.xml"), XML).expect("write xml");
        fs::write(conf.join("analytics-agent.properties"), PROPS).expect("write props");

        let input = tmp.path().join("update-package.properties");
        fs::write(&input, "accountAccessKey=NEWKEY\naccount-access-key=NEWKEY\n")
            .expect("write input");
        (root, input)
    }

    fn read(root: &Path, name: &str) -> String {
        fs::read_to_string(root.join("agent/conf").join(name)).expect("read target")
    }

    #[test]
    fn test_run_applies_overrides() {
        let tmp = TempDir::new().expect("tmp");
        let (root, input) = package(&tmp);

        let summary = run(&RunConfig::new(&root).input_path(&input)).expect("run");

        assert_eq!(
            summary,
            RunSummary { files_processed: 2, files_changed: 2, files_written: 2, changes: 2 }
        );
        assert!(read(&root, "controller-info.xml")
            .contains("<accountAccessKey>NEWKEY</accountAccessKey>"));
        assert_eq!(
            read(&root, "analytics-agent.properties"),
            "account-access-key=NEWKEY\naccount-access-key=OLD2\n"
        );
    }

    #[test]
    fn test_simulated_run_writes_nothing() {
        let tmp = TempDir::new().expect("tmp");
        let (root, input) = package(&tmp);

        let summary = run(&RunConfig::new(&root).input_path(&input).simulate(true)).expect("run");

        assert_eq!(summary.changes, 2);
        assert_eq!(summary.files_written, 0);
        assert_eq!(read(&root, "controller-info.xml"), XML);
        assert_eq!(read(&root, "analytics-agent.properties"), PROPS);
    }

    #[test]
    fn test_missing_input_aborts_before_discovery() {
        let tmp = TempDir::new().expect("tmp");
        let (root, _) = package(&tmp);

        let err = run(&RunConfig::new(&root).input_path(tmp.path().join("absent.properties")))
            .unwrap_err();

        assert_eq!(err.to_string(), "loading overrides failed");
        assert!(matches!(
            err.downcast_ref::<UpdateError>(),
            Some(UpdateError::ConfigRead { .. })
        ));
        assert_eq!(read(&root, "controller-info.xml"), XML);
    }

    #[test]
    fn test_invalid_root_is_reported() {
        let tmp = TempDir::new().expect("tmp");
        let (_, input) = package(&tmp);

        let err = run(&RunConfig::new(tmp.path().join("missing")).input_path(&input)).unwrap_err();

        assert_eq!(err.to_string(), "discovering target files failed");
        assert!(matches!(
            err.downcast_ref::<UpdateError>(),
            Some(UpdateError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn test_malformed_xml_aborts_run() {
        let tmp = TempDir::new().expect("tmp");
        let (root, input) = package(&tmp);
        fs::write(root.join("agent/conf/controller-info.xml"), "<controller-info>").expect("write");

        let err = run(&RunConfig::new(&root).input_path(&input)).unwrap_err();

        assert_eq!(err.to_string(), "updating XML descriptors failed");
        assert!(matches!(
            err.downcast_ref::<UpdateError>(),
            Some(UpdateError::MalformedDocument { .. })
        ));
        assert_eq!(read(&root, "analytics-agent.properties"), PROPS);
    }
}
