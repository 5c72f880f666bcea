//! Discovery of agent configuration files under a package root

pub mod scanner;

pub use scanner::{locate_targets, TargetScanner};
