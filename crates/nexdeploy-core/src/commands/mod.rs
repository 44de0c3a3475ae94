//! High-level commands for nexdeploy operations.
//!
//! These are the entry points the CLI calls; each one owns its options and
//! returns a report with the process exit code it maps to.

pub mod deploy;
pub mod search;

pub use deploy::{DeployCommand, DeployOptions, DeployOutcome};
pub use search::{SearchCommand, SearchCommandOptions, SearchReport};
