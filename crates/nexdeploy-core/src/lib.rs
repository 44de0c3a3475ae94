//! nexdeploy Core Library
//!
//! Finds the relative module paths declared in the `<Services>` block of a
//! Nexacro `typedefinition.xml`, resolves them into deploy targets and source
//! file sets, and drives `nexacroDeployExecute` against every target.

pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod paths;
pub mod scan;
pub mod search;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{DeployConfig, ResolvedConfig, load_config};

    // Scanning
    pub use crate::scan::{DecodeOptions, DecodePolicy, ScanOptions, ScanOutcome, ServiceBlockScanner};

    // Deployment
    pub use crate::deploy::{
        CommandTemplate, DeployInvocation, DeployPass, DeployReport, FileCollector,
        Orchestrator, ProcessRunner, SystemRunner, TargetMap, TargetResolver,
    };

    // Commands
    pub use crate::commands::{
        DeployCommand, DeployOptions, DeployOutcome, SearchCommand, SearchCommandOptions,
        SearchReport,
    };

    // Errors
    pub use crate::error::{Error, Result};
}
