//! Deploy coordination: target resolution, file collection, and the
//! two-phase invocation sequence.

pub mod cleanup;
pub mod collect;
pub mod command;
pub mod orchestrator;
pub mod relocate;
pub mod runner;
pub mod targets;

pub use cleanup::{CleanupReport, cleanup_dirs, cleanup_order};
pub use collect::{DEPLOYABLE_EXTENSIONS, FileCollector, FileMap};
pub use command::{CommandTemplate, CommandTemplateBuilder, DeployInvocation};
pub use orchestrator::{DeployPass, DeployReport, Orchestrator};
pub use relocate::{ARTIFACT_EXTENSIONS, RelocationReport, relocate_artifacts};
pub use runner::{ProcessRunner, SystemRunner};
pub use targets::{TargetMap, TargetResolver};
