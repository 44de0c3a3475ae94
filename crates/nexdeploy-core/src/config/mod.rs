//! Deploy configuration
//!
//! `config.json` (or a `.toml` file with the same keys) names the deploy
//! executable, the project, and the output bases. Relative values are
//! resolved against the directory of the configuration file.

pub mod parser;
pub mod resolve;
pub mod schema;

pub use parser::{ConfigFormat, load_config, parse_config_str};
pub use resolve::{DOCUMENT_FILE_NAME, ResolvedConfig, resolve_config_value};
pub use schema::DeployConfig;
