//! Schema of `config.json`.
//!
//! Keys mirror the command-line flags of `nexacroDeployExecute`, so the
//! struct fields are renamed onto them.

use serde::{Deserialize, Deserializer, Serialize};

/// Raw deploy configuration as read from disk.
///
/// Every value is optional at this stage; [`super::ResolvedConfig`] enforces
/// which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Deploy executable
    #[serde(rename = "nexacroDeployExecute", default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Project file (`.xprj`)
    #[serde(rename = "-P", default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Build path
    #[serde(rename = "-B", default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,

    /// Generation rule path
    #[serde(rename = "-GENERATERULE", default, skip_serializing_if = "Option::is_none")]
    pub generate_rule: Option<String>,

    /// Primary output base
    #[serde(rename = "-O", default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Secondary output base
    #[serde(rename = "-D", default, skip_serializing_if = "Option::is_none")]
    pub secondary_output: Option<String>,

    /// Directory holding `typedefinition.xml` (or a file inside it)
    #[serde(rename = "-F", default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    #[serde(rename = "-COMPRESS", default, deserialize_with = "literal_true")]
    pub compress: bool,

    #[serde(rename = "-SHRINK", default, deserialize_with = "literal_true")]
    pub shrink: bool,
}

/// Either a boolean or any other value; only a boolean `true` enables a switch.
#[derive(Deserialize)]
#[serde(untagged)]
enum Switch {
    Bool(bool),
    Other(serde::de::IgnoredAny),
}

fn literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Switch::deserialize(deserializer)?, Switch::Bool(true)))
}
