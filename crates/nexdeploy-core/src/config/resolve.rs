//! Validation and path resolution of a loaded [`DeployConfig`].

use std::path::{Path, PathBuf};

use super::DeployConfig;
use crate::paths::{absolutize, normalize};
use crate::{Error, Result};

/// File name of the definition document inside the document directory.
pub const DOCUMENT_FILE_NAME: &str = "typedefinition.xml";

/// Configuration with required values checked and every path made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub executable: PathBuf,
    pub project: PathBuf,
    pub build: PathBuf,
    pub generate_rule: PathBuf,
    pub output_base: PathBuf,
    pub secondary_base: Option<PathBuf>,
    pub document_dir: PathBuf,
    pub compress: bool,
    pub shrink: bool,
}

impl ResolvedConfig {
    /// Validate `config` and resolve its paths against `config_path`'s directory.
    pub fn resolve(config: &DeployConfig, config_path: &Path) -> Result<Self> {
        let config_path = absolutize(config_path).map_err(|e| Error::io(config_path, e))?;
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        let resolve = |value: &str| resolve_config_value(&config_dir, value);

        let executable = resolve(required(&config.executable, "nexacroDeployExecute")?);
        let project = resolve(required(&config.project, "-P")?);
        let build = resolve(required(&config.build, "-B")?);
        let generate_rule = resolve(required(&config.generate_rule, "-GENERATERULE")?);
        let output_base = resolve(required(&config.output, "-O")?);
        let secondary_base = optional(&config.secondary_output).map(resolve);

        let document_dir = match optional(&config.document) {
            Some(value) => {
                let path = resolve(value);
                if path.is_file() {
                    parent_dir(&path)
                } else {
                    path
                }
            }
            None => parent_dir(&project),
        };

        Ok(Self {
            executable,
            project,
            build,
            generate_rule,
            output_base,
            secondary_base,
            document_dir,
            compress: config.compress,
            shrink: config.shrink,
        })
    }

    /// Path of `typedefinition.xml`.
    pub fn document_path(&self) -> PathBuf {
        self.document_dir.join(DOCUMENT_FILE_NAME)
    }

    /// Directory the tokens' leading `../` addresses.
    pub fn source_base(&self) -> PathBuf {
        parent_dir(&self.document_dir)
    }

    /// Output bases in pass order: primary, then secondary.
    pub fn output_bases(&self) -> Vec<PathBuf> {
        let mut bases = vec![self.output_base.clone()];
        if let Some(secondary) = &self.secondary_base {
            bases.push(secondary.clone());
        }
        bases
    }
}

/// Absolute values are normalized; relative ones are joined onto `config_dir`.
pub fn resolve_config_value(config_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value.trim());
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&config_dir.join(path))
    }
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    optional(value)
        .ok_or_else(|| Error::config(format!("\"{key}\" is missing or invalid in config")))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> DeployConfig {
        DeployConfig {
            executable: Some("tools/deploy.exe".to_string()),
            project: Some("app/nexacroCom/app.xprj".to_string()),
            build: Some("/opt/nexacro/build".to_string()),
            generate_rule: Some("rules".to_string()),
            output: Some("../out".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn relative_values_resolve_against_config_dir() {
        let resolved =
            ResolvedConfig::resolve(&base_config(), Path::new("/work/cfg/config.json")).unwrap();

        assert_eq!(resolved.executable, PathBuf::from("/work/cfg/tools/deploy.exe"));
        assert_eq!(resolved.build, PathBuf::from("/opt/nexacro/build"));
        assert_eq!(resolved.output_base, PathBuf::from("/work/out"));
        assert_eq!(
            resolved.document_dir,
            PathBuf::from("/work/cfg/app/nexacroCom")
        );
        assert_eq!(resolved.source_base(), PathBuf::from("/work/cfg/app"));
        assert_eq!(
            resolved.document_path(),
            PathBuf::from("/work/cfg/app/nexacroCom/typedefinition.xml")
        );
        assert_eq!(resolved.output_bases(), vec![PathBuf::from("/work/out")]);
    }

    #[test]
    fn blank_required_value_is_a_config_error() {
        let mut config = base_config();
        config.build = Some("   ".to_string());
        let err = ResolvedConfig::resolve(&config, Path::new("/work/config.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("\"-B\""));
    }

    #[test]
    fn document_dir_prefers_f_value() {
        let mut config = base_config();
        config.document = Some("/srv/project/main".to_string());
        config.secondary_output = Some("mirror".to_string());
        let resolved = ResolvedConfig::resolve(&config, Path::new("/work/config.json")).unwrap();

        assert_eq!(resolved.document_dir, PathBuf::from("/srv/project/main"));
        assert_eq!(
            resolved.output_bases(),
            vec![PathBuf::from("/out"), PathBuf::from("/work/mirror")]
        );
    }

    #[test]
    fn blank_secondary_is_ignored() {
        let mut config = base_config();
        config.secondary_output = Some(String::new());
        let resolved = ResolvedConfig::resolve(&config, Path::new("/work/config.json")).unwrap();
        assert!(resolved.secondary_base.is_none());
    }
}
