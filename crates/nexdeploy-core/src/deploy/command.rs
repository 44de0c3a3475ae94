//! Argument assembly for `nexacroDeployExecute`.
//!
//! The fixed prefix (`-P`, `-B`, optional `-D`, `-COMPRESS`, `-SHRINK`) is
//! built once into an immutable [`CommandTemplate`]. `-O` and
//! `-GENERATERULE` vary per target and are appended per invocation.
//!
//! Arguments are kept as `OsString` so paths reach the tool unchanged; only
//! `Display` is lossy.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ResolvedConfig;

/// One external-process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployInvocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl DeployInvocation {
    /// Value following `flag`, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// `-FILE` argument of a per-file invocation.
    pub fn file(&self) -> Option<&Path> {
        self.flag_value("-FILE").map(Path::new)
    }

    /// `-O` argument.
    pub fn output(&self) -> Option<&Path> {
        self.flag_value("-O").map(Path::new)
    }

    /// Program name for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for DeployInvocation {
    /// Arguments containing spaces are double-quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = |s: &OsStr| {
            let s = s.to_string_lossy();
            if s.contains(' ') {
                format!("\"{s}\"")
            } else {
                s.into_owned()
            }
        };
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// Immutable fixed prefix plus the generation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: OsString,
    prefix: Vec<OsString>,
    generate_rule: OsString,
}

impl CommandTemplate {
    pub fn builder(
        executable: impl Into<PathBuf>,
        project: impl Into<PathBuf>,
        build: impl Into<PathBuf>,
        generate_rule: impl Into<PathBuf>,
    ) -> CommandTemplateBuilder {
        CommandTemplateBuilder {
            executable: executable.into(),
            project: project.into(),
            build: build.into(),
            generate_rule: generate_rule.into(),
            secondary: None,
            compress: false,
            shrink: false,
        }
    }

    /// Builder preloaded from a resolved configuration, without `-D`.
    pub fn builder_from_config(config: &ResolvedConfig) -> CommandTemplateBuilder {
        Self::builder(
            &config.executable,
            &config.project,
            &config.build,
            &config.generate_rule,
        )
        .compress(config.compress)
        .shrink(config.shrink)
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Fixed arguments after the program.
    pub fn prefix(&self) -> &[OsString] {
        &self.prefix
    }

    pub fn generate_rule(&self) -> &OsStr {
        &self.generate_rule
    }

    /// Whole-project invocation against `target`.
    pub fn project_invocation(&self, target: &Path) -> DeployInvocation {
        self.invocation(target, None)
    }

    /// Per-file invocation of `file` against `target`.
    pub fn file_invocation(&self, target: &Path, file: &Path) -> DeployInvocation {
        self.invocation(target, Some(file))
    }

    fn invocation(&self, target: &Path, file: Option<&Path>) -> DeployInvocation {
        let mut args = self.prefix.clone();
        args.push("-O".into());
        args.push(path_arg(target));
        args.push("-GENERATERULE".into());
        args.push(self.generate_rule.clone());
        if let Some(file) = file {
            args.push("-FILE".into());
            args.push(path_arg(file));
        }
        DeployInvocation {
            program: self.program.clone(),
            args,
        }
    }
}

/// Builder for [`CommandTemplate`].
#[derive(Debug, Clone)]
pub struct CommandTemplateBuilder {
    executable: PathBuf,
    project: PathBuf,
    build: PathBuf,
    generate_rule: PathBuf,
    secondary: Option<PathBuf>,
    compress: bool,
    shrink: bool,
}

impl CommandTemplateBuilder {
    /// Carry `-D <base>` in the prefix.
    pub fn secondary(mut self, base: impl Into<PathBuf>) -> Self {
        self.secondary = Some(base.into());
        self
    }

    pub fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub fn shrink(mut self, enabled: bool) -> Self {
        self.shrink = enabled;
        self
    }

    pub fn build(&self) -> CommandTemplate {
        let mut prefix: Vec<OsString> = vec![
            "-P".into(),
            path_arg(&self.project),
            "-B".into(),
            path_arg(&self.build),
        ];
        if let Some(secondary) = &self.secondary {
            prefix.push("-D".into());
            prefix.push(path_arg(secondary));
        }
        if self.compress {
            prefix.push("-COMPRESS".into());
        }
        if self.shrink {
            prefix.push("-SHRINK".into());
        }

        CommandTemplate {
            program: path_arg(&self.executable),
            prefix,
            generate_rule: path_arg(&self.generate_rule),
        }
    }
}

fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> CommandTemplateBuilder {
        CommandTemplate::builder("/opt/deploy", "/p/app.xprj", "/p/build", "/p/rules")
    }

    #[test]
    fn prefix_carries_project_and_build() {
        let template = builder().build();
        assert_eq!(template.program(), "/opt/deploy");
        assert_eq!(template.prefix(), ["-P", "/p/app.xprj", "-B", "/p/build"]);
        assert_eq!(template.generate_rule(), "/p/rules");
    }

    #[test]
    fn compress_precedes_shrink_after_secondary() {
        let template = builder()
            .shrink(true)
            .compress(true)
            .secondary("/mirror")
            .build();
        assert_eq!(
            template.prefix(),
            [
                "-P",
                "/p/app.xprj",
                "-B",
                "/p/build",
                "-D",
                "/mirror",
                "-COMPRESS",
                "-SHRINK"
            ]
        );
    }

    #[test]
    fn invocations_append_output_rule_and_file() {
        let template = builder().build();

        let project = template.project_invocation(Path::new("/out"));
        assert_eq!(
            project.args[4..],
            ["-O", "/out", "-GENERATERULE", "/p/rules"]
        );
        assert_eq!(project.file(), None);
        assert!(!project.has_flag("-FILE"));

        let file = template.file_invocation(Path::new("/out/mod/x"), Path::new("/src/mod/x/a.xfdl"));
        assert_eq!(file.output(), Some(Path::new("/out/mod/x")));
        assert_eq!(file.file(), Some(Path::new("/src/mod/x/a.xfdl")));
        assert_eq!(file.args.len(), 10);
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let template = CommandTemplate::builder("/opt/deploy", "/my project/app.xprj", "/b", "/r").build();
        let shown = template.project_invocation(Path::new("/out")).to_string();
        assert_eq!(
            shown,
            "/opt/deploy -P \"/my project/app.xprj\" -B /b -O /out -GENERATERULE /r"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_pass_through_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/src/caf\xE9/a.xfdl");
        let file = builder()
            .build()
            .file_invocation(Path::new("/out"), Path::new(raw));
        assert_eq!(file.flag_value("-FILE"), Some(raw));
        assert!(file.to_string().contains("caf\u{FFFD}"));
    }
}
