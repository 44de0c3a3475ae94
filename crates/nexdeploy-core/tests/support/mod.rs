#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use nexdeploy_core::Result;
use nexdeploy_core::deploy::{DeployInvocation, ProcessRunner};

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
    }
    fs::write(path, content).expect("write should succeed in test temp dirs");
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read_dir should succeed in test temp dirs")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Stand-in for the deploy tool.
///
/// Records every invocation, answers with scripted exit codes (0 once the
/// script runs out) and, for per-file calls, can drop a generated `.js`
/// beside the source like the real tool does.
#[derive(Default)]
pub struct ScriptedRunner {
    pub calls: Vec<DeployInvocation>,
    codes: VecDeque<i32>,
    emit_artifacts: bool,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes(codes: &[i32]) -> Self {
        Self {
            codes: codes.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn emitting_artifacts(mut self) -> Self {
        self.emit_artifacts = true;
        self
    }

    pub fn outputs(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|c| {
                c.output()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn files(&self) -> Vec<Option<String>> {
        self.calls
            .iter()
            .map(|c| c.file().map(|p| p.to_string_lossy().into_owned()))
            .collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&mut self, invocation: &DeployInvocation) -> Result<i32> {
        self.calls.push(invocation.clone());
        if self.emit_artifacts {
            if let Some(file) = invocation.file() {
                let mut artifact = file.as_os_str().to_owned();
                artifact.push(".js");
                write_file(&PathBuf::from(artifact), "// generated\n");
            }
        }
        Ok(self.codes.pop_front().unwrap_or(0))
    }
}

/// A Nexacro-like project tree:
///
/// ```text
/// root/
///   app/            project, document dir
///     app.xprj
///     typedefinition.xml
///   base/form/      main.xfdl, util.xjs, notes.txt
///   lib/            common.xjs
/// ```
pub struct Project {
    pub root: PathBuf,
}

impl Project {
    pub fn create(root: &Path, services: &str) -> Self {
        write_file(&root.join("app/app.xprj"), "<Project/>\n");
        write_file(
            &root.join("app/typedefinition.xml"),
            &format!("<TypeDefinition>\n<Services>\n{services}</Services>\n</TypeDefinition>\n"),
        );
        write_file(&root.join("base/form/main.xfdl"), "<FDL/>\n");
        write_file(&root.join("base/form/util.xjs"), "// util\n");
        write_file(&root.join("base/form/notes.txt"), "notes\n");
        write_file(&root.join("lib/common.xjs"), "// common\n");
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root.join("app")
    }

    /// Write `config.json` into the app dir and return its path.
    pub fn write_config(&self, extra: &[(&str, serde_json::Value)]) -> PathBuf {
        let mut config = serde_json::json!({
            "nexacroDeployExecute": self.root.join("bin/deploy").to_string_lossy(),
            "-P": "app.xprj",
            "-B": "build",
            "-GENERATERULE": "rules",
            "-O": self.root.join("out").to_string_lossy(),
        });
        for (key, value) in extra {
            config[*key] = value.clone();
        }
        let path = self.app_dir().join("config.json");
        write_file(
            &path,
            &serde_json::to_string_pretty(&config).expect("config serializes"),
        );
        path
    }
}

pub fn service(url: &str) -> String {
    format!("  <Service prefixid=\"x\" url=\"{url}\"/>\n")
}
