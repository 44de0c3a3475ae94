//! Two-phase deploy orchestration.
//!
//! For every configured output base, in order:
//! 1. Phase 1 deploys the whole project to the base.
//! 2. Phase 2 deploys each collected file to its token's target under that
//!    base, moving generated `.js` files into the target after each call.
//!
//! Invocations run one at a time. The first non-zero exit stops everything.
//!
//! Empty target or file maps are rejected before phase 1, so nothing is
//! deployed when there is no module to deploy. This differs from running
//! the project deploy first and only then reporting the empty set.

use std::path::{Path, PathBuf};

use super::collect::FileMap;
use super::command::{CommandTemplate, DeployInvocation};
use super::relocate::relocate_artifacts;
use super::runner::ProcessRunner;
use super::targets::{TargetMap, TargetResolver};
use crate::config::ResolvedConfig;
use crate::{Error, Result};

/// One pass over one output base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPass {
    pub base: PathBuf,
    pub template: CommandTemplate,
}

impl DeployPass {
    /// One pass per output base, in [`ResolvedConfig::output_bases`] order.
    /// Every pass after the primary carries `-D <base>`.
    pub fn from_config(config: &ResolvedConfig) -> Vec<DeployPass> {
        let builder = CommandTemplate::builder_from_config(config);
        config
            .output_bases()
            .into_iter()
            .enumerate()
            .map(|(index, base)| {
                let template = if index == 0 {
                    builder.build()
                } else {
                    builder.clone().secondary(&base).build()
                };
                DeployPass { base, template }
            })
            .collect()
    }
}

/// Summary of a completed deploy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Invocations issued, in order
    pub invocations: Vec<DeployInvocation>,
    /// Artifacts moved into targets
    pub relocated: Vec<PathBuf>,
}

/// Sequences the deploy tool across passes, targets and files.
pub struct Orchestrator<'a, R: ProcessRunner + ?Sized> {
    runner: &'a mut R,
    passes: Vec<DeployPass>,
}

impl<'a, R: ProcessRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(runner: &'a mut R, passes: Vec<DeployPass>) -> Self {
        Self { runner, passes }
    }

    pub fn passes(&self) -> &[DeployPass] {
        &self.passes
    }

    /// Resolver over the pass bases, so targets line up with passes.
    pub fn target_resolver(&self) -> Result<TargetResolver> {
        TargetResolver::new(self.passes.iter().map(|p| p.base.clone()).collect())
    }

    /// Run every pass.
    ///
    /// `targets` holds one path per pass for each token, in pass order
    /// (see [`Orchestrator::target_resolver`]). Nothing runs unless there is
    /// at least one target and one file.
    pub fn run(&mut self, targets: &TargetMap, files: &FileMap) -> Result<DeployReport> {
        if targets.is_empty() {
            return Err(Error::NoTargets);
        }
        if files.is_empty() {
            return Err(Error::NoFiles);
        }
        if let Some((key, resolved)) = targets.iter().find(|(_, r)| r.len() != self.passes.len()) {
            return Err(Error::config(format!(
                "target '{key}' has {} bases but {} deploy passes are configured",
                resolved.len(),
                self.passes.len()
            )));
        }

        let mut report = DeployReport::default();
        let runner = &mut *self.runner;
        for (index, pass) in self.passes.iter().enumerate() {
            tracing::info!(base = %pass.base.display(), "[Phase 1] Project deploy");
            let invocation = pass.template.project_invocation(&pass.base);
            invoke(runner, &invocation, &mut report)?;

            tracing::info!(base = %pass.base.display(), "[Phase 2] File deploy");
            for (key, resolved) in targets {
                let target = &resolved[index];
                let Some(sources) = files.get(key).filter(|f| !f.is_empty()) else {
                    tracing::debug!(token = %key, "No files for target, skipping");
                    continue;
                };
                deploy_files(runner, &pass.template, target, sources, &mut report)?;
            }
        }

        tracing::info!(
            invocations = report.invocations.len(),
            relocated = report.relocated.len(),
            "Deploy finished"
        );
        Ok(report)
    }
}

fn deploy_files<R: ProcessRunner + ?Sized>(
    runner: &mut R,
    template: &CommandTemplate,
    target: &Path,
    sources: &[PathBuf],
    report: &mut DeployReport,
) -> Result<()> {
    for source in sources {
        let invocation = template.file_invocation(target, source);
        invoke(runner, &invocation, report)?;

        let moved = relocate_artifacts(source, target)?;
        report.relocated.extend(moved.moved);
    }
    Ok(())
}

fn invoke<R: ProcessRunner + ?Sized>(
    runner: &mut R,
    invocation: &DeployInvocation,
    report: &mut DeployReport,
) -> Result<()> {
    tracing::info!("[RUN] {}", invocation);
    let code = runner.run(invocation)?;
    report.invocations.push(invocation.clone());
    if code != 0 {
        tracing::error!(code, "Deploy tool failed");
        return Err(Error::ProcessFailed {
            program: invocation.program_name(),
            code,
        });
    }
    Ok(())
}
