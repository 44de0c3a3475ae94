//! End-to-end deploy: config → scan → resolve → orchestrate → cleanup.

use std::path::PathBuf;

use crate::config::{ResolvedConfig, load_config};
use crate::deploy::{
    CleanupReport, DeployPass, DeployReport, FileCollector, Orchestrator, ProcessRunner,
    cleanup_dirs, cleanup_order,
};
use crate::scan::{DecodeOptions, ScanOptions, ServiceBlockScanner};
use crate::{Error, Result};

/// Options for a deploy run.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub config_path: PathBuf,
    pub decode: DecodeOptions,
    /// Only report whether `<Services>` holds a relative path
    pub contains_only: bool,
    /// Maximum tokens processed; 0 means unlimited
    pub max_hits: usize,
    /// Remove created directories after a successful deploy
    pub test_mode: bool,
}

impl DeployOptions {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            decode: DecodeOptions::default(),
            contains_only: false,
            max_hits: 0,
            test_mode: false,
        }
    }

    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    pub fn with_contains_only(mut self, contains_only: bool) -> Self {
        self.contains_only = contains_only;
        self
    }

    pub fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }
}

/// Result of a deploy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Contains-only mode: whether a token was found
    ContainsOnly { found: bool },
    /// Full deploy
    Deployed {
        report: DeployReport,
        cleanup: Option<CleanupReport>,
    },
}

impl DeployOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployOutcome::ContainsOnly { found: true } => 0,
            DeployOutcome::ContainsOnly { found: false } => crate::error::EXIT_NOTHING_TO_DO,
            DeployOutcome::Deployed { .. } => 0,
        }
    }
}

/// The deploy pipeline used by the CLI.
#[derive(Debug, Clone)]
pub struct DeployCommand {
    options: DeployOptions,
}

impl DeployCommand {
    pub fn new(options: DeployOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DeployOptions {
        &self.options
    }

    /// Load and resolve the configuration.
    pub fn resolve_config(&self) -> Result<ResolvedConfig> {
        let config = load_config(&self.options.config_path)?;
        ResolvedConfig::resolve(&config, &self.options.config_path)
    }

    /// Run the pipeline, issuing deploy tool calls through `runner`.
    pub fn execute<R: ProcessRunner + ?Sized>(&self, runner: &mut R) -> Result<DeployOutcome> {
        let config = self.resolve_config()?;

        let document = config.document_path();
        if !document.is_file() {
            return Err(Error::DocumentNotFound { path: document });
        }

        let scanner = ServiceBlockScanner::new(
            ScanOptions::default()
                .max_hits(self.options.max_hits)
                .contains_only(self.options.contains_only),
        );
        let scan = scanner.scan_file(&document, self.options.decode)?;
        if self.options.contains_only {
            return Ok(DeployOutcome::ContainsOnly {
                found: scan.found(),
            });
        }
        if !scan.found() {
            tracing::warn!(path = %document.display(), "No relative path found in <Services>");
        }

        let mut orchestrator = Orchestrator::new(runner, DeployPass::from_config(&config));
        let targets = orchestrator.target_resolver()?.resolve(&scan.tokens);
        let files = FileCollector::new(config.source_base()).collect(&scan.tokens)?;
        let report = orchestrator.run(&targets, &files)?;

        let cleanup = self.options.test_mode.then(|| {
            let order = cleanup_order(
                targets.values().flatten(),
                config.secondary_base.as_deref(),
                &config.output_base,
            );
            cleanup_dirs(&order)
        });

        Ok(DeployOutcome::Deployed { report, cleanup })
    }
}
