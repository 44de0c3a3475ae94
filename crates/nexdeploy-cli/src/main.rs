//! nexdeploy - Nexacro module deploy driver
//!
//! Usage:
//!   nexdeploy deploy config.json                 # Deploy every module
//!   nexdeploy deploy config.json --contains-only # Check for module paths
//!   nexdeploy search -F ./app -K url=            # Search typedefinition.xml

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nexdeploy_core::commands::{
    DeployCommand, DeployOptions, DeployOutcome, SearchCommand, SearchCommandOptions, SearchReport,
};
use nexdeploy_core::deploy::SystemRunner;
use nexdeploy_core::scan::{DecodeOptions, DecodePolicy};
use nexdeploy_core::search::{Extraction, FILE_COUNT_FILE_NAME, SearchOptions};

const DEFAULT_FILTER: &str = "nexdeploy_core=info,nexdeploy=info,warn";
const VERBOSE_FILTER: &str = "nexdeploy_core=debug,nexdeploy=debug,info";

#[derive(Parser)]
#[command(name = "nexdeploy")]
#[command(about = "Deploy the modules declared in a Nexacro typedefinition.xml", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy every module referenced from <Services>
    Deploy(DeployArgs),

    /// Search typedefinition.xml for a keyword
    Search(SearchArgs),
}

#[derive(Args)]
struct DecodeArgs {
    /// Input text encoding
    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Handling of undecodable bytes (ignore, replace, strict)
    #[arg(long, default_value = "ignore", value_parser = parse_policy)]
    errors: DecodePolicy,
}

impl DecodeArgs {
    fn options(&self) -> nexdeploy_core::Result<DecodeOptions> {
        DecodeOptions::new(&self.encoding, self.errors)
    }
}

#[derive(Args)]
struct DeployArgs {
    /// Path to config.json (or a .toml file with the same keys)
    config: PathBuf,

    /// Only report whether <Services> contains a relative path
    #[arg(long)]
    contains_only: bool,

    /// Stop after N module paths (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_hits: usize,

    /// Remove created output directories after a successful deploy
    #[arg(long)]
    test: bool,

    #[command(flatten)]
    decode: DecodeArgs,
}

#[derive(Args)]
struct SearchArgs {
    /// Directory holding typedefinition.xml (or a file inside it)
    #[arg(short = 'F', long = "file")]
    file: PathBuf,

    /// Keyword to search for; a directory name writes its file count instead
    #[arg(short = 'K', long = "keyword")]
    keyword: String,

    /// Case-insensitive match
    #[arg(short, long)]
    ignore_case: bool,

    /// Only report whether the keyword occurs
    #[arg(long)]
    contains_only: bool,

    /// Stop after N matching lines (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_hits: usize,

    /// Print matching lines without line numbers
    #[arg(long)]
    no_line_number: bool,

    /// Print the value of NAME="..." instead of the line
    #[arg(long, value_name = "NAME")]
    extract_attr: Option<String>,

    /// Print "v1,v2" for two attributes on the same line
    #[arg(long, value_name = "ATTR1,ATTR2")]
    extract_pair: Option<String>,

    /// Suppress repeated extracted values
    #[arg(long)]
    unique: bool,

    /// Where to write the file-count report
    #[arg(long, default_value = FILE_COUNT_FILE_NAME)]
    count_output: PathBuf,

    #[command(flatten)]
    decode: DecodeArgs,
}

fn parse_policy(value: &str) -> std::result::Result<DecodePolicy, String> {
    value.parse().map_err(|e: nexdeploy_core::Error| e.to_string())
}

/// Pair extraction wins over a single attribute; blank values are off.
fn build_extraction(
    pair: Option<&str>,
    attr: Option<&str>,
    line_numbers: bool,
) -> nexdeploy_core::Result<Extraction> {
    let pair = pair.map(str::trim).filter(|p| !p.is_empty());
    let attr = attr.map(str::trim).filter(|a| !a.is_empty());
    Ok(match (pair, attr) {
        (Some(pair), _) => Extraction::pair(pair)?,
        (None, Some(name)) => Extraction::Attribute(name.to_string()),
        (None, None) => Extraction::Line { line_numbers },
    })
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match run_cli(cli.command) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<nexdeploy_core::Error>()
        .map(nexdeploy_core::Error::exit_code)
        .unwrap_or(nexdeploy_core::error::EXIT_CONFIG)
}

fn run_cli(command: Commands) -> Result<i32> {
    match command {
        Commands::Deploy(args) => run_deploy(args),
        Commands::Search(args) => run_search(args),
    }
}

fn run_deploy(args: DeployArgs) -> Result<i32> {
    let options = DeployOptions::new(args.config)
        .with_decode(args.decode.options()?)
        .with_contains_only(args.contains_only)
        .with_max_hits(args.max_hits)
        .with_test_mode(args.test);

    let outcome = DeployCommand::new(options).execute(&mut SystemRunner::new())?;
    match &outcome {
        DeployOutcome::ContainsOnly { found: true } => {
            println!("Found: <Services> contains a relative path");
        }
        DeployOutcome::ContainsOnly { found: false } => {
            println!("Not found: <Services> has no relative path");
        }
        DeployOutcome::Deployed { report, cleanup } => {
            tracing::info!(
                invocations = report.invocations.len(),
                relocated = report.relocated.len(),
                "Done"
            );
            let failed = cleanup.as_ref().map_or(0, |c| c.failed.len());
            if failed > 0 {
                tracing::warn!(failed, "Some directories were not removed");
            }
        }
    }
    Ok(outcome.exit_code())
}

fn run_search(args: SearchArgs) -> Result<i32> {
    let extraction = build_extraction(
        args.extract_pair.as_deref(),
        args.extract_attr.as_deref(),
        !args.no_line_number,
    )?;
    let search = SearchOptions {
        keyword: args.keyword,
        ignore_case: args.ignore_case,
        contains_only: args.contains_only,
        max_hits: args.max_hits,
        extraction,
        unique: args.unique,
    };
    let options = SearchCommandOptions::new(args.file, search)
        .with_decode(args.decode.options()?)
        .with_count_output(args.count_output);

    let report = SearchCommand::new(options).execute()?;
    match &report {
        SearchReport::FileCount { report, output } => {
            println!(
                "{} files in {} (written to {})",
                report.file_count,
                report.path,
                output.display()
            );
        }
        SearchReport::Matches(outcome) if args.contains_only => {
            if outcome.found() {
                println!("Found");
            } else {
                println!("Not found");
            }
        }
        SearchReport::Matches(outcome) => {
            for line in &outcome.output {
                println!("{line}");
            }
        }
    }
    Ok(report.exit_code())
}
