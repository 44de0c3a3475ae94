//! Single-pass scanner for relative paths inside the `<Services>` block.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::decode::{DecodeOptions, DecodedLines};
use crate::{Error, Result};

/// Opening tag of the services region.
pub const SERVICES_OPEN: &str = r"<\s*Services\b";
/// Closing tag of the services region.
pub const SERVICES_CLOSE: &str = r"</\s*Services\s*>";
/// `../` followed by anything up to a quote, whitespace, or angle bracket.
pub const RELATIVE_PATH: &str = r#"\.\./[^"'\s<>]+"#;

static DEFAULT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    case_insensitive(SERVICES_OPEN).expect("services open pattern is valid")
});
static DEFAULT_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    case_insensitive(SERVICES_CLOSE).expect("services close pattern is valid")
});
static DEFAULT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RELATIVE_PATH).expect("relative path pattern is valid"));

fn case_insensitive(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Markers, token grammar and limits of a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    open: Regex,
    close: Regex,
    token: Regex,
    /// Maximum matches processed across the scan; 0 means unlimited
    pub max_hits: usize,
    /// Keep matched tokens; `false` only counts hits
    pub collect_tokens: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN.clone(),
            close: DEFAULT_CLOSE.clone(),
            token: DEFAULT_TOKEN.clone(),
            max_hits: 0,
            collect_tokens: true,
        }
    }
}

impl ScanOptions {
    /// Custom markers (matched case-insensitively) and token grammar.
    pub fn with_patterns(open: &str, close: &str, token: &str) -> Result<Self> {
        let invalid = |e: regex::Error| Error::config(format!("invalid scan pattern: {e}"));
        Ok(Self {
            open: case_insensitive(open).map_err(invalid)?,
            close: case_insensitive(close).map_err(invalid)?,
            token: Regex::new(token).map_err(invalid)?,
            ..Self::default()
        })
    }

    pub fn max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Count hits without retaining tokens.
    pub fn contains_only(mut self, contains_only: bool) -> Self {
        self.collect_tokens = !contains_only;
        self
    }

    fn cap_reached(&self, hits: usize) -> bool {
        self.max_hits > 0 && hits >= self.max_hits
    }
}

/// Result of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Matches processed
    pub hits: usize,
    /// Matched tokens in document order (empty in contains-only mode)
    pub tokens: Vec<String>,
}

impl ScanOutcome {
    pub fn found(&self) -> bool {
        self.hits > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Outside,
    Inside,
}

/// Accumulator owned by one scan.
struct ScanState<'a> {
    options: &'a ScanOptions,
    region: Region,
    line_no: usize,
    outcome: ScanOutcome,
}

impl<'a> ScanState<'a> {
    fn new(options: &'a ScanOptions) -> Self {
        Self {
            options,
            region: Region::Outside,
            line_no: 0,
            outcome: ScanOutcome::default(),
        }
    }

    /// Open check, then token scan, then close check.
    fn feed(&mut self, line: &str) -> ControlFlow<()> {
        self.line_no += 1;

        if self.region == Region::Outside && self.options.open.is_match(line) {
            tracing::debug!(line = self.line_no, "Entering <Services> block");
            self.region = Region::Inside;
        }

        if self.region == Region::Inside {
            for m in self.options.token.find_iter(line) {
                self.outcome.hits += 1;
                if self.options.collect_tokens {
                    self.outcome.tokens.push(m.as_str().to_string());
                }
                if self.options.cap_reached(self.outcome.hits) {
                    tracing::debug!(hits = self.outcome.hits, "Hit limit reached");
                    return ControlFlow::Break(());
                }
            }
        }

        if self.region == Region::Inside && self.options.close.is_match(line) {
            tracing::debug!(line = self.line_no, "Leaving <Services> block");
            self.region = Region::Outside;
        }

        ControlFlow::Continue(())
    }
}

/// Extracts relative-path tokens from the `<Services>` region of a document.
#[derive(Debug, Clone, Default)]
pub struct ServiceBlockScanner {
    options: ScanOptions,
}

impl ServiceBlockScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan an in-memory sequence of lines.
    pub fn scan_lines<I, S>(&self, lines: I) -> ScanOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ScanState::new(&self.options);
        for line in lines {
            if state.feed(line.as_ref()).is_break() {
                break;
            }
        }
        state.outcome
    }

    /// Scan a reader line by line; `path` names the source in errors.
    pub fn scan_reader<R: BufRead>(
        &self,
        reader: R,
        path: &Path,
        decode: DecodeOptions,
    ) -> Result<ScanOutcome> {
        let mut state = ScanState::new(&self.options);
        for line in DecodedLines::new(reader, path, decode) {
            if state.feed(&line?).is_break() {
                break;
            }
        }
        Ok(state.outcome)
    }

    /// Scan a file. A missing file is reported as [`Error::DocumentNotFound`].
    pub fn scan_file(&self, path: &Path, decode: DecodeOptions) -> Result<ScanOutcome> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::DocumentNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::io(path, e),
        })?;
        if !file.metadata().map(|m| m.is_file()).unwrap_or(false) {
            return Err(Error::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }

        let outcome = self.scan_reader(BufReader::new(file), path, decode)?;
        tracing::info!(
            path = %path.display(),
            hits = outcome.hits,
            "Scanned <Services> block"
        );
        Ok(outcome)
    }
}
