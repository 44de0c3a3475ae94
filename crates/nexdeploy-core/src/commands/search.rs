//! Keyword search and file-count reporting entry point.

use std::path::PathBuf;

use crate::config::DOCUMENT_FILE_NAME;
use crate::scan::DecodeOptions;
use crate::search::{
    FILE_COUNT_FILE_NAME, FileCountReport, KeywordSearch, SearchOptions, SearchOutcome,
    search_base_dir, write_file_count,
};
use crate::Result;

/// Options for a search run.
#[derive(Debug, Clone)]
pub struct SearchCommandOptions {
    /// `-F`: document directory, or a file inside it
    pub document: PathBuf,
    pub search: SearchOptions,
    pub decode: DecodeOptions,
    /// Where the file-count report is written
    pub count_output: PathBuf,
}

impl SearchCommandOptions {
    pub fn new(document: impl Into<PathBuf>, search: SearchOptions) -> Self {
        Self {
            document: document.into(),
            search,
            decode: DecodeOptions::default(),
            count_output: PathBuf::from(FILE_COUNT_FILE_NAME),
        }
    }

    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    pub fn with_count_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.count_output = output.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReport {
    /// The keyword named a directory; its file count was written
    FileCount {
        report: FileCountReport,
        output: PathBuf,
    },
    /// Keyword matches in the document
    Matches(SearchOutcome),
}

impl SearchReport {
    pub fn exit_code(&self) -> i32 {
        match self {
            SearchReport::FileCount { .. } => 0,
            SearchReport::Matches(outcome) if outcome.found() => 0,
            SearchReport::Matches(_) => crate::error::EXIT_NOTHING_TO_DO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchCommand {
    options: SearchCommandOptions,
}

impl SearchCommand {
    pub fn new(options: SearchCommandOptions) -> Self {
        Self { options }
    }

    pub fn execute(&self) -> Result<SearchReport> {
        let base_dir = search_base_dir(&self.options.document);

        let keyword_dir = base_dir.join(&self.options.search.keyword);
        if !self.options.search.keyword.is_empty() && keyword_dir.is_dir() {
            let report = write_file_count(&keyword_dir, &self.options.count_output)?;
            return Ok(SearchReport::FileCount {
                report,
                output: self.options.count_output.clone(),
            });
        }

        let search = KeywordSearch::new(self.options.search.clone())?;
        let outcome = search.search_file(&base_dir.join(DOCUMENT_FILE_NAME), self.options.decode)?;
        Ok(SearchReport::Matches(outcome))
    }
}
