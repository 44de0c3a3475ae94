//! Auxiliary search tooling over the definition document.
//!
//! Independent of deployment: keyword search with attribute extraction, and
//! a file-count report for a directory under the document directory.

pub mod file_count;
pub mod keyword;

pub use file_count::{
    FILE_COUNT_FILE_NAME, FileCountReport, count_files, search_base_dir, write_file_count,
};
pub use keyword::{Extraction, KeywordSearch, SearchOptions, SearchOutcome};
