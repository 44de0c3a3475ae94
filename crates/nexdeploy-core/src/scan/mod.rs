//! Token extraction from the definition document.
//!
//! The document is scanned as text, one line at a time: only the region
//! between the `<Services>` opening and closing tags is searched, and every
//! `../`-prefixed path inside it becomes a token.

pub mod decode;
pub mod scanner;

pub use decode::{DecodeOptions, DecodePolicy, DecodedLines, TextEncoding, decode_bytes};
pub use scanner::{
    RELATIVE_PATH, SERVICES_CLOSE, SERVICES_OPEN, ScanOptions, ScanOutcome, ServiceBlockScanner,
};
