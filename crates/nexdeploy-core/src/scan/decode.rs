//! Line-oriented text decoding with a configurable decode-error policy.

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding_rs::Encoding;

use crate::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// What to do with bytes that are not valid in the input encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Drop undecodable bytes
    #[default]
    Ignore,
    /// Substitute U+FFFD for each undecodable sequence
    Replace,
    /// Fail on the first undecodable sequence
    Strict,
}

impl DecodePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DecodePolicy::Ignore => "ignore",
            DecodePolicy::Replace => "replace",
            DecodePolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecodePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(DecodePolicy::Ignore),
            "replace" => Ok(DecodePolicy::Replace),
            "strict" => Ok(DecodePolicy::Strict),
            other => Err(Error::config(format!(
                "unknown decode error policy '{other}' (expected ignore, replace or strict)"
            ))),
        }
    }
}

/// Input text encoding, looked up by WHATWG label (`utf-8`, `cp949`, `euc-kr`, ...).
///
/// Lines are split on `\n` before decoding, so only ASCII-compatible
/// encodings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }
}

impl TextEncoding {
    /// Parse an encoding label such as `utf-8` or `cp949`.
    pub fn from_label(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        let encoding = match trimmed.to_ascii_lowercase().as_str() {
            "utf-8-sig" | "utf_8_sig" | "utf8" | "utf_8" => Some(encoding_rs::UTF_8),
            _ => Encoding::for_label(trimmed.as_bytes())
                .or_else(|| Encoding::for_label(trimmed.replace('_', "-").as_bytes())),
        };
        match encoding {
            Some(encoding) if encoding.is_ascii_compatible() => Ok(TextEncoding(encoding)),
            Some(encoding) => Err(Error::config(format!(
                "encoding '{}' is not supported for line scanning",
                encoding.name()
            ))),
            None => Err(Error::config(format!("unsupported encoding '{label}'"))),
        }
    }

    pub fn name(self) -> &'static str {
        self.0.name()
    }

    fn is_utf8(self) -> bool {
        self.0 == encoding_rs::UTF_8
    }
}

/// Encoding plus decode-error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub encoding: TextEncoding,
    pub errors: DecodePolicy,
}

impl DecodeOptions {
    pub fn new(encoding_label: &str, errors: DecodePolicy) -> Result<Self> {
        Ok(Self {
            encoding: TextEncoding::from_label(encoding_label)?,
            errors,
        })
    }
}

/// Decode one line of bytes under `policy`.
///
/// Returns `None` when the input is malformed and the policy is strict.
pub fn decode_bytes(input: &[u8], encoding: TextEncoding, policy: DecodePolicy) -> Option<String> {
    match policy {
        DecodePolicy::Strict => encoding
            .0
            .decode_without_bom_handling_and_without_replacement(input)
            .map(|text| text.into_owned()),
        DecodePolicy::Replace => Some(encoding.0.decode_without_bom_handling(input).0.into_owned()),
        DecodePolicy::Ignore => {
            let (text, had_errors) = encoding.0.decode_without_bom_handling(input);
            if had_errors {
                Some(text.chars().filter(|c| *c != char::REPLACEMENT_CHARACTER).collect())
            } else {
                Some(text.into_owned())
            }
        }
    }
}

/// Iterator over the decoded lines of a reader, terminators stripped.
pub struct DecodedLines<R> {
    reader: R,
    options: DecodeOptions,
    path: PathBuf,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> DecodedLines<R> {
    /// `path` is only used in error messages.
    pub fn new(reader: R, path: &Path, options: DecodeOptions) -> Self {
        Self {
            reader,
            options,
            path: path.to_path_buf(),
            line: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| Error::io(&self.path, e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut bytes = self.buf.as_slice();
        if self.line == 1 && self.options.encoding.is_utf8() {
            bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        }
        bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);

        match decode_bytes(bytes, self.options.encoding, self.options.errors) {
            Some(text) => Ok(Some(text)),
            None => Err(Error::Decode {
                path: self.path.clone(),
                line: self.line,
                message: format!("malformed {} input", self.options.encoding.name()),
            }),
        }
    }
}

impl<R: BufRead> Iterator for DecodedLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
