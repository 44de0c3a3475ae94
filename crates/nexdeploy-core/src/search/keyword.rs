//! Line search for a keyword with optional XML attribute extraction.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use regex::Regex;

use crate::scan::{DecodeOptions, DecodedLines};
use crate::{Error, Result};

/// What to report for each matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The trimmed line, optionally prefixed with its number
    Line { line_numbers: bool },
    /// Value of `name="..."`
    Attribute(String),
    /// Values of two attributes on the same line, as `a,b`
    Pair(String, String),
}

impl Default for Extraction {
    fn default() -> Self {
        Extraction::Line { line_numbers: true }
    }
}

impl Extraction {
    /// Parse `attr1,attr2`; exactly two names are required.
    pub fn pair(spec: &str) -> Result<Self> {
        let names: Vec<&str> = spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        match names.as_slice() {
            [first, second] => Ok(Extraction::Pair(first.to_string(), second.to_string())),
            _ => Err(Error::config(format!(
                "--extract-pair needs exactly two attributes as \"attr1,attr2\" (got \"{spec}\")"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub keyword: String,
    pub ignore_case: bool,
    pub contains_only: bool,
    /// Maximum matching lines; 0 means unlimited
    pub max_hits: usize,
    pub extraction: Extraction,
    /// Suppress repeated extracted values
    pub unique: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Matching lines
    pub hits: usize,
    /// Reported values in order (empty in contains-only mode)
    pub output: Vec<String>,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.hits > 0
    }
}

enum Extractor {
    Line { line_numbers: bool },
    Attribute(Regex),
    Pair(Regex, Regex),
}

impl Extractor {
    fn extract(&self, line_no: usize, line: &str) -> Option<String> {
        match self {
            Extractor::Line { line_numbers } => Some(if *line_numbers {
                format!("{}: {}", line_no, line.trim())
            } else {
                line.trim().to_string()
            }),
            Extractor::Attribute(re) => capture(re, line),
            Extractor::Pair(first, second) => {
                let a = capture(first, line)?;
                let b = capture(second, line)?;
                Some(format!("{a},{b}"))
            }
        }
    }

    fn dedups(&self) -> bool {
        !matches!(self, Extractor::Line { .. })
    }
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn attribute_pattern(name: &str) -> Result<Regex> {
    Regex::new(&format!(r#"{}="([^"]+)""#, regex::escape(name)))
        .map_err(|e| Error::config(format!("invalid attribute name '{name}': {e}")))
}

/// Keyword search over the lines of a document.
pub struct KeywordSearch {
    options: SearchOptions,
    needle: String,
    extractor: Extractor,
}

impl KeywordSearch {
    pub fn new(options: SearchOptions) -> Result<Self> {
        let extractor = match &options.extraction {
            Extraction::Line { line_numbers } => Extractor::Line {
                line_numbers: *line_numbers,
            },
            Extraction::Attribute(name) => Extractor::Attribute(attribute_pattern(name)?),
            Extraction::Pair(first, second) => {
                Extractor::Pair(attribute_pattern(first)?, attribute_pattern(second)?)
            }
        };
        let needle = if options.ignore_case {
            options.keyword.to_lowercase()
        } else {
            options.keyword.clone()
        };
        Ok(Self {
            options,
            needle,
            extractor,
        })
    }

    fn matches(&self, line: &str) -> bool {
        if self.options.ignore_case {
            line.to_lowercase().contains(&self.needle)
        } else {
            line.contains(&self.needle)
        }
    }

    fn cap_reached(&self, hits: usize) -> bool {
        self.options.max_hits > 0 && hits >= self.options.max_hits
    }

    /// Search an in-memory sequence of lines.
    pub fn search_lines<I, S>(&self, lines: I) -> SearchOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.search_results(lines.into_iter().map(Ok::<S, Error>))
            .unwrap_or_default()
    }

    /// Search a file; a missing file is [`Error::DocumentNotFound`].
    pub fn search_file(&self, path: &Path, decode: DecodeOptions) -> Result<SearchOutcome> {
        if !path.is_file() {
            return Err(Error::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        self.search_results(DecodedLines::new(BufReader::new(file), path, decode))
    }

    fn search_results<I, S>(&self, lines: I) -> Result<SearchOutcome>
    where
        I: IntoIterator<Item = Result<S>>,
        S: AsRef<str>,
    {
        let mut outcome = SearchOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line?;
            let line = line.as_ref();
            if !self.matches(line) {
                continue;
            }
            outcome.hits += 1;

            if !self.options.contains_only {
                if let Some(value) = self.extractor.extract(index + 1, line) {
                    let repeated = self.options.unique
                        && self.extractor.dedups()
                        && !seen.insert(value.clone());
                    if !repeated {
                        outcome.output.push(value);
                    }
                }
            }

            if self.cap_reached(outcome.hits) {
                break;
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &[&str] = &[
        r#"<TypeDefinition>"#,
        r#"  <Service prefixid="Base" type="form" url="../base/form/"/>"#,
        r#"  <Service prefixid="Lib" type="js" url="../lib/"/>"#,
        r#"  <Service prefixid="Base2" type="form" url="../base/form/"/>"#,
        r#"</TypeDefinition>"#,
    ];

    fn search(options: SearchOptions) -> SearchOutcome {
        KeywordSearch::new(options).unwrap().search_lines(DOC)
    }

    #[test]
    fn reports_numbered_lines_by_default() {
        let outcome = search(SearchOptions {
            keyword: "type=\"js\"".to_string(),
            ..Default::default()
        });
        assert_eq!(outcome.hits, 1);
        assert_eq!(
            outcome.output,
            vec![r#"3: <Service prefixid="Lib" type="js" url="../lib/"/>"#]
        );
    }

    #[test]
    fn extracts_unique_attribute_values() {
        let outcome = search(SearchOptions {
            keyword: "url=".to_string(),
            extraction: Extraction::Attribute("url".to_string()),
            unique: true,
            ..Default::default()
        });
        assert_eq!(outcome.hits, 3);
        assert_eq!(outcome.output, vec!["../base/form/", "../lib/"]);
    }

    #[test]
    fn extracts_attribute_pairs() {
        let outcome = search(SearchOptions {
            keyword: "SERVICE".to_string(),
            ignore_case: true,
            extraction: Extraction::pair("prefixid, url").unwrap(),
            max_hits: 2,
            ..Default::default()
        });
        assert_eq!(outcome.hits, 2);
        assert_eq!(outcome.output, vec!["Base,../base/form/", "Lib,../lib/"]);
    }

    #[test]
    fn contains_only_counts_without_output() {
        let outcome = search(SearchOptions {
            keyword: "Service".to_string(),
            contains_only: true,
            ..Default::default()
        });
        assert!(outcome.found());
        assert!(outcome.output.is_empty());
    }

    #[test]
    fn pair_requires_two_names() {
        assert_eq!(Extraction::pair("url").unwrap_err().exit_code(), 2);
        assert!(Extraction::pair("a,b,c").is_err());
    }
}
