/// Literal text search and replacement over a buffer.
use anyhow::{Context, Result};
use regex::Regex;

use crate::buffer::TextBuffer;

/// What to search for and how.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: String,
    pub case_sensitive: bool,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            case_sensitive: true,
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

/// One match, as a half-open char range into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

/// The query is always treated as a literal, never as a pattern.
fn build_regex(options: &SearchOptions) -> Result<Regex> {
    let escaped = regex::escape(&options.query);
    let pattern = if options.case_sensitive {
        escaped
    } else {
        format!("(?i){escaped}")
    };
    Regex::new(&pattern).context("Failed to build search pattern")
}

/// Finds all non-overlapping matches, in document order.
///
/// An empty query matches nothing.
///
/// # Errors
///
/// Returns an error if a match offset cannot be mapped into the buffer,
/// which would indicate buffer corruption.
pub fn find_all(buffer: &TextBuffer, options: &SearchOptions) -> Result<Vec<SearchMatch>> {
    if options.query.is_empty() {
        return Ok(Vec::new());
    }
    let regex = build_regex(options)?;
    let text = buffer.to_string();

    let mut matches = Vec::new();
    for found in regex.find_iter(&text) {
        matches.push(SearchMatch {
            start: buffer.byte_to_char(found.start())?,
            end: buffer.byte_to_char(found.end())?,
        });
    }
    Ok(matches)
}

/// Replaces every match with `replacement`, returning how many were
/// replaced. Matches are applied back to front so earlier char offsets
/// stay valid while later ones are rewritten.
///
/// # Errors
///
/// Returns an error if an edit falls outside the buffer.
pub fn replace_all(
    buffer: &mut TextBuffer,
    options: &SearchOptions,
    replacement: &str,
) -> Result<usize> {
    let matches = find_all(buffer, options)?;
    for found in matches.iter().rev() {
        buffer.remove(found.start, found.end)?;
        buffer.insert(found.start, replacement)?;
    }
    Ok(matches.len())
}
