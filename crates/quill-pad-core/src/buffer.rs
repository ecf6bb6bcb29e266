/// Text buffer wrapping `ropey::Rope`.
use std::fmt;

use anyhow::Result;
use ropey::Rope;

/// A text buffer backed by a rope, so whole-buffer replacement and
/// mid-buffer insertion both stay cheap.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    /// Creates an empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Total number of characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines. A rope always reports at least one line, even
    /// when empty.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// True if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Char index of the start of a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn line_to_char(&self, line_idx: usize) -> Result<usize> {
        if line_idx >= self.rope.len_lines() {
            anyhow::bail!(
                "line index {} out of bounds ({} lines)",
                line_idx,
                self.rope.len_lines()
            );
        }
        Ok(self.rope.line_to_char(line_idx))
    }

    /// Line index containing a char index. The index one past the end is
    /// allowed and maps to the last line.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn char_to_line(&self, char_idx: usize) -> Result<usize> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "char index {} out of bounds ({} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        Ok(self.rope.char_to_line(char_idx))
    }

    /// Converts a byte offset into a char offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the byte index is out of bounds.
    pub fn byte_to_char(&self, byte_idx: usize) -> Result<usize> {
        if byte_idx > self.rope.len_bytes() {
            anyhow::bail!(
                "byte index {} out of bounds ({} bytes)",
                byte_idx,
                self.rope.len_bytes()
            );
        }
        Ok(self.rope.byte_to_char(byte_idx))
    }

    /// Length of a line in characters, excluding its line ending
    /// (`\n` or `\r\n`).
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn line_len_chars(&self, line_idx: usize) -> Result<usize> {
        if line_idx >= self.rope.len_lines() {
            anyhow::bail!(
                "line index {} out of bounds ({} lines)",
                line_idx,
                self.rope.len_lines()
            );
        }
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            if len > 1 && line.char(len - 2) == '\r' {
                return Ok(len - 2);
            }
            return Ok(len - 1);
        }
        Ok(len)
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "insert position {} out of bounds ({} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Removes the char range `[start..end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or out of bounds.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            anyhow::bail!("invalid range: start ({}) > end ({})", start, end);
        }
        if end > self.rope.len_chars() {
            anyhow::bail!(
                "range end {} out of bounds ({} chars)",
                end,
                self.rope.len_chars()
            );
        }
        self.rope.remove(start..end);
        Ok(())
    }
}
