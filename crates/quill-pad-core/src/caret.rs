/// Caret position tracking and conversion between line/column positions
/// and rope char indices.
use anyhow::Result;

use crate::buffer::TextBuffer;

/// A line/column position in a buffer. Both are 0-indexed; `col` counts
/// characters from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The caret of a document. Its position is only ever moved through
/// [`Caret::move_to`], which clamps against the buffer, so it always
/// points at a real position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Caret {
    position: Position,
}

impl Caret {
    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the caret, clamping the target into the buffer's bounds.
    pub fn move_to(&mut self, buffer: &TextBuffer, target: Position) {
        self.position = clamp_position(buffer, target);
    }

    /// Places the caret at the end of the buffer.
    pub fn move_to_end(&mut self, buffer: &TextBuffer) {
        self.position = clamp_position(buffer, Position::new(usize::MAX, usize::MAX));
    }

    /// Re-clamps after a buffer edit the caret did not drive, so it never
    /// points past the new end of its line or buffer.
    pub fn clamp(&mut self, buffer: &TextBuffer) {
        self.position = clamp_position(buffer, self.position);
    }
}

/// Clamps a position into the buffer: the line is capped at the last
/// line, the column at that line's length (one past its last char).
pub fn clamp_position(buffer: &TextBuffer, pos: Position) -> Position {
    let line = pos.line.min(buffer.len_lines().saturating_sub(1));
    // The line index is in bounds by construction.
    let max_col = buffer.line_len_chars(line).unwrap_or(0);
    Position::new(line, pos.col.min(max_col))
}

/// Converts a (clamped) position into a rope char index.
///
/// # Errors
///
/// Returns an error if the position lies outside the buffer.
pub fn pos_to_char(buffer: &TextBuffer, pos: Position) -> Result<usize> {
    let line_start = buffer.line_to_char(pos.line)?;
    let line_len = buffer.line_len_chars(pos.line)?;
    if pos.col > line_len {
        anyhow::bail!(
            "column {} out of bounds on line {} ({} chars)",
            pos.col,
            pos.line,
            line_len
        );
    }
    Ok(line_start + pos.col)
}

/// Converts a rope char index into a line/column position.
///
/// # Errors
///
/// Returns an error if the char index is out of bounds.
pub fn char_to_pos(buffer: &TextBuffer, char_idx: usize) -> Result<Position> {
    let line = buffer.char_to_line(char_idx)?;
    let line_start = buffer.line_to_char(line)?;
    Ok(Position::new(line, char_idx - line_start))
}
