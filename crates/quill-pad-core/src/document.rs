/// Document model: one open text document and the machinery attached to
/// it — buffer, caret, undo/redo history, and table composition.
use std::sync::Arc;

use anyhow::Result;

use quill_pad_mod_history::{HistoryConfig, HistoryManager, PersistenceLayer};
use quill_pad_mod_table::{ConfirmOutcome, TableComposer, TableError};

use crate::buffer::TextBuffer;
use crate::caret::{char_to_pos, pos_to_char, Caret, Position};
use crate::search::{self, SearchOptions};

/// A single open document.
///
/// Owns its buffer and caret outright. History and table composition are
/// driven through the document: on every undo/redo the current content is
/// read fresh from the buffer, and whatever content comes back is
/// installed wholesale. A flushed table lands at the caret.
#[derive(Debug)]
pub struct Document {
    buffer: TextBuffer,
    caret: Caret,
    history: HistoryManager,
    table: TableComposer,
    title: String,
    modified: bool,
}

impl Document {
    /// Creates an empty untitled document with in-memory history.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            caret: Caret::default(),
            history: HistoryManager::in_memory(),
            table: TableComposer::new(),
            title: String::from("Untitled"),
            modified: false,
        }
    }

    /// Creates a document whose history is persisted under `doc_id`.
    ///
    /// Previously flushed history for that ID is restored.
    ///
    /// # Errors
    ///
    /// Returns an error if stored history cannot be read.
    pub fn with_persistence(
        doc_id: String,
        config: HistoryConfig,
        persistence: Arc<PersistenceLayer>,
    ) -> Result<Self> {
        let history = HistoryManager::load_or_new(doc_id, config, Some(persistence))?;
        Ok(Self {
            buffer: TextBuffer::new(),
            caret: Caret::default(),
            history,
            table: TableComposer::new(),
            title: String::from("Untitled"),
            modified: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    // ── Buffer access ────────────────────────────────────────────────

    /// Full current content.
    pub fn buffer_text(&self) -> String {
        self.buffer.to_string()
    }

    /// Atomic whole-content replacement. The caret is re-clamped so it
    /// still points inside the new content.
    pub fn set_buffer_text(&mut self, text: &str) {
        self.buffer = TextBuffer::from(text);
        self.caret.clamp(&self.buffer);
        self.modified = true;
    }

    /// Inserts text at a position without replacing anything, leaving the
    /// caret at the end of the inserted text.
    ///
    /// # Errors
    ///
    /// Returns an error if the position lies outside the buffer.
    pub fn insert_text_at(&mut self, pos: Position, text: &str) -> Result<()> {
        let char_idx = pos_to_char(&self.buffer, pos)?;
        self.buffer.insert(char_idx, text)?;
        let end = char_to_pos(&self.buffer, char_idx + text.chars().count())?;
        self.caret.move_to(&self.buffer, end);
        self.modified = true;
        Ok(())
    }

    /// Inserts text at the caret.
    ///
    /// # Errors
    ///
    /// Returns an error if the caret maps outside the buffer, which would
    /// indicate a clamping bug.
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        self.insert_text_at(self.caret.position(), text)
    }

    // ── Caret ────────────────────────────────────────────────────────

    pub fn caret_position(&self) -> Position {
        self.caret.position()
    }

    /// Moves the caret, clamped into the buffer.
    pub fn move_caret_to(&mut self, pos: Position) {
        self.caret.move_to(&self.buffer, pos);
    }

    // ── Undo / redo ──────────────────────────────────────────────────

    /// Undoes one history step. Never fails: with nothing to undo the
    /// history baseline is restored instead.
    pub fn undo(&mut self) {
        let current = self.buffer.to_string();
        let restored = self.history.undo(&current);
        self.install(&restored);
    }

    /// Redoes one history step, falling back to the baseline like `undo`.
    pub fn redo(&mut self) {
        let current = self.buffer.to_string();
        let restored = self.history.redo(&current);
        self.install(&restored);
    }

    fn install(&mut self, content: &str) {
        self.buffer = TextBuffer::from(content);
        self.caret.clamp(&self.buffer);
        self.modified = true;
    }

    /// Flushes pending history to disk, if this document persists history.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk write fails.
    pub fn flush_history(&mut self) -> Result<()> {
        self.history.flush()
    }

    // ── Table composition ────────────────────────────────────────────

    /// Begins composing a `rows × cols` table at the caret.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero-sized grid or
    /// `AlreadyComposing` if a composition is already active.
    pub fn begin_table(&mut self, rows: usize, cols: usize) -> Result<(), TableError> {
        self.table.start(rows, cols)
    }

    /// Confirms the current table cell. When the last cell is confirmed
    /// the serialized block plus a trailing newline is inserted at the
    /// caret and composition ends.
    ///
    /// # Errors
    ///
    /// Returns `NotComposing` if no composition is active. Insertion
    /// itself cannot fail: the caret is always in bounds.
    pub fn confirm_table_cell(&mut self, value: &str) -> Result<ConfirmOutcome, TableError> {
        let outcome = self.table.confirm_cell(value)?;
        if let ConfirmOutcome::Flushed(block) = &outcome {
            let text = format!("{block}\n");
            // The caret is clamped by construction, so this cannot miss.
            if let Err(error) = self.insert_text(&text) {
                tracing::warn!(%error, "failed to insert flushed table block");
            }
        }
        Ok(outcome)
    }

    /// Abandons any active table composition. No-op when inactive.
    pub fn cancel_table(&mut self) {
        self.table.cancel();
    }

    pub fn is_composing_table(&self) -> bool {
        self.table.is_composing()
    }

    // ── Search / replace ─────────────────────────────────────────────

    /// Replaces every occurrence of the search query, returning the count.
    ///
    /// # Errors
    ///
    /// Returns an error if an edit falls outside the buffer.
    pub fn replace_all(&mut self, options: &SearchOptions, replacement: &str) -> Result<usize> {
        let count = search::replace_all(&mut self.buffer, options, replacement)?;
        if count > 0 {
            self.caret.clamp(&self.buffer);
            self.modified = true;
        }
        Ok(count)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
