/// Snapshot-based undo/redo manager.
///
/// Tracks a linear editing history as two LIFO stacks of whole-buffer
/// snapshots plus a single baseline restore point. The host reads its
/// current content fresh on every call and installs whatever content the
/// manager hands back; the manager never holds a reference into the host.
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::HistoryConfig;
use crate::persistence::PersistenceLayer;
use crate::snapshot::TextSnapshot;

/// Manages undo/redo history for a single document.
///
/// Each document gets its own `HistoryManager` with independent stacks.
/// The manager can optionally persist the undo stack and baseline to disk
/// via a shared `PersistenceLayer`; the redo stack is never persisted.
///
/// Both stacks may be non-empty at the same time, and a fresh edit between
/// calls does not clear either stack. Callers decide when content enters
/// the history: only `undo` and `redo` themselves rotate the stacks, so
/// ordinary typing is not checkpointed separately.
pub struct HistoryManager {
    /// Content at the start of the current undo chain: the most recently
    /// restored value, or the initial (empty) content before any restore.
    baseline: String,
    /// Undo stack, most recent snapshot on top.
    undo_stack: Vec<TextSnapshot>,
    /// Redo stack, most recently displaced content on top.
    redo_stack: Vec<TextSnapshot>,
    /// Document identifier used as the persistence key.
    doc_id: String,
    /// Configuration parameters.
    config: HistoryConfig,
    /// Optional disk persistence (None = in-memory only).
    persistence: Option<Arc<PersistenceLayer>>,
    /// Whether in-memory state has changed since the last flush.
    dirty: bool,
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("doc_id", &self.doc_id)
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("baseline_len", &self.baseline.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl HistoryManager {
    /// Creates a new empty HistoryManager.
    ///
    /// The baseline starts as the empty string. Pass `persistence: None`
    /// for in-memory-only mode (useful in tests or for documents that
    /// don't need disk persistence).
    pub fn new(
        doc_id: String,
        config: HistoryConfig,
        persistence: Option<Arc<PersistenceLayer>>,
    ) -> Self {
        Self {
            baseline: String::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            doc_id,
            config,
            persistence,
            dirty: false,
        }
    }

    /// Creates an in-memory-only HistoryManager with default config.
    ///
    /// Convenience constructor for tests and simple usage.
    pub fn in_memory() -> Self {
        Self::new(String::from("test"), HistoryConfig::default(), None)
    }

    /// Loads existing history from disk, or creates a fresh manager.
    ///
    /// Restores the undo stack and baseline. The redo stack always starts
    /// empty. If no history exists on disk, behaves like `new()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence layer fails to read.
    pub fn load_or_new(
        doc_id: String,
        config: HistoryConfig,
        persistence: Option<Arc<PersistenceLayer>>,
    ) -> Result<Self> {
        let (undo_stack, baseline) = match &persistence {
            Some(pl) => {
                let stored = pl
                    .load_baseline(&doc_id)
                    .context("Failed to load document metadata")?;
                match stored {
                    Some(baseline) => {
                        let undo_stack = pl
                            .read_snapshots(&doc_id)
                            .context("Failed to load history from disk")?;
                        tracing::debug!(
                            doc_id,
                            snapshots = undo_stack.len(),
                            "restored undo history from disk"
                        );
                        (undo_stack, baseline)
                    }
                    None => (Vec::new(), String::new()),
                }
            }
            None => (Vec::new(), String::new()),
        };

        Ok(Self {
            baseline,
            undo_stack,
            redo_stack: Vec::new(),
            doc_id,
            config,
            persistence,
            dirty: false,
        })
    }

    /// Returns the document ID.
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    /// Undoes one step.
    ///
    /// `current` is the host's buffer content read fresh at call time.
    /// Returns the content the host should install. Never fails: with an
    /// empty undo stack the baseline is restored instead, and `current`
    /// still moves onto the redo stack.
    pub fn undo(&mut self, current: &str) -> String {
        let restored = match self.undo_stack.pop() {
            Some(snapshot) => {
                // Baseline tracks the most recently restored state.
                self.baseline = snapshot.text.clone();
                snapshot.into_text()
            }
            None => {
                tracing::debug!(doc_id = self.doc_id, "undo stack empty, restoring baseline");
                self.baseline.clone()
            }
        };
        self.redo_stack.push(TextSnapshot::capture(current));
        self.dirty = true;
        restored
    }

    /// Redoes one step.
    ///
    /// Mirror of [`Self::undo`]: pops the redo stack (falling back to the
    /// baseline when empty) and moves `current` onto the undo stack.
    pub fn redo(&mut self, current: &str) -> String {
        let restored = match self.redo_stack.pop() {
            Some(snapshot) => snapshot.into_text(),
            None => {
                tracing::debug!(doc_id = self.doc_id, "redo stack empty, restoring baseline");
                self.baseline.clone()
            }
        };
        self.undo_stack.push(TextSnapshot::capture(current));
        self.enforce_depth();
        self.dirty = true;
        restored
    }

    /// Whether the undo stack holds at least one snapshot.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether the redo stack holds at least one snapshot.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of snapshots on the undo stack.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of snapshots on the redo stack.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The current baseline content.
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Clears all history from memory and disk.
    ///
    /// # Errors
    ///
    /// Returns an error if disk cleanup fails.
    pub fn clear(&mut self) -> Result<()> {
        self.baseline.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.dirty = false;

        if let Some(pl) = &self.persistence {
            pl.delete_document(&self.doc_id)
                .context("Failed to clear history from disk")?;
        }
        Ok(())
    }

    /// Flushes the undo stack and baseline to disk.
    ///
    /// Called periodically and on shutdown. No-op if the manager is
    /// in-memory-only or nothing has changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk write fails.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(pl) = &self.persistence {
            pl.write_snapshots(&self.doc_id, &self.undo_stack)
                .context("Failed to flush history to disk")?;
            pl.save_baseline(&self.doc_id, &self.baseline)
                .context("Failed to save history baseline")?;
            self.dirty = false;
        }
        Ok(())
    }

    /// Deletes all persisted history for this document.
    ///
    /// # Errors
    ///
    /// Returns an error if disk cleanup fails.
    pub fn delete_history(&mut self) -> Result<()> {
        self.clear()
    }

    /// Drops the oldest undo snapshots when the depth cap is exceeded.
    fn enforce_depth(&mut self) {
        if self.undo_stack.len() > self.config.max_history_depth {
            let excess = self.undo_stack.len() - self.config.max_history_depth;
            self.undo_stack.drain(..excess);
        }
    }
}
