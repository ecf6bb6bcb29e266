/// Disk persistence layer backed by redb.
///
/// Uses a single redb database file with two tables:
/// - `snapshots`: stores serialized `TextSnapshot` entries keyed by
///   `"{doc_id}#{index:020}"`, where `index` is the stack position
///   (0 = bottom of the undo stack)
/// - `meta`: stores per-document metadata (the baseline) keyed by `doc_id`
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::snapshot::TextSnapshot;

/// Snapshot table: composite string key → bincode-serialized TextSnapshot.
const SNAPSHOT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Metadata table: doc_id → bincode-serialized DocumentMeta.
const META_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

/// Per-document metadata persisted alongside the undo stack.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct DocumentMeta {
    baseline: String,
}

/// Formats a snapshot table key from doc_id and stack index.
///
/// The index is zero-padded to 20 digits to ensure correct lexicographic
/// ordering in the B-tree.
fn snapshot_key(doc_id: &str, index: u64) -> String {
    format!("{doc_id}#{index:020}")
}

/// Returns the exclusive range bounds for all snapshot entries of a document.
///
/// Uses `#` as separator and `$` (one ASCII codepoint above `#`) as the
/// exclusive upper bound, ensuring the range captures exactly the entries
/// for the given doc_id.
fn doc_range(doc_id: &str) -> (String, String) {
    let start = format!("{doc_id}#");
    let end = format!("{doc_id}$");
    (start, end)
}

/// Persistence layer for undo history backed by redb.
///
/// Thread-safe: redb supports concurrent readers and serialized writers.
/// Shared across documents via `Arc<PersistenceLayer>`.
pub struct PersistenceLayer {
    db: Database,
}

impl std::fmt::Debug for PersistenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceLayer").finish()
    }
}

impl PersistenceLayer {
    /// Opens or creates the history database in the given directory.
    ///
    /// Creates the directory and database file if they don't exist.
    /// Initializes tables on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open(data_dir: &Path) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("history.redb");
        let db = Database::create(&db_path)
            .with_context(|| format!("Failed to open history database: {}", db_path.display()))?;

        // Ensure tables exist
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to create snapshot table")?;
            let _ = write_txn
                .open_table(META_TABLE)
                .context("Failed to create meta table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        Ok(Arc::new(Self { db }))
    }

    /// Replaces the stored undo stack for a document.
    ///
    /// The stack can shrink between flushes (undo pops entries), so the
    /// document's existing entries are removed before the new stack is
    /// written, all within one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn write_snapshots(&self, doc_id: &str, snapshots: &[TextSnapshot]) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to open snapshot table")?;

            let (start, end) = doc_range(doc_id);
            let stale_keys: Vec<String> = table
                .range::<&str>(start.as_str()..end.as_str())
                .context("Failed to range query snapshot table")?
                .filter_map(|entry| entry.ok().map(|(k, _)| k.value().to_string()))
                .collect();
            for key in &stale_keys {
                table
                    .remove(key.as_str())
                    .context("Failed to remove stale snapshot")?;
            }

            for (index, snapshot) in snapshots.iter().enumerate() {
                let key = snapshot_key(doc_id, index as u64);
                let bytes =
                    bincode::serialize(snapshot).context("Failed to serialize snapshot")?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .context("Failed to insert snapshot")?;
            }
        }
        write_txn
            .commit()
            .context("Failed to commit write transaction")?;
        Ok(())
    }

    /// Reads the stored undo stack for a document, bottom first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction or deserialization fails.
    pub fn read_snapshots(&self, doc_id: &str) -> Result<Vec<TextSnapshot>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SNAPSHOT_TABLE)
            .context("Failed to open snapshot table")?;

        let (start, end) = doc_range(doc_id);
        let mut snapshots = Vec::new();

        for entry in table
            .range::<&str>(start.as_str()..end.as_str())
            .context("Failed to range query snapshot table")?
        {
            let (_, value_guard) = entry.context("Failed to read snapshot entry")?;
            let snapshot: TextSnapshot = bincode::deserialize(value_guard.value())
                .context("Failed to deserialize snapshot")?;
            snapshots.push(snapshot);
        }

        Ok(snapshots)
    }

    /// Counts the number of snapshots stored for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn count_snapshots(&self, doc_id: &str) -> Result<usize> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SNAPSHOT_TABLE)
            .context("Failed to open snapshot table")?;

        let (start, end) = doc_range(doc_id);
        let count = table
            .range::<&str>(start.as_str()..end.as_str())
            .context("Failed to range query for count")?
            .count();

        Ok(count)
    }

    /// Removes all snapshots and metadata for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn delete_document(&self, doc_id: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to open snapshot table")?;

            let (start, end) = doc_range(doc_id);
            let keys_to_remove: Vec<String> = table
                .range::<&str>(start.as_str()..end.as_str())
                .context("Failed to range query for deletion")?
                .filter_map(|entry| entry.ok().map(|(k, _)| k.value().to_string()))
                .collect();

            for key in &keys_to_remove {
                table
                    .remove(key.as_str())
                    .context("Failed to remove entry")?;
            }
        }
        {
            let mut meta_table = write_txn
                .open_table(META_TABLE)
                .context("Failed to open meta table")?;
            let _ = meta_table.remove(doc_id);
        }
        write_txn.commit().context("Failed to commit deletion")?;
        Ok(())
    }

    /// Saves the baseline content for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn save_baseline(&self, doc_id: &str, baseline: &str) -> Result<()> {
        let meta = DocumentMeta {
            baseline: baseline.to_string(),
        };
        let bytes = bincode::serialize(&meta).context("Failed to serialize document metadata")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(META_TABLE)
                .context("Failed to open meta table")?;
            table
                .insert(doc_id, bytes.as_slice())
                .context("Failed to insert metadata")?;
        }
        write_txn.commit().context("Failed to commit metadata")?;
        Ok(())
    }

    /// Loads the baseline content for a document.
    ///
    /// Returns `None` if no history exists for this document.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction or deserialization fails.
    pub fn load_baseline(&self, doc_id: &str) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(META_TABLE)
            .context("Failed to open meta table")?;

        match table.get(doc_id).context("Failed to read metadata")? {
            Some(guard) => {
                let meta: DocumentMeta = bincode::deserialize(guard.value())
                    .context("Failed to deserialize metadata")?;
                Ok(Some(meta.baseline))
            }
            None => Ok(None),
        }
    }

    /// Lists all document IDs that have stored metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(META_TABLE)
            .context("Failed to open meta table")?;

        let mut doc_ids = Vec::new();
        for entry in table.iter().context("Failed to iterate meta table")? {
            let (key_guard, _) = entry.context("Failed to read meta entry")?;
            doc_ids.push(key_guard.value().to_string());
        }
        Ok(doc_ids)
    }
}
