/// Snapshot-based undo/redo history.
///
/// Provides a `HistoryManager` that keeps whole-buffer snapshots on a pair
/// of LIFO stacks plus a baseline restore point, optionally persisted to an
/// embedded key-value store (redb) so undo history survives across sessions.
pub mod config;
pub mod manager;
pub mod persistence;
pub mod snapshot;

pub use config::HistoryConfig;
pub use manager::HistoryManager;
pub use persistence::PersistenceLayer;
pub use snapshot::TextSnapshot;
