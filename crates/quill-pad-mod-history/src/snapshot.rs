/// Snapshot type stored on the undo/redo stacks.
use serde::{Deserialize, Serialize};

/// An immutable whole-buffer capture taken at a point in time.
///
/// The history system stores full buffer contents rather than diffs.
/// This trades memory for simplicity: restoring a snapshot is a single
/// buffer replacement with no replay step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSnapshot {
    /// Full buffer content at capture time.
    pub text: String,
}

impl TextSnapshot {
    /// Captures the given content as a snapshot.
    pub fn capture(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Consumes the snapshot, yielding the captured content.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl From<&str> for TextSnapshot {
    fn from(text: &str) -> Self {
        Self::capture(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_and_into_text() {
        let snap = TextSnapshot::capture("hello\nworld");
        assert_eq!(snap.text, "hello\nworld");
        assert_eq!(snap.into_text(), "hello\nworld");
    }

    #[test]
    fn test_serde_roundtrip() {
        let snap = TextSnapshot::capture("some buffer content");
        let bytes = bincode::serialize(&snap).expect("serialize");
        let decoded: TextSnapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, snap);
    }

    #[test]
    fn test_empty_snapshot_roundtrip() {
        let snap = TextSnapshot::capture("");
        let bytes = bincode::serialize(&snap).expect("serialize");
        let decoded: TextSnapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert!(decoded.text.is_empty());
    }

    #[test]
    fn test_large_snapshot_roundtrip() {
        let snap = TextSnapshot::capture("x".repeat(100_000));
        let bytes = bincode::serialize(&snap).expect("serialize");
        let decoded: TextSnapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded.text.len(), 100_000);
    }
}
