/// Core editing model: text buffer, caret, documents, search, and the
/// wiring between a document and its history and table-composition
/// machinery.
pub mod buffer;
pub mod caret;
pub mod document;
pub mod search;

pub use buffer::TextBuffer;
pub use caret::{char_to_pos, clamp_position, pos_to_char, Caret, Position};
pub use document::Document;
pub use search::{find_all, replace_all, SearchMatch, SearchOptions};

pub use quill_pad_mod_history::{
    config::{doc_id_for_path, generate_unsaved_id},
    HistoryConfig, HistoryManager, PersistenceLayer,
};
pub use quill_pad_mod_table::{CellCursor, ConfirmOutcome, TableComposer, TableError, TableGrid};
