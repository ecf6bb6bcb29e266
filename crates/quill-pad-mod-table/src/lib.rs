/// Modal table composition.
///
/// Provides a `TableComposer` that collects `rows × cols` string cells one
/// confirmation at a time and serializes the finished grid into a
/// pipe-delimited text block for the host editor to insert.
pub mod composer;
pub mod error;
pub mod grid;

pub use composer::{CellCursor, ConfirmOutcome, TableComposer};
pub use error::TableError;
pub use grid::TableGrid;
