/// Error type for table composition.
use thiserror::Error;

/// Recoverable conditions raised by the table composer.
///
/// None of these are fatal: the caller simply ignores the requested
/// action and the composer's state is left unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// Composition was requested with a zero-sized grid.
    #[error("table dimensions must be at least 1x1 (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A cell was confirmed while no composition is active.
    #[error("no table composition is active")]
    NotComposing,

    /// A second composition was started while one is already active.
    #[error("a table composition is already active")]
    AlreadyComposing,
}
