/// Modal state machine for cell-by-cell table entry.
///
/// A composition starts with fixed dimensions, collects one cell value per
/// confirmation keystroke in row-major order, and flushes the serialized
/// grid the instant the cursor would advance past the last cell. At most
/// one composition is active per host surface.
use crate::error::TableError;
use crate::grid::TableGrid;

/// The grid cell awaiting confirmation.
///
/// Invariant while a composition is active: `row < rows` and `col < cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellCursor {
    pub row: usize,
    pub col: usize,
}

/// Result of confirming a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The composition continues; focus moves to this cell.
    Advanced(CellCursor),
    /// The last cell was confirmed: the grid was serialized and discarded,
    /// and the composer is inactive again. The host inserts this block
    /// (plus a trailing newline) where composition began.
    Flushed(String),
}

/// One active composition: the grid being filled and the current cell.
#[derive(Debug)]
struct Session {
    grid: TableGrid,
    cursor: CellCursor,
}

/// The table composer state machine.
///
/// `Inactive` between compositions (`session` is `None`) and `Composing`
/// while a grid is being filled. All transitions run synchronously inside
/// the host's event handler; nothing is retained across calls beyond the
/// session itself.
#[derive(Debug, Default)]
pub struct TableComposer {
    session: Option<Session>,
}

impl TableComposer {
    /// Creates an inactive composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a composition is currently active.
    pub fn is_composing(&self) -> bool {
        self.session.is_some()
    }

    /// The cell awaiting confirmation, if a composition is active.
    pub fn cursor(&self) -> Option<CellCursor> {
        self.session.as_ref().map(|s| s.cursor)
    }

    /// The grid being filled, if a composition is active.
    pub fn grid(&self) -> Option<&TableGrid> {
        self.session.as_ref().map(|s| &s.grid)
    }

    /// Starts a composition with a fresh grid of empty cells, cursor at
    /// the top-left cell.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero-sized grid and
    /// `AlreadyComposing` if a composition is active; in both cases no
    /// state is created or changed.
    pub fn start(&mut self, rows: usize, cols: usize) -> Result<(), TableError> {
        if self.session.is_some() {
            return Err(TableError::AlreadyComposing);
        }
        let grid = TableGrid::new(rows, cols)?;
        tracing::debug!(rows, cols, "table composition started");
        self.session = Some(Session {
            grid,
            cursor: CellCursor::default(),
        });
        Ok(())
    }

    /// Stores `value` into the current cell and advances the cursor in
    /// row-major order, wrapping to the next row at the end of each row.
    ///
    /// Advancing past the last cell completes the composition: the grid
    /// is serialized, discarded, and returned as [`ConfirmOutcome::Flushed`].
    ///
    /// # Errors
    ///
    /// Returns `NotComposing` if no composition is active.
    pub fn confirm_cell(&mut self, value: &str) -> Result<ConfirmOutcome, TableError> {
        let (cursor, done) = {
            let session = self.session.as_mut().ok_or(TableError::NotComposing)?;
            session.grid.set(session.cursor.row, session.cursor.col, value);

            session.cursor.col += 1;
            if session.cursor.col >= session.grid.cols() {
                session.cursor.col = 0;
                session.cursor.row += 1;
            }
            (session.cursor, session.cursor.row >= session.grid.rows())
        };

        if done {
            let finished = self.session.take().ok_or(TableError::NotComposing)?;
            let block = finished.grid.serialize();
            tracing::debug!(
                rows = finished.grid.rows(),
                cols = finished.grid.cols(),
                "table composition flushed"
            );
            return Ok(ConfirmOutcome::Flushed(block));
        }
        Ok(ConfirmOutcome::Advanced(cursor))
    }

    /// Abandons the active composition, discarding the grid with no text
    /// produced. No-op when already inactive.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(
                row = session.cursor.row,
                col = session.cursor.col,
                "table composition cancelled"
            );
        }
    }
}
