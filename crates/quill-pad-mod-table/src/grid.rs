/// Row-major grid of string cells collected during table composition.
use crate::error::TableError;

/// A transient `rows × cols` grid of string cells.
///
/// Cells start empty; an empty string is a valid value and serializes as
/// two spaces between pipes. The grid only exists while a composition is
/// active and is consumed when it is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    rows: usize,
    cols: usize,
    /// Cell values in row-major order, `rows * cols` entries.
    cells: Vec<String>,
}

impl TableGrid {
    /// Creates a grid of empty cells.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self, TableError> {
        if rows == 0 || cols == 0 {
            return Err(TableError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![String::new(); rows * cols],
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cell value, or `None` if the position is out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.index(row, col).map(|i| self.cells[i].as_str())
    }

    /// Stores a value into a cell. Returns false if the position is out
    /// of range, leaving the grid unchanged.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Serializes the grid into a pipe-delimited text block.
    ///
    /// Each row becomes `"| cell | cell |"` followed by a newline, so the
    /// block always has exactly `rows` lines with `cols + 1` pipes each.
    /// Cell content is sanitized to preserve that shape: `|` becomes `¦`
    /// and line breaks become spaces. Stored values are not modified.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push_str("| ");
                if let Some(cell) = self.get(row, col) {
                    out.push_str(&sanitize_cell(cell));
                }
                out.push(' ');
            }
            out.push_str("|\n");
        }
        out
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

/// Replaces characters that would break the serialized table shape.
fn sanitize_cell(cell: &str) -> String {
    cell.chars()
        .map(|c| match c {
            '|' => '¦',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            TableGrid::new(0, 1),
            Err(TableError::InvalidDimensions { rows: 0, cols: 1 })
        );
        assert_eq!(
            TableGrid::new(3, 0),
            Err(TableError::InvalidDimensions { rows: 3, cols: 0 })
        );
        assert_eq!(
            TableGrid::new(0, 0),
            Err(TableError::InvalidDimensions { rows: 0, cols: 0 })
        );
    }

    #[test]
    fn test_new_grid_starts_empty() {
        let grid = TableGrid::new(2, 3).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(grid.get(row, col), Some(""));
            }
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = TableGrid::new(2, 2).unwrap();
        assert!(grid.set(0, 1, "top right"));
        assert!(grid.set(1, 0, "bottom left"));
        assert_eq!(grid.get(0, 1), Some("top right"));
        assert_eq!(grid.get(1, 0), Some("bottom left"));
        assert_eq!(grid.get(0, 0), Some(""));
    }

    #[test]
    fn test_set_out_of_range_is_rejected() {
        let mut grid = TableGrid::new(2, 2).unwrap();
        assert!(!grid.set(2, 0, "x"));
        assert!(!grid.set(0, 2, "x"));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_serialize_two_by_two() {
        let mut grid = TableGrid::new(2, 2).unwrap();
        grid.set(0, 0, "a");
        grid.set(0, 1, "b");
        grid.set(1, 0, "c");
        grid.set(1, 1, "d");
        assert_eq!(grid.serialize(), "| a | b |\n| c | d |\n");
    }

    #[test]
    fn test_serialize_empty_cells() {
        let grid = TableGrid::new(1, 2).unwrap();
        // Empty cells leave two spaces between pipes.
        assert_eq!(grid.serialize(), "|  |  |\n");
    }

    #[test]
    fn test_serialize_single_cell() {
        let mut grid = TableGrid::new(1, 1).unwrap();
        grid.set(0, 0, "only");
        assert_eq!(grid.serialize(), "| only |\n");
    }

    #[test]
    fn test_serialize_shape_for_arbitrary_content() {
        // r lines and c+1 pipes per line, even for hostile cell content.
        let contents = ["plain", "", "has | pipe", "two||pipes", "line\nbreak", "\r\n"];
        let (rows, cols) = (3, 2);
        let mut grid = TableGrid::new(rows, cols).unwrap();
        for (i, content) in contents.iter().enumerate() {
            grid.set(i / cols, i % cols, *content);
        }

        let block = grid.serialize();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), rows);
        for line in lines {
            let pipes = line.chars().filter(|&c| c == '|').count();
            assert_eq!(pipes, cols + 1, "line {line:?}");
        }
    }

    #[test]
    fn test_serialize_substitutes_pipes_and_newlines() {
        let mut grid = TableGrid::new(1, 1).unwrap();
        grid.set(0, 0, "a|b\nc");
        assert_eq!(grid.serialize(), "| a¦b c |\n");
        // The stored value stays verbatim.
        assert_eq!(grid.get(0, 0), Some("a|b\nc"));
    }
}
