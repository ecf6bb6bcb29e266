// Integration tests for table composition.
//
// These tests run whole compositions end to end, the way a host editor
// drives the composer from its confirmation-key handler.

use quill_pad_mod_table::{CellCursor, ConfirmOutcome, TableComposer, TableError};

/// Runs a full composition, returning the flushed block.
fn compose(rows: usize, cols: usize, values: &[&str]) -> String {
    assert_eq!(values.len(), rows * cols);
    let mut composer = TableComposer::new();
    composer.start(rows, cols).expect("start");

    for (i, value) in values.iter().enumerate() {
        match composer.confirm_cell(value).expect("confirm") {
            ConfirmOutcome::Advanced(_) => assert!(i + 1 < values.len()),
            ConfirmOutcome::Flushed(block) => {
                assert_eq!(i + 1, values.len());
                return block;
            }
        }
    }
    panic!("composition never flushed");
}

#[test]
fn test_three_by_three_composition() {
    let block = compose(3, 3, &["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
    assert_eq!(block, "| a | b | c |\n| d | e | f |\n| g | h | i |\n");
}

#[test]
fn test_single_row_composition() {
    let block = compose(1, 4, &["w", "x", "y", "z"]);
    assert_eq!(block, "| w | x | y | z |\n");
}

#[test]
fn test_single_column_composition() {
    let block = compose(3, 1, &["top", "mid", "bottom"]);
    assert_eq!(block, "| top |\n| mid |\n| bottom |\n");
}

#[test]
fn test_cursor_path_is_row_major() {
    let mut composer = TableComposer::new();
    composer.start(2, 2).expect("start");

    let mut path = vec![composer.cursor().expect("cursor")];
    for value in ["a", "b", "c"] {
        if let ConfirmOutcome::Advanced(cursor) = composer.confirm_cell(value).expect("confirm") {
            path.push(cursor);
        }
    }

    let expected: Vec<CellCursor> = [(0, 0), (0, 1), (1, 0), (1, 1)]
        .iter()
        .map(|&(row, col)| CellCursor { row, col })
        .collect();
    assert_eq!(path, expected);
}

#[test]
fn test_cancel_then_fresh_composition() {
    let mut composer = TableComposer::new();
    composer.start(2, 2).expect("start");
    composer.confirm_cell("abandoned").expect("confirm");
    composer.cancel();

    // A new composition starts clean at the origin.
    composer.start(1, 2).expect("restart");
    assert_eq!(composer.cursor(), Some(CellCursor { row: 0, col: 0 }));
    composer.confirm_cell("fresh").expect("confirm");
    let outcome = composer.confirm_cell("start").expect("confirm");
    assert_eq!(
        outcome,
        ConfirmOutcome::Flushed("| fresh | start |\n".to_string())
    );
}

#[test]
fn test_invalid_dimensions_leave_composer_reusable() {
    let mut composer = TableComposer::new();
    assert_eq!(
        composer.start(0, 0),
        Err(TableError::InvalidDimensions { rows: 0, cols: 0 })
    );
    // The failed start created nothing; a valid start works.
    composer.start(1, 1).expect("start");
    assert!(composer.is_composing());
}

#[test]
fn test_pipe_heavy_content_keeps_table_shape() {
    let block = compose(2, 2, &["a|b", "||", "", "c\nd"]);
    for line in block.lines() {
        assert_eq!(line.chars().filter(|&c| c == '|').count(), 3);
    }
    assert_eq!(block.lines().count(), 2);
}
