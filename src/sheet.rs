//! FILENAME: src/sheet.rs
//! PURPOSE: Manages the collection of cells (the sheet memory).
//! CONTEXT: This file defines the `SheetMemory` struct which acts as the
//! container for all cell data. It uses a sparse storage strategy
//! (HashMap) so large sheets with mostly empty cells stay cheap, and it
//! layers a label-keyed API ("A1", "B2") on top of the coordinate store.
//! The evaluator reads cells through the `CellReader` trait this type
//! implements; recalculation ordering across cells lives elsewhere.

use crate::cell::Cell;
use crate::coord::{label_to_coord, CellCoord};
use crate::evaluator::CellReader;
use std::collections::HashMap;

/// The SheetMemory struct holds the state of the spreadsheet data.
/// It uses a sparse representation (HashMap) mapping coordinates to Cells.
/// Row and Col are 0-based indices.
#[derive(Debug, Clone, Default)]
pub struct SheetMemory {
    /// Sparse storage: keys are (row, col), values are Cell instances.
    cells: HashMap<CellCoord, Cell>,

    /// Tracks the highest row index currently in use.
    max_row: u32,

    /// Tracks the highest column index currently in use.
    max_col: u32,
}

impl SheetMemory {
    /// Creates a new, empty SheetMemory.
    pub fn new() -> Self {
        SheetMemory {
            cells: HashMap::new(),
            max_row: 0,
            max_col: 0,
        }
    }

    /// Sets a cell at the specified coordinates.
    /// Updates max_row/max_col boundaries automatically.
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        if row > self.max_row {
            self.max_row = row;
        }
        if col > self.max_col {
            self.max_col = col;
        }
        self.cells.insert((row, col), cell);
    }

    /// Retrieves a reference to a cell at the specified coordinates.
    /// Returns None if the cell is empty (not stored).
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Retrieves a mutable reference to a cell, inserting a blank cell
    /// if none is stored at the coordinates yet.
    pub fn get_cell_mut(&mut self, row: u32, col: u32) -> &mut Cell {
        if row > self.max_row {
            self.max_row = row;
        }
        if col > self.max_col {
            self.max_col = col;
        }
        self.cells.entry((row, col)).or_default()
    }

    /// Sets a cell addressed by an A1-style label.
    /// Returns false (and stores nothing) if the label is malformed.
    pub fn set_cell_by_label(&mut self, label: &str, cell: Cell) -> bool {
        match label_to_coord(label) {
            Some((row, col)) => {
                self.set_cell(row, col, cell);
                true
            }
            None => false,
        }
    }

    /// Retrieves a cell addressed by an A1-style label.
    /// Returns None for malformed labels and for unset cells.
    pub fn get_cell_by_label(&self, label: &str) -> Option<&Cell> {
        let (row, col) = label_to_coord(label)?;
        self.get_cell(row, col)
    }

    /// Removes a cell from the sheet (clearing it).
    /// If the cell was at a boundary (max_row or max_col), recalculates bounds.
    pub fn clear_cell(&mut self, row: u32, col: u32) {
        let was_at_boundary = row == self.max_row || col == self.max_col;
        self.cells.remove(&(row, col));

        if was_at_boundary {
            self.recalculate_bounds();
        }
    }

    /// Recalculates max_row and max_col by scanning all cells.
    /// O(n) in the number of non-empty cells.
    fn recalculate_bounds(&mut self) {
        self.max_row = 0;
        self.max_col = 0;
        for &(row, col) in self.cells.keys() {
            if row > self.max_row {
                self.max_row = row;
            }
            if col > self.max_col {
                self.max_col = col;
            }
        }
    }

    /// The highest row index currently in use.
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// The highest column index currently in use.
    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    /// The number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl CellReader for SheetMemory {
    fn cell_by_label(&self, label: &str) -> Option<&Cell> {
        self.get_cell_by_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_by_coord() {
        let mut sheet = SheetMemory::new();
        sheet.set_cell(0, 0, Cell::with_value(10.0));

        let cell = sheet.get_cell(0, 0);
        assert!(cell.is_some());
        assert_eq!(cell.unwrap().value(), 10.0);
        assert!(sheet.get_cell(5, 5).is_none());
    }

    #[test]
    fn test_set_and_get_by_label() {
        let mut sheet = SheetMemory::new();
        assert!(sheet.set_cell_by_label("B2", Cell::with_value(7.0)));

        assert_eq!(sheet.get_cell_by_label("B2").unwrap().value(), 7.0);
        assert_eq!(sheet.get_cell(1, 1).unwrap().value(), 7.0);
    }

    #[test]
    fn test_malformed_label_is_rejected() {
        let mut sheet = SheetMemory::new();
        assert!(!sheet.set_cell_by_label("2B", Cell::new()));
        assert!(sheet.get_cell_by_label("not a label").is_none());
        assert_eq!(sheet.cell_count(), 0);
    }

    #[test]
    fn test_bounds_tracking() {
        let mut sheet = SheetMemory::new();
        sheet.set_cell(3, 7, Cell::with_value(1.0));
        sheet.set_cell(5, 2, Cell::with_value(2.0));
        assert_eq!(sheet.max_row(), 5);
        assert_eq!(sheet.max_col(), 7);

        sheet.clear_cell(3, 7);
        assert_eq!(sheet.max_row(), 5);
        assert_eq!(sheet.max_col(), 2);

        sheet.clear_cell(5, 2);
        assert_eq!(sheet.max_row(), 0);
        assert_eq!(sheet.max_col(), 0);
    }

    #[test]
    fn test_get_cell_mut_inserts_blank() {
        let mut sheet = SheetMemory::new();
        sheet.get_cell_mut(2, 2).set_value(9.0);
        assert_eq!(sheet.get_cell_by_label("C3").unwrap().value(), 9.0);
        assert_eq!(sheet.max_row(), 2);
    }
}
