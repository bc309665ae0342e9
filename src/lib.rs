//! FILENAME: src/lib.rs
//! PURPOSE: Main library entry point for the formula evaluation engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! PIPELINE: Tokenized Formula --> Evaluator --> (value, error)
//!
//! The tokenizer, the recalculation scheduler, and the UI live outside
//! this crate. What lives here: the cell data model, the label
//! classifier, a sparse label-addressable cell store, and the
//! recursive-descent evaluator that turns one cell's token sequence into
//! a number or a `CellError`.

pub mod cell;
pub mod coord;
pub mod evaluator;
pub mod sheet;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellError, Formula, Token};
pub use coord::{
    col_to_index, coord_to_label, index_to_col, is_valid_cell_label, label_to_coord, CellCoord,
};
pub use evaluator::{CellReader, Evaluation, Evaluator};
pub use sheet::SheetMemory;

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Formula {
        raw.iter().map(|t| t.to_string()).collect()
    }

    /// Evaluates a cell's formula and writes the outcome back, the way
    /// the surrounding recalculation pass would.
    fn recalc(sheet: &mut SheetMemory, label: &str) {
        let formula = sheet
            .get_cell_by_label(label)
            .map(|cell| cell.formula().to_vec())
            .unwrap_or_default();

        let outcome = Evaluator::new(sheet).evaluate(&formula);

        let (row, col) = label_to_coord(label).expect("test labels are well-formed");
        let cell = sheet.get_cell_mut(row, col);
        cell.set_value(outcome.result());
        cell.set_error(outcome.error().cloned());
    }

    #[test]
    fn integration_test_reference_chain() {
        let mut sheet = SheetMemory::new();

        // A1 = 10, B1 = 20, C1 = A1 + B1
        sheet.set_cell_by_label("A1", Cell::with_formula(tokens(&["10"])));
        sheet.set_cell_by_label("B1", Cell::with_formula(tokens(&["20"])));
        sheet.set_cell_by_label("C1", Cell::with_formula(tokens(&["A1", "+", "B1"])));

        // Recalculate in dependency order (the scheduler's job, mimicked
        // here by hand).
        recalc(&mut sheet, "A1");
        recalc(&mut sheet, "B1");
        recalc(&mut sheet, "C1");

        let c1 = sheet.get_cell_by_label("C1").unwrap();
        assert_eq!(c1.value(), 30.0);
        assert_eq!(c1.error(), None);
        assert_eq!(c1.display_value(), "30");
    }

    #[test]
    fn integration_test_error_propagates_one_hop() {
        let mut sheet = SheetMemory::new();

        // A1 = 1 / 0, B1 = A1 * 2
        sheet.set_cell_by_label("A1", Cell::with_formula(tokens(&["1", "/", "0"])));
        sheet.set_cell_by_label("B1", Cell::with_formula(tokens(&["A1", "*", "2"])));

        recalc(&mut sheet, "A1");
        recalc(&mut sheet, "B1");

        let a1 = sheet.get_cell_by_label("A1").unwrap();
        assert_eq!(a1.error(), Some(&CellError::DivideByZero));
        assert_eq!(a1.display_value(), "#DIV/0!");

        let b1 = sheet.get_cell_by_label("B1").unwrap();
        assert_eq!(b1.error(), Some(&CellError::DivideByZero));
    }

    #[test]
    fn integration_test_blank_reference() {
        let mut sheet = SheetMemory::new();
        sheet.set_cell_by_label("B1", Cell::with_formula(tokens(&["A1"])));

        recalc(&mut sheet, "B1");

        let b1 = sheet.get_cell_by_label("B1").unwrap();
        assert_eq!(b1.value(), 0.0);
        assert_eq!(b1.error(), Some(&CellError::InvalidCell));
    }

    #[test]
    fn integration_test_empty_formula_sentinel() {
        let mut sheet = SheetMemory::new();
        sheet.set_cell_by_label("A1", Cell::new());

        recalc(&mut sheet, "A1");

        // Evaluating a blank cell records the sentinel on the cell...
        let a1 = sheet.get_cell_by_label("A1").unwrap();
        assert_eq!(a1.error(), Some(&CellError::EmptyFormula));

        // ...which a referencing formula reports as an invalid cell
        // rather than passing the sentinel through.
        sheet.set_cell_by_label("B1", Cell::with_formula(tokens(&["A1", "+", "1"])));
        recalc(&mut sheet, "B1");
        let b1 = sheet.get_cell_by_label("B1").unwrap();
        assert_eq!(b1.error(), Some(&CellError::InvalidCell));
    }

    #[test]
    fn integration_test_common_formulas() {
        let sheet = SheetMemory::new();
        let evaluator = Evaluator::new(&sheet);

        let out = evaluator.evaluate(&tokens(&["3", "+", "4"]));
        assert_eq!((out.result(), out.error_message()), (7.0, String::new()));

        let out = evaluator.evaluate(&tokens(&["(", "1", "+", "2", ")", "*", "3"]));
        assert_eq!((out.result(), out.error_message()), (9.0, String::new()));

        let out = evaluator.evaluate(&tokens(&["5", "/", "0"]));
        assert_eq!(out.result(), f64::INFINITY);
        assert_eq!(out.error(), Some(&CellError::DivideByZero));

        let out = evaluator.evaluate(&tokens(&["(", "1", "+", "2"]));
        assert_eq!(out.result(), 3.0);
        assert_eq!(out.error(), Some(&CellError::MissingParentheses));

        let out = evaluator.evaluate(&[]);
        assert_eq!(out.result(), 0.0);
        assert_eq!(out.error(), Some(&CellError::EmptyFormula));
    }
}
