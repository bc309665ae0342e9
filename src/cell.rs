//! FILENAME: src/cell.rs
//! PURPOSE: Defines the fundamental data structures for a single spreadsheet cell.
//! CONTEXT: This file contains the `Cell` struct and the `CellError` enum.
//! A cell separates the user's input (a pre-tokenized formula) from the
//! calculated result (a cached numeric value). Errors are modeled as a
//! closed enum so that evaluation code can match on them exhaustively.

use serde::{Deserialize, Serialize};

/// A single formula token. Tokens are opaque strings produced by the
/// tokenizer; classification (number, operator, parenthesis, cell label)
/// happens on demand during evaluation.
pub type Token = String;

/// An ordered token sequence. An empty sequence means a blank cell.
pub type Formula = Vec<Token>;

/// Represents the possible errors a cell can hold (e.g., #DIV/0!).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellError {
    /// The formula had zero tokens.
    EmptyFormula,
    /// Unrecognized token at term position, or unconsumed trailing tokens.
    InvalidFormula,
    /// The token sequence ran out while a term was still expected.
    PartialFormula,
    /// An opened sub-expression was never closed by `)`.
    MissingParentheses,
    /// A division's right operand evaluated to exactly zero.
    DivideByZero,
    /// A referenced cell is blank (no formula, no error of its own).
    InvalidCell,
    /// An error produced outside the evaluator and stored on a cell,
    /// e.g. the recalculation scheduler's circular-reference marker.
    /// Passed through verbatim when the cell is referenced.
    External(String),
}

impl CellError {
    /// The display code for this error, in spreadsheet style.
    pub fn message(&self) -> &str {
        match self {
            CellError::EmptyFormula => "#EMPTY!",
            CellError::InvalidFormula => "#INVALID!",
            CellError::PartialFormula => "#PARTIAL!",
            CellError::MissingParentheses => "#PAREN!",
            CellError::DivideByZero => "#DIV/0!",
            CellError::InvalidCell => "#REF!",
            CellError::External(message) => message,
        }
    }
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The atomic unit of the spreadsheet.
///
/// Holds the tokenized formula the user entered, the value the last
/// recalculation cached, and the error (if any) that recalculation left
/// behind. The evaluator reads referenced cells through these fields
/// exactly one hop deep; it never re-evaluates a referenced formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    formula: Formula,
    value: f64,
    error: Option<CellError>,
}

impl Cell {
    /// Creates a blank cell: no formula, value 0, no error.
    pub fn new() -> Self {
        Cell {
            formula: Vec::new(),
            value: 0.0,
            error: None,
        }
    }

    /// Creates a cell holding a formula that has not been evaluated yet.
    pub fn with_formula(formula: Formula) -> Self {
        Cell {
            formula,
            value: 0.0,
            error: None,
        }
    }

    /// Creates a cell with a cached value and no formula tokens.
    pub fn with_value(value: f64) -> Self {
        Cell {
            formula: Vec::new(),
            value,
            error: None,
        }
    }

    pub fn formula(&self) -> &[Token] {
        &self.formula
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn error(&self) -> Option<&CellError> {
        self.error.as_ref()
    }

    /// The error display code, or an empty string when no error is set.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(e) => e.message().to_string(),
            None => String::new(),
        }
    }

    pub fn set_formula(&mut self, formula: Formula) {
        self.formula = formula;
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn set_error(&mut self, error: Option<CellError>) {
        self.error = error;
    }

    /// Resets the cell to its blank state.
    pub fn clear(&mut self) {
        self.formula.clear();
        self.value = 0.0;
        self.error = None;
    }

    /// Returns the display value of the cell as a String: the error code
    /// when an error is set, otherwise the cached value formatted without
    /// unnecessary decimal places.
    pub fn display_value(&self) -> String {
        if let Some(error) = &self.error {
            return error.message().to_string();
        }
        if self.value.fract() == 0.0 && self.value.abs() < 1e15 {
            format!("{:.0}", self.value)
        } else {
            format!("{}", self.value)
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}
