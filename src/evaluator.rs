//! FILENAME: src/evaluator.rs
//! PURPOSE: Evaluates a pre-tokenized formula to compute a cell value.
//! CONTEXT: The tokenizer has already split the raw formula text into an
//! ordered sequence of string tokens. This module walks that sequence with
//! a recursive descent over the grammar
//!
//!   formula -> sum
//!   sum     -> product (('+' | '-') product)*
//!   product -> term (('*' | '/') term | '+/-')*
//!   term    -> number | '(' sum ')' | cell label
//!
//! and produces either a numeric result or a `CellError`. Cell references
//! are resolved one hop through the `CellReader` trait: the referenced
//! cell's cached value and error are read as-is, never re-evaluated.
//!
//! ERROR MODEL: once an error is flagged the evaluation is frozen — every
//! grammar function returns the last stable result without consuming more
//! tokens. The one exception is the postfix `+/-` sign operator, which
//! clears a previously flagged error when a live product chain consumes
//! it (see `product`).

use crate::cell::{Cell, CellError, Token};
use crate::coord::is_valid_cell_label;

/// Read access to cells by label. This is the seam between the evaluator
/// and whatever stores cell state; `SheetMemory` is the in-crate backend.
///
/// Returning `None` for a label (unknown, out of bounds, malformed) is
/// always safe: the evaluator reports it as `CellError::InvalidCell`.
pub trait CellReader {
    fn cell_by_label(&self, label: &str) -> Option<&Cell>;
}

/// The outcome of one `evaluate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    result: f64,
    error: Option<CellError>,
}

impl Evaluation {
    /// The computed value: 0 for an empty formula, or the last stable
    /// value preceding an error when one occurred.
    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn error(&self) -> Option<&CellError> {
        self.error.as_ref()
    }

    /// The error display code, or an empty string on success.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(e) => e.message().to_string(),
            None => String::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-call evaluation state, threaded by `&mut` through the descent.
/// `last_result` is the value the evaluation falls back to once an error
/// freezes progress.
struct EvalState {
    error: Option<CellError>,
    last_result: f64,
}

impl EvalState {
    fn new() -> Self {
        EvalState {
            error: None,
            last_result: 0.0,
        }
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }

    fn fail(&mut self, error: CellError) {
        self.error = Some(error);
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

/// A non-destructive cursor over the token sequence. Owned by one
/// `evaluate` call; the underlying slice is never mutated.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        TokenCursor { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// The postfix sign-flip operator token.
const SIGN_FLIP: &str = "+/-";

/// Returns true for the operators handled at product level.
fn is_product_operator(token: &str) -> bool {
    matches!(token, "*" | "/" | SIGN_FLIP)
}

fn parse_number(token: &str) -> Option<f64> {
    // "NaN" parses but is not a numeric literal.
    token.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// The formula evaluator.
/// Holds a reference to the cell store for reference lookups and no
/// evaluation state of its own, so one instance can serve any number of
/// sequential or concurrent `evaluate` calls.
pub struct Evaluator<'a, S: CellReader> {
    sheet: &'a S,
}

impl<'a, S: CellReader> Evaluator<'a, S> {
    /// Creates a new Evaluator reading cells from `sheet`.
    pub fn new(sheet: &'a S) -> Self {
        Evaluator { sheet }
    }

    /// Evaluates a token sequence and returns the result/error pair.
    ///
    /// An empty sequence yields `(0, EmptyFormula)` without descending.
    /// Tokens left unconsumed after a clean top-level parse yield
    /// `InvalidFormula` with the result reverting to the last stable
    /// value.
    pub fn evaluate(&self, formula: &[Token]) -> Evaluation {
        if formula.is_empty() {
            return Evaluation {
                result: 0.0,
                error: Some(CellError::EmptyFormula),
            };
        }

        let mut state = EvalState::new();
        let mut cursor = TokenCursor::new(formula);

        let mut result = self.sum(&mut cursor, &mut state);

        if !cursor.is_exhausted() && !state.failed() {
            state.fail(CellError::InvalidFormula);
        }
        if state.failed() {
            result = state.last_result;
        }

        Evaluation {
            result,
            error: state.error,
        }
    }

    /// sum -> product (('+' | '-') product)*. Left-associative.
    fn sum(&self, cursor: &mut TokenCursor, state: &mut EvalState) -> f64 {
        if state.failed() {
            return state.last_result;
        }

        let mut result = self.product(cursor, state);
        while matches!(cursor.peek(), Some("+" | "-")) {
            let Some(operator) = cursor.next() else {
                break;
            };
            let rhs = self.product(cursor, state);
            if operator == "+" {
                result += rhs;
            } else {
                result -= rhs;
            }
        }

        state.last_result = result;
        result
    }

    /// product -> term (('*' | '/') term | '+/-')*. Left-associative.
    ///
    /// `+/-` is postfix: it flips the sign of the accumulator and does
    /// not consume a following term. Flipping zero is a no-op. A `+/-`
    /// consumed while an error is flagged clears the error first; this
    /// is the sole path out of the frozen state.
    fn product(&self, cursor: &mut TokenCursor, state: &mut EvalState) -> f64 {
        if state.failed() {
            return state.last_result;
        }

        let mut result = self.term(cursor, state);
        while cursor.peek().is_some_and(is_product_operator) {
            let Some(operator) = cursor.next() else {
                break;
            };

            if operator == SIGN_FLIP {
                if state.failed() {
                    state.clear_error();
                }
                if result != 0.0 {
                    result = -result;
                }
                continue;
            }

            let rhs = self.term(cursor, state);
            if operator == "*" {
                result *= rhs;
            } else if rhs == 0.0 {
                // Division by exactly zero is fatal for this chain: the
                // frozen value becomes infinity and no further tokens of
                // the product are consumed.
                state.fail(CellError::DivideByZero);
                state.last_result = f64::INFINITY;
                return f64::INFINITY;
            } else {
                result /= rhs;
            }
        }

        state.last_result = result;
        result
    }

    /// term -> number | '(' sum ')' | cell label.
    fn term(&self, cursor: &mut TokenCursor, state: &mut EvalState) -> f64 {
        if state.failed() {
            return state.last_result;
        }

        let mut result = 0.0;
        let Some(token) = cursor.next() else {
            // Ran out of tokens while a term was still expected.
            state.fail(CellError::PartialFormula);
            return result;
        };

        if let Some(number) = parse_number(token) {
            result = number;
            state.last_result = result;
        } else if token == "(" {
            result = self.sum(cursor, state);
            if cursor.next() != Some(")") {
                // The partially computed inner value is kept.
                state.fail(CellError::MissingParentheses);
                state.last_result = result;
            }
        } else if is_valid_cell_label(token) {
            let (value, error) = self.cell_value(token);
            result = value;
            if let Some(error) = error {
                state.fail(error);
                state.last_result = result;
            }
        } else {
            state.fail(CellError::InvalidFormula);
        }

        result
    }

    /// Resolves a cell reference one hop through the `CellReader`.
    ///
    /// Returns `(0, error)` when the referenced cell carries an error of
    /// its own (other than the `EmptyFormula` sentinel), `(0, InvalidCell)`
    /// when the cell is blank or unknown, and `(cached value, None)`
    /// otherwise.
    fn cell_value(&self, label: &str) -> (f64, Option<CellError>) {
        let Some(cell) = self.sheet.cell_by_label(label) else {
            return (0.0, Some(CellError::InvalidCell));
        };

        match cell.error() {
            Some(error) if *error != CellError::EmptyFormula => (0.0, Some(error.clone())),
            _ => {
                if cell.formula().is_empty() {
                    (0.0, Some(CellError::InvalidCell))
                } else {
                    (cell.value(), None)
                }
            }
        }
    }
}
