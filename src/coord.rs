//! FILENAME: src/coord.rs
//! PURPOSE: Utilities for cell labels and coordinate conversion.
//! CONTEXT: This module decides whether a token is a syntactically valid
//! cell label (e.g. "A1", "AA100") and converts between A1-style labels
//! and the 0-based (row, col) numeric indices used internally.
//! Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26, etc.
//! Row 1 in A1 notation = row 0 internally.

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Returns true if the token is a syntactically valid cell label:
/// one or more ASCII uppercase letters followed by one or more ASCII
/// digits, with a row number of at least 1. Pure and stateless.
pub fn is_valid_cell_label(token: &str) -> bool {
    label_to_coord(token).is_some()
}

/// Converts a column string (e.g., "A", "AA") to a 0-based column index.
/// "A" -> 0, "B" -> 1, ..., "Z" -> 25, "AA" -> 26, "AB" -> 27, etc.
/// Returns None if the string is empty, contains a non-letter, or names
/// a column beyond the u32 range.
pub fn col_to_index(col_str: &str) -> Option<u32> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: u32 = 0;
    for c in col_str.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        let digit = (c as u32) - ('A' as u32) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result - 1) // Convert to 0-based
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Converts an A1-style label to a 0-based (row, col) coordinate.
/// "A1" -> Some((0, 0)), "B2" -> Some((1, 1)), "AA100" -> Some((99, 26)).
/// Returns None for anything that is not a well-formed label, including
/// lowercase letters, a missing row or column part, and row 0.
pub fn label_to_coord(label: &str) -> Option<CellCoord> {
    let split = label.find(|c: char| c.is_ascii_digit())?;
    let (col_str, row_str) = label.split_at(split);

    let col = col_to_index(col_str)?;
    let row_num: u32 = row_str.parse().ok()?;
    if row_num == 0 {
        return None;
    }
    Some((row_num - 1, col))
}

/// Converts a 0-based (row, col) coordinate to an A1-style label.
/// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100".
pub fn coord_to_label(coord: CellCoord) -> String {
    let (row, col) = coord;
    // Widen before the 1-based conversion so row u32::MAX stays exact.
    format!("{}{}", index_to_col(col), row as u64 + 1)
}
