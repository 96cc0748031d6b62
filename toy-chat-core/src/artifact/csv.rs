use std::str::FromStr;

use crate::error::{LoadError, Result};

/// A parsed CSV document: ordered rows of trimmed cells.
pub type Table = Vec<Vec<String>>;

/// Splits raw CSV text into a table of trimmed cells.
///
/// - Accepts `\n` and `\r\n` line endings
/// - Drops lines that are empty once trimmed
/// - Splits on every comma; quoting is not supported, so a cell can never
///   contain a comma
///
/// Empty input yields an empty table.
pub fn parse_csv(text: &str) -> Table {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(|line| line.split(',').map(|cell| cell.trim().to_owned()).collect())
		.collect()
}

/// Finds a column by case-insensitive header name.
pub(crate) fn header_index(header: &[String], name: &str) -> Option<usize> {
	header.iter().position(|h| h.eq_ignore_ascii_case(name))
}

/// Returns the cell at `index`, or `default` when the row is too short.
pub(crate) fn cell<'a>(row: &'a [String], index: usize, default: &'a str) -> &'a str {
	row.get(index).map(String::as_str).unwrap_or(default)
}

/// Parses a base-10 integer cell.
pub(crate) fn parse_int<T: FromStr>(raw: &str) -> Result<T> {
	raw.parse::<T>().map_err(|_| LoadError::parse_int(raw))
}

/// Parses a floating-point cell. Non-finite values (`inf`, `NaN`) are rejected.
pub(crate) fn parse_float(raw: &str) -> Result<f64> {
	match raw.parse::<f64>() {
		Ok(value) if value.is_finite() => Ok(value),
		_ => Err(LoadError::parse_float(raw)),
	}
}
