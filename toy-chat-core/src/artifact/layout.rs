use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::csv::{cell, header_index, parse_csv, parse_float, parse_int};
use crate::error::{LoadError, Result};

/// A labelled point of the optional 2-D visualization layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutPoint {
	pub label: String,
	pub x: f64,
	pub y: f64,
}

/// Label-keyed layout points.
pub type Layout = HashMap<String, LayoutPoint>;

/// Parses a layout artifact with header `row,label,x,y` (any order, any case).
///
/// - Rows with an empty label are skipped
/// - `row` must be an integer but its value is not kept
/// - A duplicated label keeps its last point
/// - Fewer than two table rows yields an empty layout
///
/// # Errors
/// - `Schema` if one of the four columns is missing
/// - `Parse` if `row`, `x` or `y` is malformed
pub fn parse_layout_csv(text: &str) -> Result<Layout> {
	let table = parse_csv(text);
	if table.len() < 2 {
		return Ok(Layout::new());
	}

	let header = &table[0];
	let (Some(row_idx), Some(label_idx), Some(x_idx), Some(y_idx)) = (
		header_index(header, "row"),
		header_index(header, "label"),
		header_index(header, "x"),
		header_index(header, "y"),
	) else {
		return Err(LoadError::Schema(format!(
			"Layout CSV must have header: row,label,x,y (got: {})",
			header.join(",")
		)));
	};

	let mut layout = Layout::new();
	for row in &table[1..] {
		let label = cell(row, label_idx, "");
		if label.is_empty() {
			continue;
		}

		let _row: i64 = parse_int(cell(row, row_idx, "0"))?;
		let x = parse_float(cell(row, x_idx, "0"))?;
		let y = parse_float(cell(row, y_idx, "0"))?;

		layout.insert(label.to_owned(), LayoutPoint { label: label.to_owned(), x, y });
	}

	debug!("Parsed layout with {} points", layout.len());
	Ok(layout)
}
