//! Spreadsheet-shaped input.
//!
//! Cells are loosely typed the way a spreadsheet widget or a dynamically
//! typed CSV parser hands them over: nothing, a number, or free text. The
//! [`EdgeTable`] keeps the row bookkeeping of the editing widget (spare rows,
//! range deletion, filled-row counts) away from the view code.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::columns::is_header_row;
use super::error::Result;

/// One table row.
pub type Row = Vec<Cell>;

/// A single spreadsheet cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
	/// Null, undefined or never filled.
	#[default]
	Empty,
	/// A typed number.
	Number(f64),
	/// Text as typed or read.
	Text(String),
}

impl Cell {
	/// Cell holding text exactly as the user typed it.
	pub fn text(value: impl Into<String>) -> Self {
		let value = value.into();
		if value.is_empty() {
			Cell::Empty
		} else {
			Cell::Text(value)
		}
	}

	/// Dynamic typing of a raw CSV field: numeric fields become numbers.
	pub fn from_field(field: &str) -> Self {
		let trimmed = field.trim();
		if field.is_empty() {
			return Cell::Empty;
		}
		match trimmed.parse::<f64>() {
			Ok(n) if n.is_finite() && !trimmed.is_empty() => Cell::Number(n),
			_ => Cell::Text(field.to_string()),
		}
	}

	/// True for cells a spreadsheet would show as blank.
	pub fn is_blank(&self) -> bool {
		match self {
			Cell::Empty => true,
			Cell::Text(s) => s.is_empty(),
			Cell::Number(_) => false,
		}
	}

	/// Loose truthiness: blank cells, zero and NaN are all falsy.
	pub fn is_falsy(&self) -> bool {
		match self {
			Cell::Empty => true,
			Cell::Text(s) => s.is_empty(),
			Cell::Number(n) => *n == 0.0 || n.is_nan(),
		}
	}

	/// Node label for this cell, trimmed.
	pub fn label(&self) -> String {
		self.to_string().trim().to_string()
	}

	/// Numeric reading of the cell, parsing leading digits out of text.
	pub fn number(&self) -> Option<f64> {
		match self {
			Cell::Empty => None,
			Cell::Number(n) => Some(*n),
			Cell::Text(s) => parse_float_prefix(s),
		}
	}
}

impl fmt::Display for Cell {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Cell::Empty => Ok(()),
			Cell::Number(n) => write!(f, "{n}"),
			Cell::Text(s) => f.write_str(s),
		}
	}
}

/// Parse the longest numeric prefix of `text`, ignoring leading whitespace.
/// `"3.5kg"` reads as 3.5, `"kg"` as nothing.
fn parse_float_prefix(text: &str) -> Option<f64> {
	let s = text.trim_start();
	let bytes = s.as_bytes();
	let len = bytes.len();
	let mut end = 0;
	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end = 1;
	}

	let int_start = end;
	while end < len && bytes[end].is_ascii_digit() {
		end += 1;
	}
	let mut digits = end - int_start;

	if end < len && bytes[end] == b'.' {
		let frac_start = end + 1;
		let mut frac_end = frac_start;
		while frac_end < len && bytes[frac_end].is_ascii_digit() {
			frac_end += 1;
		}
		digits += frac_end - frac_start;
		end = frac_end;
	}
	if digits == 0 {
		return None;
	}

	if end < len && matches!(bytes[end], b'e' | b'E') {
		let mut exp_end = end + 1;
		if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
			exp_end += 1;
		}
		let exp_digits = exp_end;
		while exp_end < len && bytes[exp_end].is_ascii_digit() {
			exp_end += 1;
		}
		if exp_end > exp_digits {
			end = exp_end;
		}
	}

	s[..end].parse().ok()
}

/// Parse CSV text into rows of dynamically typed cells.
///
/// A UTF-8 byte order mark is dropped and rows without a single filled cell
/// are skipped. Rows may have differing lengths.
pub fn parse_csv(text: &str) -> Result<Vec<Row>> {
	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(text.as_bytes());

	let mut rows = Vec::new();
	for record in reader.records() {
		let record = record?;
		let row: Row = record.iter().map(Cell::from_field).collect();
		if row.iter().any(|cell| !cell.is_blank()) {
			rows.push(row);
		}
	}
	debug!("parsed {} CSV rows", rows.len());
	Ok(rows)
}

/// An inclusive range of selected rows, in either drag direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
	/// Row where the selection started.
	pub start: usize,
	/// Row where the selection ended.
	pub end: usize,
}

impl RowRange {
	/// Selection of a single row.
	pub fn single(row: usize) -> Self {
		Self {
			start: row,
			end: row,
		}
	}

	fn bounds(&self) -> (usize, usize) {
		(self.start.min(self.end), self.start.max(self.end))
	}

	/// Whether `row` lies inside the selection.
	pub fn contains(&self, row: usize) -> bool {
		let (lo, hi) = self.bounds();
		(lo..=hi).contains(&row)
	}
}

/// Rows backing the edge-list editor. Always holds at least one row.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeTable {
	rows: Vec<Row>,
}

impl Default for EdgeTable {
	fn default() -> Self {
		Self::new()
	}
}

impl EdgeTable {
	/// Number of columns the editor shows.
	pub const COLUMNS: usize = 3;

	/// Table with a single spare row.
	pub fn new() -> Self {
		Self {
			rows: vec![Self::empty_row()],
		}
	}

	fn empty_row() -> Row {
		vec![Cell::Empty; Self::COLUMNS]
	}

	/// Load rows into the editor. A header-looking first row is dropped
	/// (the editor shows its own column headers) and blank rows are skipped.
	pub fn load(rows: Vec<Row>) -> Self {
		let mut rows = rows;
		if rows.first().is_some_and(|first| is_header_row(first)) {
			rows.remove(0);
		}
		rows.retain(|row| row.iter().any(|cell| !cell.is_blank()));
		for row in &mut rows {
			if row.len() < Self::COLUMNS {
				row.resize(Self::COLUMNS, Cell::Empty);
			}
		}
		if rows.is_empty() {
			rows.push(Self::empty_row());
		}
		debug!("loaded {} rows into the edge table", rows.len());
		Self { rows }
	}

	/// All rows, including blank ones.
	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	/// Number of rows, including blank ones.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Never true: the editor keeps at least one row.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Rows holding at least one filled cell.
	pub fn filled_rows(&self) -> Vec<Row> {
		self.rows
			.iter()
			.filter(|row| row.iter().any(|cell| !cell.is_blank()))
			.cloned()
			.collect()
	}

	/// Count of rows holding at least one filled cell.
	pub fn filled_count(&self) -> usize {
		self.rows
			.iter()
			.filter(|row| row.iter().any(|cell| !cell.is_blank()))
			.count()
	}

	/// Overwrite one cell with typed text. Out-of-range rows are ignored.
	pub fn set_cell(&mut self, row: usize, col: usize, value: &str) {
		let Some(cells) = self.rows.get_mut(row) else {
			return;
		};
		if cells.len() <= col {
			cells.resize(col + 1, Cell::Empty);
		}
		cells[col] = Cell::text(value);
	}

	/// Append a blank row.
	pub fn push_empty_row(&mut self) {
		self.rows.push(Self::empty_row());
	}

	/// Delete the selected rows, or the last row when nothing is selected.
	///
	/// A single-row table is left untouched. Deleting every row leaves one
	/// blank row behind. Returns the number of rows removed.
	pub fn delete_rows(&mut self, selection: Option<RowRange>) -> usize {
		let count = self.rows.len();
		if count <= 1 {
			return 0;
		}

		let (lo, hi) = match selection {
			Some(range) => range.bounds(),
			None => (count - 1, count - 1),
		};
		if lo >= count {
			return 0;
		}
		let hi = hi.min(count - 1);

		// a full selection really empties the table, not just its lowest row
		self.rows.drain(lo..=hi);
		let removed = hi - lo + 1;
		if self.rows.is_empty() {
			self.rows.push(Self::empty_row());
		}
		debug!("deleted rows {lo}..={hi}, {} left", self.rows.len());
		removed
	}

	/// Drop everything back to a single blank row.
	pub fn clear(&mut self) {
		self.rows = vec![Self::empty_row()];
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn text_row(cells: &[&str]) -> Row {
		cells.iter().map(|c| Cell::text(*c)).collect()
	}

	#[test]
	fn float_prefix_matches_loose_parsing() {
		assert_eq!(parse_float_prefix("3.5"), Some(3.5));
		assert_eq!(parse_float_prefix("  7kg"), Some(7.0));
		assert_eq!(parse_float_prefix("-2e3x"), Some(-2000.0));
		assert_eq!(parse_float_prefix(".5"), Some(0.5));
		assert_eq!(parse_float_prefix("4e"), Some(4.0));
		assert_eq!(parse_float_prefix("abc"), None);
		assert_eq!(parse_float_prefix(""), None);
		assert_eq!(parse_float_prefix("-"), None);
	}

	#[test]
	fn truthiness() {
		assert!(Cell::Empty.is_falsy());
		assert!(Cell::Number(0.0).is_falsy());
		assert!(Cell::text("").is_falsy());
		assert!(!Cell::text("0").is_falsy());
		assert!(!Cell::Number(2.0).is_falsy());
	}

	#[test]
	fn labels_are_trimmed_and_numbers_print_plainly() {
		assert_eq!(Cell::text("  Alice ").label(), "Alice");
		assert_eq!(Cell::Number(2.0).label(), "2");
		assert_eq!(Cell::Number(2.5).label(), "2.5");
	}

	#[test]
	fn csv_is_typed_and_blank_lines_dropped() {
		let rows = parse_csv("\u{feff}Source1,Source2,Weight\nAlice,Bob,2\n,,\n\nBob,Carol,x\n").unwrap();
		assert_eq!(rows.len(), 3);
		assert_eq!(rows[0][0], Cell::Text("Source1".into()));
		assert_eq!(rows[1][2], Cell::Number(2.0));
		assert_eq!(rows[2][2], Cell::Text("x".into()));
	}

	#[test]
	fn load_strips_header_and_blank_rows() {
		let table = EdgeTable::load(vec![
			text_row(&["Source1", "Source2", "Weight"]),
			text_row(&["A", "B", "1"]),
			text_row(&["", "", ""]),
			text_row(&["B", "C"]),
		]);
		assert_eq!(table.len(), 2);
		assert_eq!(table.rows()[1].len(), EdgeTable::COLUMNS);
	}

	#[test]
	fn load_of_nothing_keeps_a_spare_row() {
		let table = EdgeTable::load(Vec::new());
		assert_eq!(table.len(), 1);
		assert_eq!(table.filled_count(), 0);
	}

	#[test]
	fn delete_without_selection_drops_last_row() {
		let mut table = EdgeTable::load(vec![text_row(&["A", "B", "1"]), text_row(&["C", "D", "1"])]);
		assert_eq!(table.delete_rows(None), 1);
		assert_eq!(table.rows()[0][0], Cell::text("A"));
		assert_eq!(table.delete_rows(None), 0);
		assert_eq!(table.len(), 1);
	}

	#[test]
	fn delete_selected_range_in_any_direction() {
		let mut table = EdgeTable::load(
			["A", "B", "C", "D"]
				.iter()
				.map(|n| text_row(&[n, "Z", "1"]))
				.collect(),
		);
		let removed = table.delete_rows(Some(RowRange { start: 2, end: 1 }));
		assert_eq!(removed, 2);
		let firsts: Vec<String> = table.rows().iter().map(|r| r[0].label()).collect();
		assert_eq!(firsts, vec!["A", "D"]);
	}

	#[test]
	fn deleting_everything_leaves_a_blank_row() {
		let mut table = EdgeTable::load(vec![text_row(&["A", "B", "1"]), text_row(&["C", "D", "1"])]);
		assert_eq!(table.delete_rows(Some(RowRange { start: 0, end: 9 })), 2);
		assert_eq!(table.len(), 1);
		assert_eq!(table.filled_count(), 0);
	}

	#[test]
	fn editing_cells_and_rows() {
		let mut table = EdgeTable::new();
		table.set_cell(0, 0, "A");
		table.set_cell(0, 1, "B");
		table.push_empty_row();
		table.set_cell(5, 0, "ignored");
		assert_eq!(table.len(), 2);
		assert_eq!(table.filled_count(), 1);
		table.clear();
		assert_eq!(table.len(), 1);
	}
}
