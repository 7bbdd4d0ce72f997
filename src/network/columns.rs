//! Header detection and source/target/weight column lookup.

use log::debug;

use super::table::{Cell, Row};

/// Substrings that mark a first row as a header. Korean tokens cover
/// "weight" and "node".
const HEADER_KEYWORDS: &[&str] = &["source", "node", "weight", "가중치", "노드"];
const SOURCE_KEYWORDS: &[&str] = &["source1", "source", "노드1", "노드"];
const TARGET_KEYWORDS: &[&str] = &["source2", "target", "노드2"];
const WEIGHT_KEYWORDS: &[&str] = &["weight", "가중치"];

/// Where the data starts and which columns hold the edge fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
	/// Index of the first data row.
	pub data_start: usize,
	/// Column of the source node.
	pub source: usize,
	/// Column of the target node.
	pub target: usize,
	/// Column of the edge weight.
	pub weight: usize,
}

impl Default for ColumnLayout {
	fn default() -> Self {
		Self {
			data_start: 0,
			source: 0,
			target: 1,
			weight: 2,
		}
	}
}

/// Lower-cased header text of a cell; falsy cells never match a keyword.
fn header_text(cell: &Cell) -> Option<String> {
	if cell.is_falsy() {
		return None;
	}
	Some(cell.to_string().to_lowercase())
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
	keywords.iter().any(|keyword| text.contains(keyword))
}

fn find_column(row: &[Cell], keywords: &[&str], skip: Option<usize>) -> Option<usize> {
	row.iter().enumerate().position(|(i, cell)| {
		Some(i) != skip && header_text(cell).is_some_and(|text| contains_any(&text, keywords))
	})
}

/// Whether a row reads as column headers rather than data.
pub fn is_header_row(row: &[Cell]) -> bool {
	row.iter()
		.filter_map(header_text)
		.any(|text| contains_any(&text, HEADER_KEYWORDS))
}

/// Infer the column layout from the first row of `rows`.
///
/// The target search excludes the column already claimed by the source, so a
/// header naming "source" twice still splits into two columns. Columns that
/// cannot be located fall back to positions 0, 1 and 2.
pub fn infer_columns(rows: &[Row]) -> ColumnLayout {
	let Some(first) = rows.first() else {
		return ColumnLayout::default();
	};
	if !is_header_row(first) {
		return ColumnLayout::default();
	}

	let source = find_column(first, SOURCE_KEYWORDS, None);
	let target = find_column(first, TARGET_KEYWORDS, source);
	let weight = find_column(first, WEIGHT_KEYWORDS, None);

	let layout = ColumnLayout {
		data_start: 1,
		source: source.unwrap_or(0),
		target: target.unwrap_or(1),
		weight: weight.unwrap_or(2),
	};
	debug!("header row detected: {layout:?}");
	layout
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(cells: &[&str]) -> Row {
		cells.iter().map(|c| Cell::text(*c)).collect()
	}

	#[test]
	fn data_first_row_uses_positions() {
		let layout = infer_columns(&[row(&["Alice", "Bob", "2"])]);
		assert_eq!(layout, ColumnLayout::default());
	}

	#[test]
	fn standard_header() {
		let layout = infer_columns(&[row(&["Source1", "Source2", "Weight"])]);
		assert_eq!(
			layout,
			ColumnLayout {
				data_start: 1,
				source: 0,
				target: 1,
				weight: 2
			}
		);
	}

	#[test]
	fn reordered_header() {
		let layout = infer_columns(&[row(&["Weight", "Target", "Source"])]);
		assert_eq!(layout.data_start, 1);
		assert_eq!(layout.source, 2);
		assert_eq!(layout.target, 1);
		assert_eq!(layout.weight, 0);
	}

	#[test]
	fn korean_header() {
		let layout = infer_columns(&[row(&["가중치", "노드1", "노드2"])]);
		assert_eq!(layout.source, 1);
		assert_eq!(layout.target, 2);
		assert_eq!(layout.weight, 0);
	}

	#[test]
	fn ambiguous_source_columns_resolve_in_scan_order() {
		let layout = infer_columns(&[row(&["source", "source2", "w"])]);
		assert_eq!(layout.source, 0);
		assert_eq!(layout.target, 1);
		assert_eq!(layout.weight, 2);
	}

	#[test]
	fn missing_columns_fall_back_to_positions() {
		let layout = infer_columns(&[row(&["node", "other", "third"])]);
		assert_eq!(layout.data_start, 1);
		assert_eq!(layout.source, 0);
		assert_eq!(layout.target, 1);
		assert_eq!(layout.weight, 2);
	}

	#[test]
	fn blank_and_numeric_cells_are_not_headers() {
		assert!(!is_header_row(&[Cell::Empty, Cell::Number(1.0), Cell::text("")]));
		assert_eq!(infer_columns(&[]), ColumnLayout::default());
	}
}
