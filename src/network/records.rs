//! Row extraction: turns table rows into validated edge records.

use serde::{Deserialize, Serialize};

use super::columns::{ColumnLayout, infer_columns};
use super::table::{Cell, Row};

/// Weight used when a row has no usable weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A validated `(source, target, weight)` triple from one input row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
	/// Source node label.
	pub source: String,
	/// Target node label.
	pub target: String,
	/// Edge weight.
	pub weight: f64,
}

impl EdgeRecord {
	/// Record from labels and a weight.
	pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			weight,
		}
	}

	fn from_row(row: &[Cell], layout: &ColumnLayout) -> Option<Self> {
		if row.len() < 3 {
			return None;
		}
		let source = row.get(layout.source).filter(|c| !c.is_falsy())?;
		let target = row.get(layout.target).filter(|c| !c.is_falsy())?;
		let weight = row
			.get(layout.weight)
			.and_then(Cell::number)
			.filter(|w| w.is_finite())
			.unwrap_or(DEFAULT_WEIGHT);
		Some(Self::new(source.label(), target.label(), weight))
	}
}

/// Lazy iterator over the edge records of a table. Cheap to clone, so the
/// sequence can be walked again from the start.
#[derive(Clone, Debug)]
pub struct EdgeRecords<'a> {
	rows: std::slice::Iter<'a, Row>,
	layout: ColumnLayout,
}

impl<'a> EdgeRecords<'a> {
	/// Records of `rows` read with an explicit layout.
	pub fn with_layout(rows: &'a [Row], layout: ColumnLayout) -> Self {
		let start = layout.data_start.min(rows.len());
		Self {
			rows: rows[start..].iter(),
			layout,
		}
	}

	/// Layout the records are read with.
	pub fn layout(&self) -> ColumnLayout {
		self.layout
	}
}

impl Iterator for EdgeRecords<'_> {
	type Item = EdgeRecord;

	fn next(&mut self) -> Option<EdgeRecord> {
		let layout = self.layout;
		self.rows.find_map(|row| EdgeRecord::from_row(row, &layout))
	}
}

/// Infer the column layout of `rows` and iterate their edge records.
/// Rows that do not yield a record are skipped without notice.
pub fn extract_records(rows: &[Row]) -> EdgeRecords<'_> {
	EdgeRecords::with_layout(rows, infer_columns(rows))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(cells: Vec<Cell>) -> Row {
		cells
	}

	fn t(s: &str) -> Cell {
		Cell::text(s)
	}

	#[test]
	fn blank_weight_defaults_to_one() {
		let rows = vec![row(vec![t("A"), t("B"), t("")])];
		let records: Vec<_> = extract_records(&rows).collect();
		assert_eq!(records, vec![EdgeRecord::new("A", "B", 1.0)]);
	}

	#[test]
	fn text_weight_is_parsed() {
		let rows = vec![row(vec![t("A"), t("B"), t("3.5")])];
		let records: Vec<_> = extract_records(&rows).collect();
		assert_eq!(records[0].weight, 3.5);
	}

	#[test]
	fn non_numeric_weight_defaults() {
		let rows = vec![row(vec![t("A"), t("B"), t("heavy")])];
		assert_eq!(extract_records(&rows).next().unwrap().weight, 1.0);
	}

	#[test]
	fn rows_missing_an_endpoint_are_dropped() {
		let rows = vec![
			row(vec![t("A"), t("B"), Cell::Number(2.0)]),
			row(vec![t(""), t("C"), Cell::Number(1.0)]),
			row(vec![t("D"), t(""), Cell::Number(5.0)]),
		];
		let records: Vec<_> = extract_records(&rows).collect();
		assert_eq!(records, vec![EdgeRecord::new("A", "B", 2.0)]);
	}

	#[test]
	fn short_rows_and_zero_labels_are_dropped() {
		let rows = vec![
			row(vec![t("A"), t("B")]),
			row(vec![Cell::Number(0.0), t("B"), Cell::Number(1.0)]),
			row(vec![Cell::Number(7.0), t(" B "), Cell::Empty]),
		];
		let records: Vec<_> = extract_records(&rows).collect();
		assert_eq!(records, vec![EdgeRecord::new("7", "B", 1.0)]);
	}

	#[test]
	fn header_row_is_skipped_and_columns_followed() {
		let rows = vec![
			row(vec![t("weight"), t("target"), t("source")]),
			row(vec![Cell::Number(4.0), t("B"), t("A")]),
		];
		let records: Vec<_> = extract_records(&rows).collect();
		assert_eq!(records, vec![EdgeRecord::new("A", "B", 4.0)]);
	}

	#[test]
	fn iteration_restarts_from_a_clone() {
		let rows = vec![
			row(vec![t("A"), t("B"), t("1")]),
			row(vec![t("B"), t("C"), t("1")]),
		];
		let records = extract_records(&rows);
		assert_eq!(records.clone().count(), 2);
		assert_eq!(records.count(), 2);
	}
}
