//! Serializable snapshot of an analysis, for an external document store.
//!
//! The store cannot hold nested arrays, so saved documents encode the edge
//! rows and the centrality list as JSON strings and community members as
//! comma-joined strings. Older documents hold the plain arrays instead. Both
//! shapes are accepted by [`StoredSnapshot`] and resolved once, in
//! [`Snapshot::from_stored`]; nothing past that point sees the difference.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use super::centrality::{CentralityEntry, Eigenvector};
use super::error::{Error, Result};
use super::table::Row;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Narrative report fields that travel with the analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFields {
	/// Report title.
	pub report_title: String,
	/// Author name.
	pub author: String,
	/// Body text.
	pub content: String,
	/// Conclusion section.
	pub conclusion: String,
	/// Limitations section.
	pub limitations: String,
	/// Open questions section.
	pub questions: String,
	/// Title of the dataset the report is based on.
	pub data_title: String,
	/// Description of the dataset.
	pub data_description: String,
	/// Date the dataset was saved, `YYYY-MM-DD`.
	pub data_date: String,
}

/// Canonical in-memory snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
	/// Schema version the snapshot was read as.
	pub version: u32,
	/// Edge table rows.
	pub rows: Vec<Row>,
	/// Members per community id.
	pub communities: BTreeMap<usize, Vec<String>>,
	/// Colour per community id.
	pub community_colors: BTreeMap<usize, String>,
	/// Whether community colouring was switched on.
	pub community_detected: bool,
	/// Leading centrality entries.
	pub top_centrality: Vec<CentralityEntry>,
	/// Report text.
	pub report: ReportFields,
}

/// Edge rows as stored: a nested array or its JSON encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRows {
	/// Nested array.
	Nested(Vec<Row>),
	/// JSON-encoded nested array.
	Encoded(String),
}

/// Community members as stored: an array or a comma-joined string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredMembers {
	/// Array of labels.
	List(Vec<String>),
	/// Labels joined with `,`.
	Joined(String),
}

/// Eigenvector value as stored: a number or the `"N/A"` marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEigenvector {
	/// Numeric value.
	Value(f64),
	/// Marker text for a missing value.
	Missing(String),
}

/// One centrality entry as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCentralityEntry {
	/// Node label.
	pub node: String,
	/// Degree centrality.
	#[serde(default)]
	pub degree_centrality: f64,
	/// Eigenvector centrality.
	pub eigenvector_centrality: StoredEigenvector,
}

/// Centrality list as stored: an array or its JSON encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredCentrality {
	/// Array of entries.
	List(Vec<StoredCentralityEntry>),
	/// JSON-encoded array.
	Encoded(String),
}

/// Document shape in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSnapshot {
	/// Schema version; absent on the oldest documents.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<u32>,
	/// Edge rows.
	#[serde(default)]
	pub data: Option<StoredRows>,
	/// Members per community id (string keys).
	#[serde(default)]
	pub community_nodes: BTreeMap<String, StoredMembers>,
	/// Colour per community id (string keys).
	#[serde(default)]
	pub community_colors: BTreeMap<String, String>,
	/// Community colouring switch.
	#[serde(default)]
	pub community_detected: bool,
	/// Leading centrality entries.
	#[serde(default)]
	pub centrality_nodes: Option<StoredCentrality>,
	/// Report text.
	#[serde(flatten)]
	pub report: ReportFields,
}

fn parse_community_id(key: &str) -> Result<usize> {
	key.trim()
		.parse()
		.map_err(|_| Error::InvalidSnapshot(format!("community id '{key}' is not a number")))
}

impl From<&CentralityEntry> for StoredCentralityEntry {
	fn from(entry: &CentralityEntry) -> Self {
		Self {
			node: entry.node.clone(),
			degree_centrality: entry.degree,
			eigenvector_centrality: match entry.eigenvector {
				Eigenvector::Value(v) => StoredEigenvector::Value(v),
				Eigenvector::Unavailable => StoredEigenvector::Missing("N/A".into()),
			},
		}
	}
}

impl From<StoredCentralityEntry> for CentralityEntry {
	fn from(stored: StoredCentralityEntry) -> Self {
		Self {
			node: stored.node,
			degree: stored.degree_centrality,
			eigenvector: match stored.eigenvector_centrality {
				StoredEigenvector::Value(v) => Eigenvector::Value(v),
				StoredEigenvector::Missing(_) => Eigenvector::Unavailable,
			},
		}
	}
}

impl Snapshot {
	/// Resolve a stored document of either shape.
	pub fn from_stored(stored: StoredSnapshot) -> Result<Self> {
		let rows = match stored.data {
			None => Vec::new(),
			Some(StoredRows::Nested(rows)) => {
				warn!("snapshot holds rows as a nested array (legacy shape)");
				rows
			}
			Some(StoredRows::Encoded(text)) => serde_json::from_str(&text)
				.map_err(|e| Error::InvalidSnapshot(format!("edge rows: {e}")))?,
		};

		let mut communities = BTreeMap::new();
		for (key, members) in stored.community_nodes {
			let nodes = match members {
				StoredMembers::List(nodes) => nodes,
				StoredMembers::Joined(text) if text.is_empty() => Vec::new(),
				StoredMembers::Joined(text) => text.split(',').map(str::to_string).collect(),
			};
			communities.insert(parse_community_id(&key)?, nodes);
		}

		let mut community_colors = BTreeMap::new();
		for (key, color) in stored.community_colors {
			community_colors.insert(parse_community_id(&key)?, color);
		}

		let top_centrality = match stored.centrality_nodes {
			None => Vec::new(),
			Some(StoredCentrality::List(entries)) => entries.into_iter().map(Into::into).collect(),
			Some(StoredCentrality::Encoded(text)) => {
				match serde_json::from_str::<Vec<StoredCentralityEntry>>(&text) {
					Ok(entries) => entries.into_iter().map(Into::into).collect(),
					Err(e) => {
						warn!("dropping unreadable centrality list: {e}");
						Vec::new()
					}
				}
			}
		};

		Ok(Self {
			version: stored.version.unwrap_or(1),
			rows,
			communities,
			community_colors,
			community_detected: stored.community_detected,
			top_centrality,
			report: stored.report,
		})
	}

	/// Encode for the store: string-encoded rows, comma-joined members and a
	/// string-encoded centrality list.
	pub fn to_stored(&self) -> Result<StoredSnapshot> {
		let stored_centrality: Vec<StoredCentralityEntry> =
			self.top_centrality.iter().map(Into::into).collect();
		Ok(StoredSnapshot {
			version: Some(SNAPSHOT_VERSION),
			data: Some(StoredRows::Encoded(serde_json::to_string(&self.rows)?)),
			community_nodes: self
				.communities
				.iter()
				.map(|(id, nodes)| (id.to_string(), StoredMembers::Joined(nodes.join(","))))
				.collect(),
			community_colors: self
				.community_colors
				.iter()
				.map(|(id, color)| (id.to_string(), color.clone()))
				.collect(),
			community_detected: self.community_detected,
			centrality_nodes: Some(StoredCentrality::Encoded(serde_json::to_string(
				&stored_centrality,
			)?)),
			report: self.report.clone(),
		})
	}

	/// Decode a stored JSON document.
	pub fn from_json(text: &str) -> Result<Self> {
		Self::from_stored(serde_json::from_str(text)?)
	}

	/// Encode as a stored JSON document.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(&self.to_stored()?)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::table::Cell;

	fn sample() -> Snapshot {
		Snapshot {
			version: SNAPSHOT_VERSION,
			rows: vec![vec![Cell::text("A"), Cell::text("B"), Cell::Number(2.0)]],
			communities: BTreeMap::from([(0, vec!["A".to_string(), "B".to_string()])]),
			community_colors: BTreeMap::from([(0, "#1f77b4".to_string())]),
			community_detected: true,
			top_centrality: vec![CentralityEntry {
				node: "A".into(),
				degree: 1.0,
				eigenvector: Eigenvector::Unavailable,
			}],
			report: ReportFields {
				report_title: "Class network".into(),
				..ReportFields::default()
			},
		}
	}

	#[test]
	fn saved_documents_use_the_encoded_shape() {
		let stored = sample().to_stored().unwrap();
		assert!(matches!(stored.data, Some(StoredRows::Encoded(_))));
		assert_eq!(
			stored.community_nodes["0"],
			StoredMembers::Joined("A,B".into())
		);
		let json = sample().to_json().unwrap();
		assert!(json.contains("\"reportTitle\""));
		assert!(json.contains("N/A"));
	}

	#[test]
	fn encoded_document_reads_back() {
		let json = sample().to_json().unwrap();
		assert_eq!(Snapshot::from_json(&json).unwrap(), sample());
	}

	#[test]
	fn legacy_array_shape_is_accepted() {
		let json = r##"{
			"data": [["A", "B", 2], ["B", "C", null]],
			"communityNodes": {"0": ["A", "B"], "1": "C"},
			"communityColors": {"0": "#111111", "1": "#222222"},
			"centralityNodes": [
				{"node": "B", "degreeCentrality": 1.0, "eigenvectorCentrality": 0.707},
				{"node": "A", "degreeCentrality": 0.5, "eigenvectorCentrality": "N/A"}
			],
			"reportTitle": "old"
		}"##;
		let snapshot = Snapshot::from_json(json).unwrap();
		assert_eq!(snapshot.version, 1);
		assert_eq!(snapshot.rows[1][2], Cell::Empty);
		assert_eq!(snapshot.communities[&1], vec!["C".to_string()]);
		assert_eq!(snapshot.top_centrality[0].eigenvector, Eigenvector::Value(0.707));
		assert_eq!(snapshot.top_centrality[1].eigenvector, Eigenvector::Unavailable);
		assert_eq!(snapshot.report.report_title, "old");
	}

	#[test]
	fn unreadable_rows_are_an_error_but_centrality_is_dropped() {
		let bad_rows = r#"{"data": "[[not json"}"#;
		assert!(matches!(
			Snapshot::from_json(bad_rows),
			Err(Error::InvalidSnapshot(_))
		));

		let bad_centrality = r#"{"data": "[]", "centralityNodes": "oops"}"#;
		let snapshot = Snapshot::from_json(bad_centrality).unwrap();
		assert!(snapshot.top_centrality.is_empty());
	}

	#[test]
	fn non_numeric_community_key_is_rejected() {
		let json = r#"{"communityNodes": {"x": "A"}}"#;
		assert!(Snapshot::from_json(json).is_err());
	}
}
