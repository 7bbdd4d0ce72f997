//! Built-in datasets for trying the tool without data of one's own.

use log::debug;

use super::error::{Error, Result};
use super::table::{Row, parse_csv};

/// One bundled edge list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleDataset {
	/// Stable identifier.
	pub id: &'static str,
	/// Display name.
	pub name: &'static str,
	/// What the network shows and what to look for in it.
	pub description: &'static str,
	/// CSV content, with a header row.
	pub csv: &'static str,
}

const SAMPLES: &[SampleDataset] = &[
	SampleDataset {
		id: "class-friends",
		name: "Class friendship network",
		description: "Close friendships inside an imaginary class. Look for the small groups \
			that form and for classmates with few ties.",
		csv: include_str!("../../data/samples/class-friends.csv"),
	},
	SampleDataset {
		id: "star-graph",
		name: "Star graph",
		description: "One centre node tied to every other node. The simplest case for \
			comparing degree and eigenvector centrality.",
		csv: include_str!("../../data/samples/star-graph.csv"),
	},
	SampleDataset {
		id: "study-groups",
		name: "Study groups",
		description: "Three study groups joined by a few weak ties. Raise the resolution to \
			watch them separate.",
		csv: include_str!("../../data/samples/study-groups.csv"),
	},
];

/// Every bundled dataset, in display order.
pub fn samples() -> &'static [SampleDataset] {
	SAMPLES
}

/// Dataset by id.
pub fn sample(id: &str) -> Option<&'static SampleDataset> {
	SAMPLES.iter().find(|s| s.id == id)
}

/// Parse a bundled dataset into table rows, header included.
pub fn load_sample(id: &str) -> Result<Vec<Row>> {
	let dataset = sample(id).ok_or_else(|| Error::UnknownSample(id.to_string()))?;
	let rows = parse_csv(dataset.csv)?;
	debug!("loaded sample '{id}' with {} rows", rows.len());
	Ok(rows)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::AnalysisConfig;
	use crate::network::graph::NetworkGraph;

	#[test]
	fn every_sample_builds_a_graph() {
		for dataset in samples() {
			let rows = load_sample(dataset.id).unwrap();
			let graph = NetworkGraph::from_rows(&rows, &AnalysisConfig::default()).unwrap();
			assert!(graph.node_count() > 1, "{}", dataset.id);
		}
	}

	#[test]
	fn star_centre_has_every_edge() {
		let rows = load_sample("star-graph").unwrap();
		let graph = NetworkGraph::from_rows(&rows, &AnalysisConfig::default()).unwrap();
		assert_eq!(graph.node("Center").unwrap().degree, graph.edge_count());
	}

	#[test]
	fn unknown_id_is_an_error() {
		assert!(matches!(load_sample("nope"), Err(Error::UnknownSample(_))));
	}
}
