//! Graph construction from edge records.

use indexmap::{IndexMap, IndexSet};
use log::debug;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::centrality::Eigenvector;
use super::error::{Error, Result};
use super::records::{EdgeRecord, extract_records};
use super::table::Row;
use crate::config::AnalysisConfig;

/// Attributes carried by every node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttrs {
	/// Node label, unique within the graph.
	pub label: String,
	/// Number of incident edges, direction ignored.
	pub degree: usize,
	/// Rendered size, rescaled from the degree range.
	pub size: f64,
	/// Community id once a partition has been applied.
	pub community: Option<usize>,
	/// Current display colour.
	pub color: String,
	/// Colour restored after hover highlighting.
	pub original_color: String,
	/// Degree centrality once computed.
	pub degree_centrality: Option<f64>,
	/// Eigenvector centrality once computed.
	pub eigenvector_centrality: Option<Eigenvector>,
	/// Layout position.
	pub x: f64,
	/// Layout position.
	pub y: f64,
}

impl NodeAttrs {
	fn new(label: String, color: &str) -> Self {
		Self {
			label,
			degree: 0,
			size: 0.0,
			community: None,
			color: color.to_string(),
			original_color: color.to_string(),
			degree_centrality: None,
			eigenvector_centrality: None,
			x: 0.0,
			y: 0.0,
		}
	}
}

/// Attributes carried by every edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
	/// Weight of the first record naming this pair.
	pub weight: f64,
	/// Rendered width relative to the heaviest edge.
	pub size: f64,
}

/// Weighted graph with unique node labels and at most one edge per ordered
/// pair. Node indices follow first-seen order.
#[derive(Clone, Debug)]
pub struct NetworkGraph {
	graph: DiGraph<NodeAttrs, EdgeAttrs>,
	index: IndexMap<String, NodeIndex>,
}

impl NetworkGraph {
	/// Build a graph from a table: infer columns, extract records, build.
	pub fn from_rows(rows: &[Row], config: &AnalysisConfig) -> Result<Self> {
		Self::build(extract_records(rows), config)
	}

	/// Build a graph from edge records.
	///
	/// The first record naming an ordered pair wins; later duplicates are
	/// dropped, not summed. Fails with [`Error::NoGraphData`] on an empty
	/// sequence.
	pub fn build<I>(records: I, config: &AnalysisConfig) -> Result<Self>
	where
		I: IntoIterator<Item = EdgeRecord>,
	{
		let records: Vec<EdgeRecord> = records.into_iter().collect();
		if records.is_empty() {
			return Err(Error::NoGraphData);
		}

		let max_weight = records
			.iter()
			.map(|r| r.weight)
			.fold(0.0_f64, f64::max);

		let mut network = Self {
			graph: DiGraph::new(),
			index: IndexMap::new(),
		};
		for record in records {
			let normalized = if max_weight > 0.0 {
				record.weight / max_weight
			} else {
				record.weight
			};
			let source = network.ensure_node(record.source, &config.neutral_color);
			let target = network.ensure_node(record.target, &config.neutral_color);
			if network.graph.find_edge(source, target).is_none() {
				network.graph.add_edge(
					source,
					target,
					EdgeAttrs {
						weight: record.weight,
						size: normalized * config.edge_size_scale,
					},
				);
			}
		}

		network.assign_degrees(config);
		debug!(
			"built graph: {} nodes, {} edges",
			network.node_count(),
			network.edge_count()
		);
		Ok(network)
	}

	fn ensure_node(&mut self, label: String, color: &str) -> NodeIndex {
		if let Some(&idx) = self.index.get(&label) {
			return idx;
		}
		let idx = self.graph.add_node(NodeAttrs::new(label.clone(), color));
		self.index.insert(label, idx);
		idx
	}

	fn assign_degrees(&mut self, config: &AnalysisConfig) {
		let degrees: Vec<usize> = self
			.graph
			.node_indices()
			.map(|n| {
				self.graph.edges_directed(n, Direction::Outgoing).count()
					+ self.graph.edges_directed(n, Direction::Incoming).count()
			})
			.collect();
		let min = degrees.iter().copied().min().unwrap_or(0);
		let max = degrees.iter().copied().max().unwrap_or(0);
		let (lo, hi) = (config.node_size_min, config.node_size_max);

		for (node, degree) in self.graph.node_weights_mut().zip(degrees) {
			node.degree = degree;
			node.size = if min == max {
				(lo + hi) / 2.0
			} else {
				lo + (degree - min) as f64 / (max - min) as f64 * (hi - lo)
			};
		}
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Number of stored edges.
	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}

	/// Nodes in first-seen order.
	pub fn nodes(&self) -> impl Iterator<Item = &NodeAttrs> {
		self.graph.node_weights()
	}

	/// Node labels in first-seen order.
	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.index.keys().map(String::as_str)
	}

	/// Position of a label in node order.
	pub fn position(&self, label: &str) -> Option<usize> {
		self.index.get_index_of(label)
	}

	/// Attributes of a node.
	pub fn node(&self, label: &str) -> Option<&NodeAttrs> {
		self.index.get(label).map(|&idx| &self.graph[idx])
	}

	/// Attributes of the edge stored for exactly this ordered pair.
	pub fn edge(&self, source: &str, target: &str) -> Option<&EdgeAttrs> {
		let edge = self.find_edge(source, target)?;
		Some(&self.graph[edge])
	}

	fn find_edge(&self, source: &str, target: &str) -> Option<EdgeIndex> {
		let (&s, &t) = (self.index.get(source)?, self.index.get(target)?);
		self.graph.find_edge(s, t)
	}

	/// Stored edges as `(source position, target position, attributes)`.
	pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &EdgeAttrs)> {
		self.graph
			.edge_references()
			.map(|e| (e.source().index(), e.target().index(), e.weight()))
	}

	/// Labels adjacent to `label`, direction ignored.
	pub fn neighbors(&self, label: &str) -> Vec<&str> {
		let Some(&idx) = self.index.get(label) else {
			return Vec::new();
		};
		let unique: IndexSet<NodeIndex> = self.graph.neighbors_undirected(idx).collect();
		unique
			.into_iter()
			.map(|n| self.graph[n].label.as_str())
			.collect()
	}

	/// Mutable attributes of every node, in node order.
	pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeAttrs> {
		self.graph.node_weights_mut()
	}

	/// Mutable attributes of a node.
	pub(crate) fn node_mut(&mut self, label: &str) -> Option<&mut NodeAttrs> {
		let idx = *self.index.get(label)?;
		Some(&mut self.graph[idx])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn build(records: Vec<EdgeRecord>) -> NetworkGraph {
		NetworkGraph::build(records, &AnalysisConfig::default()).unwrap()
	}

	#[test]
	fn empty_input_is_refused() {
		let err = NetworkGraph::build(Vec::new(), &AnalysisConfig::default()).unwrap_err();
		assert!(matches!(err, Error::NoGraphData));
	}

	#[test]
	fn duplicate_pairs_keep_the_first_weight() {
		let graph = build(vec![EdgeRecord::new("A", "B", 1.0), EdgeRecord::new("A", "B", 9.0)]);
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.edge("A", "B").unwrap().weight, 1.0);
	}

	#[test]
	fn reversed_pair_is_a_separate_edge() {
		let graph = build(vec![EdgeRecord::new("A", "B", 1.0), EdgeRecord::new("B", "A", 1.0)]);
		assert_eq!(graph.edge_count(), 2);
		assert_eq!(graph.node("A").unwrap().degree, 2);
		assert_eq!(graph.neighbors("A"), vec!["B"]);
	}

	#[test]
	fn nodes_keep_first_seen_order() {
		let graph = build(vec![
			EdgeRecord::new("C", "A", 1.0),
			EdgeRecord::new("B", "A", 1.0),
		]);
		let labels: Vec<&str> = graph.labels().collect();
		assert_eq!(labels, vec!["C", "A", "B"]);
		assert_eq!(graph.position("B"), Some(2));
	}

	#[test]
	fn edge_sizes_scale_to_the_heaviest() {
		let graph = build(vec![EdgeRecord::new("A", "B", 4.0), EdgeRecord::new("B", "C", 2.0)]);
		assert_eq!(graph.edge("A", "B").unwrap().size, 2.0);
		assert_eq!(graph.edge("B", "C").unwrap().size, 1.0);
	}

	#[test]
	fn node_sizes_span_the_configured_range() {
		let graph = build(vec![
			EdgeRecord::new("hub", "a", 1.0),
			EdgeRecord::new("hub", "b", 1.0),
			EdgeRecord::new("hub", "c", 1.0),
		]);
		assert_eq!(graph.node("hub").unwrap().size, 15.0);
		assert_eq!(graph.node("a").unwrap().size, 3.0);
	}

	#[test]
	fn equal_degrees_use_the_midpoint() {
		let graph = build(vec![EdgeRecord::new("A", "B", 1.0)]);
		assert!(graph.nodes().all(|n| n.size == 9.0));
	}

	#[test]
	fn self_loops_are_kept() {
		let graph = build(vec![EdgeRecord::new("A", "A", 1.0), EdgeRecord::new("A", "B", 1.0)]);
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.edge_count(), 2);
	}
}
