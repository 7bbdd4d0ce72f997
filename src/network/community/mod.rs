//! Community partitioning of a built graph.
//!
//! Partitions come from [`Louvain`] run on the undirected view of the graph
//! (edge weights summed across both stored directions). Each community id is
//! coloured from a fixed palette, so re-running at the same resolution keeps
//! the colours.

mod louvain;

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};

use super::graph::NetworkGraph;
use crate::config::AnalysisConfig;

pub use louvain::Louvain;

/// Community colours, indexed by id modulo length.
pub const PALETTE: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Display colour of a community id.
pub fn community_color(id: usize) -> &'static str {
	PALETTE[id % PALETTE.len()]
}

/// Assignment of every node to a community.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
	resolution: f64,
	members: BTreeMap<usize, Vec<String>>,
	colors: BTreeMap<usize, String>,
}

impl Partition {
	/// Partition from stored parts, as restored from a snapshot.
	pub fn from_parts(
		resolution: f64,
		members: BTreeMap<usize, Vec<String>>,
		colors: BTreeMap<usize, String>,
	) -> Self {
		Self {
			resolution,
			members,
			colors,
		}
	}

	fn from_assignments(resolution: f64, graph: &NetworkGraph, assignments: &[usize]) -> Self {
		let mut members: BTreeMap<usize, Vec<String>> = BTreeMap::new();
		for (label, &community) in graph.labels().zip(assignments) {
			members.entry(community).or_default().push(label.to_string());
		}
		let colors = members
			.keys()
			.map(|&id| (id, community_color(id).to_string()))
			.collect();
		Self {
			resolution,
			members,
			colors,
		}
	}

	/// Resolution the partition was computed at.
	pub fn resolution(&self) -> f64 {
		self.resolution
	}

	/// Members per community id, in node order.
	pub fn members(&self) -> &BTreeMap<usize, Vec<String>> {
		&self.members
	}

	/// Colour per community id.
	pub fn colors(&self) -> &BTreeMap<usize, String> {
		&self.colors
	}

	/// Number of communities.
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// True when no node was assigned.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Community id of a node.
	pub fn community_of(&self, label: &str) -> Option<usize> {
		self.members
			.iter()
			.find(|(_, nodes)| nodes.iter().any(|n| n == label))
			.map(|(&id, _)| id)
	}

	/// True when every node of `graph` belongs to some community.
	pub fn covers(&self, graph: &NetworkGraph) -> bool {
		graph.labels().all(|label| self.community_of(label).is_some())
	}

	/// Colour of a community id.
	pub fn color_of(&self, id: usize) -> Option<&str> {
		self.colors.get(&id).map(String::as_str)
	}

	/// Write community ids and colours onto the graph's nodes. Nodes the
	/// partition does not mention are left as they are.
	pub fn apply(&self, graph: &mut NetworkGraph) {
		for (&id, nodes) in &self.members {
			let color = self
				.color_of(id)
				.map(str::to_string)
				.unwrap_or_else(|| community_color(id).to_string());
			for label in nodes {
				if let Some(node) = graph.node_mut(label) {
					node.community = Some(id);
					node.color = color.clone();
					node.original_color = color.clone();
				}
			}
		}
	}

	/// Mean layout position of each community, for placing labels.
	pub fn centroids(&self, graph: &NetworkGraph) -> BTreeMap<usize, (f64, f64)> {
		self.members
			.iter()
			.filter_map(|(&id, nodes)| {
				let positions: Vec<(f64, f64)> = nodes
					.iter()
					.filter_map(|label| graph.node(label))
					.map(|n| (n.x, n.y))
					.collect();
				if positions.is_empty() {
					return None;
				}
				let count = positions.len() as f64;
				let (sx, sy) = positions
					.iter()
					.fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
				Some((id, (sx / count, sy / count)))
			})
			.collect()
	}
}

/// Partition `graph` at `resolution`.
///
/// A graph without edges has no modularity to optimise and comes back as a
/// single community holding every node.
pub fn detect_communities(graph: &NetworkGraph, resolution: f64) -> Partition {
	let n = graph.node_count();
	let assignments = if graph.edge_count() == 0 {
		vec![0; n]
	} else {
		let edges: Vec<(usize, usize, f64)> = graph.edges().map(|(s, t, e)| (s, t, e.weight)).collect();
		Louvain::new(resolution).detect(n, &edges)
	};
	let partition = Partition::from_assignments(resolution, graph, &assignments);
	info!(
		"found {} communities at resolution {resolution:.1}",
		partition.len()
	);
	partition
}

/// Remove community colouring: every node goes back to the neutral colour.
pub fn clear_communities(graph: &mut NetworkGraph, neutral_color: &str) {
	for node in graph.nodes_mut() {
		node.community = None;
		node.color = neutral_color.to_string();
		node.original_color = neutral_color.to_string();
	}
}

/// Why a resolution change did not simply move by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionNotice {
	/// The increase went past the maximum; the resolution wrapped to default.
	TooManyCommunities,
	/// The decrease went below zero; the resolution stays at zero.
	CannotReduceFurther,
}

impl fmt::Display for ResolutionNotice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResolutionNotice::TooManyCommunities => {
				f.write_str("Too many communities. Starting over from the default resolution.")
			}
			ResolutionNotice::CannotReduceFurther => {
				f.write_str("The number of communities cannot be reduced any further.")
			}
		}
	}
}

/// Outcome of one press of a resolution button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionStep {
	/// Resolution after the step.
	pub value: f64,
	/// Set when the step hit a bound.
	pub notice: Option<ResolutionNotice>,
	/// Whether the partition has to be recomputed.
	pub repartition: bool,
}

/// Stepped resolution control, kept within `[0, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
	value: f64,
	default: f64,
	step: f64,
	max: f64,
}

impl Resolution {
	/// Control starting at the configured default.
	pub fn new(config: &AnalysisConfig) -> Self {
		Self {
			value: config.resolution_default,
			default: config.resolution_default,
			step: config.resolution_step,
			max: config.resolution_max,
		}
	}

	/// Current value.
	pub fn value(&self) -> f64 {
		self.value
	}

	/// Back to the default.
	pub fn reset(&mut self) {
		self.value = self.default;
	}

	/// One decimal place keeps repeated steps from drifting.
	fn round(value: f64) -> f64 {
		(value * 10.0).round() / 10.0
	}

	/// Step up. Past the maximum the value wraps to the default; the
	/// partition is recomputed either way.
	pub fn increase(&mut self) -> ResolutionStep {
		let next = Self::round(self.value + self.step);
		let notice = if next > self.max {
			self.value = self.default;
			Some(ResolutionNotice::TooManyCommunities)
		} else {
			self.value = next;
			None
		};
		debug!("resolution increased to {:.1}", self.value);
		ResolutionStep {
			value: self.value,
			notice,
			repartition: true,
		}
	}

	/// Step down. Below zero the value clamps at zero and the partition is
	/// left as it is.
	pub fn decrease(&mut self) -> ResolutionStep {
		let next = Self::round(self.value - self.step);
		if next < 0.0 {
			self.value = 0.0;
			return ResolutionStep {
				value: 0.0,
				notice: Some(ResolutionNotice::CannotReduceFurther),
				repartition: false,
			};
		}
		self.value = next;
		debug!("resolution decreased to {:.1}", self.value);
		ResolutionStep {
			value: self.value,
			notice: None,
			repartition: true,
		}
	}
}
