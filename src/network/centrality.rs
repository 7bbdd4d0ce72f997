//! Degree and eigenvector centrality, and the rankings built from them.
//!
//! Both metrics are rounded to three decimals as soon as they are computed;
//! sorting compares the rounded values, so nodes that differ only further
//! down are ties.

use std::cmp::Ordering;
use std::fmt;

use log::{debug, warn};

use super::graph::NetworkGraph;

/// Number of leading entries highlighted in a ranking.
pub const TOP_K: usize = 10;

const EIGENVECTOR_MAX_ITERATIONS: usize = 100;
const EIGENVECTOR_TOLERANCE: f64 = 1e-6;

/// Round to three decimal places.
pub fn round3(value: f64) -> f64 {
	(value * 1000.0).round() / 1000.0
}

/// Eigenvector centrality of one node. The power iteration can fail on
/// degenerate graphs, in which case no node has a value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eigenvector {
	/// The iteration did not converge.
	Unavailable,
	/// Converged value, rounded to three decimals.
	Value(f64),
}

impl Eigenvector {
	/// Numeric value, if any.
	pub fn value(&self) -> Option<f64> {
		match self {
			Eigenvector::Unavailable => None,
			Eigenvector::Value(v) => Some(*v),
		}
	}

	/// Descending order with unavailable values last.
	fn cmp_desc(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Eigenvector::Value(a), Eigenvector::Value(b)) => b.total_cmp(a),
			(Eigenvector::Value(_), Eigenvector::Unavailable) => Ordering::Less,
			(Eigenvector::Unavailable, Eigenvector::Value(_)) => Ordering::Greater,
			(Eigenvector::Unavailable, Eigenvector::Unavailable) => Ordering::Equal,
		}
	}
}

impl fmt::Display for Eigenvector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Eigenvector::Unavailable => f.write_str("N/A"),
			Eigenvector::Value(v) => write!(f, "{v:.3}"),
		}
	}
}

/// Centrality of a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct CentralityEntry {
	/// Node label.
	pub node: String,
	/// Degree centrality, rounded.
	pub degree: f64,
	/// Eigenvector centrality.
	pub eigenvector: Eigenvector,
}

/// Sort key for a ranking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankBy {
	/// Degree first, eigenvector breaks ties.
	#[default]
	Degree,
	/// Eigenvector first, degree breaks ties.
	Eigenvector,
}

impl RankBy {
	fn compare(&self, a: &CentralityEntry, b: &CentralityEntry) -> Ordering {
		let by_degree = || b.degree.total_cmp(&a.degree);
		let by_eigen = || a.eigenvector.cmp_desc(&b.eigenvector);
		match self {
			RankBy::Degree => by_degree().then_with(by_eigen),
			RankBy::Eigenvector => by_eigen().then_with(by_degree),
		}
	}
}

/// Centrality of every node, in graph node order.
#[derive(Clone, Debug, PartialEq)]
pub struct Centrality {
	entries: Vec<CentralityEntry>,
	eigenvector_available: bool,
}

impl Centrality {
	/// Centrality from precomputed entries.
	pub fn from_entries(entries: Vec<CentralityEntry>) -> Self {
		let eigenvector_available = !entries.is_empty()
			&& entries
				.iter()
				.all(|e| e.eigenvector != Eigenvector::Unavailable);
		Self {
			entries,
			eigenvector_available,
		}
	}

	/// Entries in graph node order.
	pub fn entries(&self) -> &[CentralityEntry] {
		&self.entries
	}

	/// Whether eigenvector centrality converged. When it did not, only the
	/// degree ranking should be offered.
	pub fn eigenvector_available(&self) -> bool {
		self.eigenvector_available
	}

	/// Entries sorted by `by`. Full ties keep graph node order.
	pub fn ranked(&self, by: RankBy) -> Ranking {
		let mut entries = self.entries.clone();
		entries.sort_by(|a, b| by.compare(a, b));
		Ranking { by, entries }
	}

	/// Store the values on the graph's nodes.
	pub fn apply(&self, graph: &mut NetworkGraph) {
		for entry in &self.entries {
			if let Some(node) = graph.node_mut(&entry.node) {
				node.degree_centrality = Some(entry.degree);
				node.eigenvector_centrality = Some(entry.eigenvector);
			}
		}
	}
}

/// A sorted view over centrality entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
	by: RankBy,
	entries: Vec<CentralityEntry>,
}

impl Ranking {
	/// Sort key used.
	pub fn by(&self) -> RankBy {
		self.by
	}

	/// All entries, best first.
	pub fn entries(&self) -> &[CentralityEntry] {
		&self.entries
	}

	/// The highlighted leading entries.
	pub fn top(&self) -> &[CentralityEntry] {
		&self.entries[..self.entries.len().min(TOP_K)]
	}

	/// Whether the entry at `position` is highlighted.
	pub fn is_top(&self, position: usize) -> bool {
		position < TOP_K && position < self.entries.len()
	}
}

/// Degree divided by `n - 1`; zero for graphs of one node.
fn degree_centrality(graph: &NetworkGraph) -> Vec<f64> {
	let n = graph.node_count();
	graph
		.nodes()
		.map(|node| {
			if n <= 1 {
				0.0
			} else {
				round3(node.degree as f64 / (n - 1) as f64)
			}
		})
		.collect()
}

/// Weighted power iteration on the undirected adjacency, shifted by the
/// identity so bipartite graphs still converge. `None` when the vector
/// vanishes or the iteration runs out before the tolerance is met.
fn eigenvector_centrality(graph: &NetworkGraph) -> Option<Vec<f64>> {
	let n = graph.node_count();
	if n == 0 {
		return None;
	}
	let edges: Vec<(usize, usize, f64)> = graph.edges().map(|(s, t, e)| (s, t, e.weight)).collect();
	let mut x = vec![1.0 / n as f64; n];

	for iteration in 0..EIGENVECTOR_MAX_ITERATIONS {
		let last = x.clone();
		for &(s, t, w) in &edges {
			x[s] += last[t] * w;
			if s != t {
				x[t] += last[s] * w;
			}
		}

		let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
		if norm == 0.0 || !norm.is_finite() {
			return None;
		}
		for v in &mut x {
			*v /= norm;
		}

		let diff: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
		if diff < n as f64 * EIGENVECTOR_TOLERANCE {
			debug!("eigenvector centrality converged after {} iterations", iteration + 1);
			return Some(x);
		}
	}
	None
}

/// Compute both centralities for every node of `graph`.
pub fn compute_centrality(graph: &NetworkGraph) -> Centrality {
	let degrees = degree_centrality(graph);
	let eigen = eigenvector_centrality(graph);
	if eigen.is_none() {
		warn!("eigenvector centrality did not converge; ranking by degree only");
	}

	let entries = graph
		.labels()
		.zip(degrees)
		.enumerate()
		.map(|(i, (label, degree))| CentralityEntry {
			node: label.to_string(),
			degree,
			eigenvector: eigen
				.as_ref()
				.map_or(Eigenvector::Unavailable, |values| Eigenvector::Value(round3(values[i]))),
		})
		.collect();
	Centrality::from_entries(entries)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::AnalysisConfig;
	use crate::network::records::EdgeRecord;

	fn graph(edges: &[(&str, &str, f64)]) -> NetworkGraph {
		NetworkGraph::build(
			edges.iter().map(|(s, t, w)| EdgeRecord::new(*s, *t, *w)),
			&AnalysisConfig::default(),
		)
		.unwrap()
	}

	fn entry(node: &str, degree: f64, eigenvector: Eigenvector) -> CentralityEntry {
		CentralityEntry {
			node: node.into(),
			degree,
			eigenvector,
		}
	}

	fn order(ranking: &Ranking) -> Vec<&str> {
		ranking.entries().iter().map(|e| e.node.as_str()).collect()
	}

	#[test]
	fn star_centre_dominates() {
		let g = graph(&[("hub", "a", 1.0), ("hub", "b", 1.0), ("hub", "c", 1.0)]);
		let centrality = compute_centrality(&g);
		assert!(centrality.eigenvector_available());
		let ranking = centrality.ranked(RankBy::Degree);
		assert_eq!(ranking.entries()[0].node, "hub");
		assert_eq!(ranking.entries()[0].degree, 1.0);
		assert_eq!(ranking.entries()[1].degree, 0.333);
		let by_eigen = centrality.ranked(RankBy::Eigenvector);
		assert_eq!(by_eigen.entries()[0].node, "hub");
	}

	#[test]
	fn cancelling_weights_leave_eigenvector_unavailable() {
		let g = graph(&[("A", "B", -1.0)]);
		assert_eq!(eigenvector_centrality(&g), None);

		let centrality = compute_centrality(&g);
		assert!(!centrality.eigenvector_available());
		assert!(centrality.entries().iter().all(|e| e.eigenvector == Eigenvector::Unavailable));
		let ranking = centrality.ranked(RankBy::Degree);
		assert_eq!(order(&ranking), vec!["A", "B"]);
		assert!(ranking.entries().iter().all(|e| e.degree == 1.0));
	}

	#[test]
	fn square_ties_fall_back_to_eigenvector() {
		let g = graph(&[("a", "b", 1.0), ("b", "c", 1.0), ("c", "d", 1.0), ("d", "a", 1.0)]);
		let centrality = compute_centrality(&g);
		assert!(centrality.entries().iter().all(|e| e.degree == 0.667));

		let mut entries = centrality.entries().to_vec();
		entries[2].eigenvector = Eigenvector::Value(0.9);
		entries[0].eigenvector = Eigenvector::Unavailable;
		let ranking = Centrality::from_entries(entries).ranked(RankBy::Degree);
		assert_eq!(order(&ranking).first(), Some(&"c"));
		assert_eq!(order(&ranking).last(), Some(&"a"));
	}

	#[test]
	fn unavailable_sorts_after_every_number() {
		let centrality = Centrality::from_entries(vec![
			entry("x", 0.5, Eigenvector::Unavailable),
			entry("y", 0.1, Eigenvector::Value(0.0)),
			entry("z", 0.9, Eigenvector::Value(0.2)),
		]);
		assert!(!centrality.eigenvector_available());
		let ranking = centrality.ranked(RankBy::Eigenvector);
		assert_eq!(order(&ranking), vec!["z", "y", "x"]);
	}

	#[test]
	fn eigenvector_ties_fall_back_to_degree() {
		let centrality = Centrality::from_entries(vec![
			entry("x", 0.2, Eigenvector::Value(0.5)),
			entry("y", 0.8, Eigenvector::Value(0.5)),
		]);
		assert_eq!(order(&centrality.ranked(RankBy::Eigenvector)), vec!["y", "x"]);
	}

	#[test]
	fn rounding_makes_near_values_ties() {
		let centrality = Centrality::from_entries(vec![
			entry("x", round3(0.33341), Eigenvector::Value(0.1)),
			entry("y", round3(0.33349), Eigenvector::Value(0.2)),
		]);
		assert_eq!(order(&centrality.ranked(RankBy::Degree)), vec!["y", "x"]);
	}

	#[test]
	fn top_k_is_ten() {
		let entries = (0..15)
			.map(|i| entry(&format!("n{i}"), i as f64 / 100.0, Eigenvector::Value(0.1)))
			.collect();
		let ranking = Centrality::from_entries(entries).ranked(RankBy::Degree);
		assert_eq!(ranking.top().len(), TOP_K);
		assert!(ranking.is_top(9));
		assert!(!ranking.is_top(10));
		assert_eq!(ranking.top()[0].node, "n14");
	}

	#[test]
	fn apply_writes_node_attributes() {
		let mut g = graph(&[("a", "b", 1.0)]);
		let centrality = compute_centrality(&g);
		centrality.apply(&mut g);
		let a = g.node("a").unwrap();
		assert_eq!(a.degree_centrality, Some(1.0));
		assert!(matches!(a.eigenvector_centrality, Some(Eigenvector::Value(_))));
	}

	#[test]
	fn display_uses_three_decimals() {
		assert_eq!(Eigenvector::Value(0.5).to_string(), "0.500");
		assert_eq!(Eigenvector::Unavailable.to_string(), "N/A");
	}
}
