//! Louvain modularity optimisation on a weighted, undirected edge list.
//!
//! Two phases repeat until the partition stops improving:
//!
//! 1. **Local moving**: every node, in index order, moves to the neighbouring
//!    community with the largest modularity gain.
//! 2. **Aggregation**: communities collapse into single nodes; edges between
//!    them are summed and internal edges become self-loops.
//!
//! Traversal order is fixed and ties keep the first candidate seen, so the
//! result is deterministic for a given input.
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."

use indexmap::IndexMap;

/// Louvain settings.
#[derive(Debug, Clone)]
pub struct Louvain {
	resolution: f64,
	max_passes: usize,
	max_levels: usize,
	min_gain: f64,
}

impl Default for Louvain {
	fn default() -> Self {
		Self::new(1.0)
	}
}

/// Level-local working graph: adjacency lists plus self-loop weights.
struct Level {
	adjacency: Vec<Vec<(usize, f64)>>,
	self_loops: Vec<f64>,
}

impl Level {
	fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Self {
		let mut merged: Vec<IndexMap<usize, f64>> = vec![IndexMap::new(); n];
		let mut self_loops = vec![0.0; n];
		for &(i, j, w) in edges {
			if i == j {
				self_loops[i] += w;
			} else {
				*merged[i].entry(j).or_insert(0.0) += w;
				*merged[j].entry(i).or_insert(0.0) += w;
			}
		}
		Self {
			adjacency: merged.into_iter().map(|m| m.into_iter().collect()).collect(),
			self_loops,
		}
	}

	fn len(&self) -> usize {
		self.self_loops.len()
	}

	/// Total edge weight, each edge once.
	fn total_weight(&self) -> f64 {
		let links: f64 = self
			.adjacency
			.iter()
			.flat_map(|adj| adj.iter().map(|(_, w)| w))
			.sum();
		links / 2.0 + self.self_loops.iter().sum::<f64>()
	}

	fn strengths(&self) -> Vec<f64> {
		self.adjacency
			.iter()
			.zip(&self.self_loops)
			.map(|(adj, sl)| adj.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * sl)
			.collect()
	}
}

impl Louvain {
	/// Louvain at the given resolution. Higher values give smaller communities.
	pub fn new(resolution: f64) -> Self {
		Self {
			resolution,
			max_passes: 100,
			max_levels: 10,
			min_gain: 1e-7,
		}
	}

	/// Resolution in use.
	pub fn resolution(&self) -> f64 {
		self.resolution
	}

	fn modularity(&self, level: &Level, communities: &[usize]) -> f64 {
		let m = level.total_weight();
		if m == 0.0 {
			return 0.0;
		}
		let strengths = level.strengths();
		let k = communities.iter().copied().max().map_or(0, |c| c + 1);
		let mut internal = vec![0.0; k];
		let mut totals = vec![0.0; k];
		for (i, adj) in level.adjacency.iter().enumerate() {
			let c = communities[i];
			totals[c] += strengths[i];
			internal[c] += 2.0 * level.self_loops[i];
			for &(j, w) in adj {
				if communities[j] == c {
					internal[c] += w;
				}
			}
		}
		internal
			.iter()
			.zip(&totals)
			.map(|(inside, total)| {
				inside / (2.0 * m) - self.resolution * (total / (2.0 * m)).powi(2)
			})
			.sum()
	}

	/// Local moving phase. Returns consecutive community ids per node and
	/// whether any node moved.
	fn local_moving(&self, level: &Level) -> (Vec<usize>, bool) {
		let n = level.len();
		let m = level.total_weight();
		let mut communities: Vec<usize> = (0..n).collect();
		if m == 0.0 {
			return (communities, false);
		}

		let strengths = level.strengths();
		let mut totals = strengths.clone();
		let mut moved_any = false;

		for _ in 0..self.max_passes {
			let mut moved = false;
			for node in 0..n {
				let current = communities[node];
				let k_i = strengths[node];
				totals[current] -= k_i;

				let mut links: IndexMap<usize, f64> = IndexMap::new();
				links.insert(current, 0.0);
				for &(neighbor, w) in &level.adjacency[node] {
					*links.entry(communities[neighbor]).or_insert(0.0) += w;
				}

				let gain = |c: usize, k_in: f64| k_in - self.resolution * totals[c] * k_i / (2.0 * m);
				let mut best = current;
				let mut best_gain = gain(current, links[&current]);
				for (&candidate, &k_in) in &links {
					let g = gain(candidate, k_in);
					if g > best_gain {
						best = candidate;
						best_gain = g;
					}
				}

				totals[best] += k_i;
				if best != current {
					communities[node] = best;
					moved = true;
					moved_any = true;
				}
			}
			if !moved {
				break;
			}
		}

		(renumber(&communities), moved_any)
	}

	fn aggregate(level: &Level, communities: &[usize]) -> Level {
		let k = communities.iter().copied().max().map_or(0, |c| c + 1);
		let mut edges = Vec::new();
		for (i, adj) in level.adjacency.iter().enumerate() {
			let ci = communities[i];
			edges.push((ci, ci, level.self_loops[i]));
			for &(j, w) in adj {
				// each undirected edge appears twice in the adjacency
				if i < j {
					edges.push((ci, communities[j], w));
				}
			}
		}
		Level::from_edges(k, &edges)
	}

	/// Detect communities among `n` nodes joined by weighted `(i, j, w)`
	/// edges. Parallel edges are summed; `i == j` is a self-loop.
	///
	/// Returns a community id per node, numbered consecutively in order of
	/// first appearance.
	pub fn detect(&self, n: usize, edges: &[(usize, usize, f64)]) -> Vec<usize> {
		let mut membership: Vec<usize> = (0..n).collect();
		if n == 0 {
			return membership;
		}

		let mut level = Level::from_edges(n, edges);
		let mut best_modularity = f64::NEG_INFINITY;

		for _ in 0..self.max_levels {
			let (partition, moved) = self.local_moving(&level);
			if !moved {
				break;
			}
			let q = self.modularity(&level, &partition);
			if q - best_modularity < self.min_gain {
				break;
			}
			best_modularity = q;

			for community in &mut membership {
				*community = partition[*community];
			}
			let k = partition.iter().copied().max().map_or(0, |c| c + 1);
			if k == level.len() {
				break;
			}
			level = Self::aggregate(&level, &partition);
		}

		renumber(&membership)
	}
}

/// Relabel ids consecutively in order of first appearance.
fn renumber(ids: &[usize]) -> Vec<usize> {
	let mut seen: IndexMap<usize, usize> = IndexMap::new();
	ids.iter()
		.map(|id| {
			let next = seen.len();
			*seen.entry(*id).or_insert(next)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn triangle(offset: usize) -> Vec<(usize, usize, f64)> {
		vec![
			(offset, offset + 1, 1.0),
			(offset + 1, offset + 2, 1.0),
			(offset, offset + 2, 1.0),
		]
	}

	#[test]
	fn triangle_is_one_community() {
		let communities = Louvain::default().detect(3, &triangle(0));
		assert_eq!(communities, vec![0, 0, 0]);
	}

	#[test]
	fn two_cliques_split_at_the_bridge() {
		let mut edges = triangle(0);
		edges.extend(triangle(3));
		edges.push((2, 3, 1.0));
		let communities = Louvain::default().detect(6, &edges);

		assert_eq!(communities[0], communities[1]);
		assert_eq!(communities[1], communities[2]);
		assert_eq!(communities[3], communities[4]);
		assert_eq!(communities[4], communities[5]);
		assert_ne!(communities[0], communities[3]);
	}

	#[test]
	fn isolated_nodes_stay_apart() {
		let communities = Louvain::default().detect(2, &[]);
		assert_ne!(communities[0], communities[1]);
	}

	#[test]
	fn zero_resolution_merges_connected_nodes() {
		let mut edges = triangle(0);
		edges.extend(triangle(3));
		edges.push((2, 3, 1.0));
		let communities = Louvain::new(0.0).detect(6, &edges);
		assert!(communities.iter().all(|&c| c == 0));
	}

	#[test]
	fn high_resolution_yields_more_communities() {
		let mut edges = triangle(0);
		edges.extend(triangle(3));
		edges.push((2, 3, 1.0));
		let coarse = Louvain::new(0.2).detect(6, &edges);
		let fine = Louvain::new(3.0).detect(6, &edges);
		let count = |c: &[usize]| c.iter().max().map_or(0, |m| m + 1);
		assert!(count(&fine) >= count(&coarse));
	}

	#[test]
	fn renumbering_follows_first_appearance() {
		assert_eq!(renumber(&[7, 3, 7, 9]), vec![0, 1, 0, 2]);
	}
}
