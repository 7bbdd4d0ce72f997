//! The analysis context: one drawn graph and everything derived from it.
//!
//! A [`Session`] owns the graph, the current partition, the centrality
//! results and the resolution control. Drawing replaces the graph and drops
//! everything derived from the previous one.

use log::{debug, info, warn};

use super::centrality::{Centrality, RankBy, Ranking, compute_centrality};
use super::community::{self, Partition, Resolution, ResolutionStep};
use super::error::{Error, Result};
use super::graph::NetworkGraph;
use super::layout;
use super::snapshot::{ReportFields, SNAPSHOT_VERSION, Snapshot};
use super::table::{Cell, Row};
use crate::config::AnalysisConfig;

/// Owner of the current graph and its analysis results.
#[derive(Clone, Debug)]
pub struct Session {
	config: AnalysisConfig,
	graph: Option<NetworkGraph>,
	partition: Option<Partition>,
	centrality: Option<Centrality>,
	resolution: Resolution,
	community_detected: bool,
}

impl Default for Session {
	fn default() -> Self {
		Self::new(AnalysisConfig::default())
	}
}

fn is_filled(row: &Row) -> bool {
	!row.iter().all(Cell::is_blank)
}

impl Session {
	/// Empty session using `config`.
	pub fn new(config: AnalysisConfig) -> Self {
		let resolution = Resolution::new(&config);
		Self {
			config,
			graph: None,
			partition: None,
			centrality: None,
			resolution,
			community_detected: false,
		}
	}

	/// Configuration in use.
	pub fn config(&self) -> &AnalysisConfig {
		&self.config
	}

	/// Build a fresh graph from table rows and lay it out.
	///
	/// Fails with [`Error::NoTableData`] when every row is blank and with
	/// [`Error::NoGraphData`] when no row yields an edge. On failure the
	/// previous graph is kept.
	pub fn draw(&mut self, rows: &[Row]) -> Result<&NetworkGraph> {
		if !rows.iter().any(is_filled) {
			return Err(Error::NoTableData);
		}
		let mut graph = NetworkGraph::from_rows(rows, &self.config)?;
		layout::relayout(&mut graph, self.config.draw_layout_iterations, &self.config.force);
		info!(
			"drew graph with {} nodes and {} edges",
			graph.node_count(),
			graph.edge_count()
		);

		self.partition = None;
		self.centrality = None;
		self.community_detected = false;
		self.resolution.reset();
		Ok(self.graph.insert(graph))
	}

	/// The drawn graph, if any.
	pub fn graph(&self) -> Option<&NetworkGraph> {
		self.graph.as_ref()
	}

	/// The current partition, if communities have been detected.
	pub fn partition(&self) -> Option<&Partition> {
		self.partition.as_ref()
	}

	/// Centrality results, if computed.
	pub fn centrality(&self) -> Option<&Centrality> {
		self.centrality.as_ref()
	}

	/// Current resolution value.
	pub fn resolution(&self) -> f64 {
		self.resolution.value()
	}

	/// Whether nodes are currently coloured by community.
	pub fn community_detected(&self) -> bool {
		self.community_detected
	}

	fn graph_mut(&mut self) -> Result<&mut NetworkGraph> {
		self.graph.as_mut().ok_or(Error::NoGraph)
	}

	/// Partition the graph at the current resolution, colour it and re-layout.
	pub fn detect_communities(&mut self) -> Result<&Partition> {
		let resolution = self.resolution.value();
		let iterations = self.config.partition_layout_iterations;
		let force = self.config.force.clone();

		let graph = self.graph_mut()?;
		let partition = community::detect_communities(graph, resolution);
		partition.apply(graph);
		layout::relayout(graph, iterations, &force);

		self.community_detected = true;
		Ok(self.partition.insert(partition))
	}

	/// Switch community colouring off: every node takes the neutral colour
	/// and the graph is laid out again.
	pub fn clear_communities(&mut self) -> Result<()> {
		let neutral = self.config.neutral_color.clone();
		let iterations = self.config.partition_layout_iterations;
		let force = self.config.force.clone();

		let graph = self.graph_mut()?;
		community::clear_communities(graph, &neutral);
		layout::relayout(graph, iterations, &force);

		self.partition = None;
		self.community_detected = false;
		debug!("community colouring cleared");
		Ok(())
	}

	fn after_step(&mut self, step: ResolutionStep) -> Result<ResolutionStep> {
		if step.repartition {
			self.detect_communities()?;
		}
		Ok(step)
	}

	/// Raise the resolution by one step and repartition.
	pub fn increase_resolution(&mut self) -> Result<ResolutionStep> {
		if self.graph.is_none() {
			return Err(Error::NoGraph);
		}
		let step = self.resolution.increase();
		self.after_step(step)
	}

	/// Lower the resolution by one step; repartition unless it was already
	/// at zero.
	pub fn decrease_resolution(&mut self) -> Result<ResolutionStep> {
		if self.graph.is_none() {
			return Err(Error::NoGraph);
		}
		let step = self.resolution.decrease();
		self.after_step(step)
	}

	/// Compute both centralities and store them on the nodes.
	pub fn compute_centrality(&mut self) -> Result<&Centrality> {
		let graph = self.graph_mut()?;
		let centrality = compute_centrality(graph);
		centrality.apply(graph);
		Ok(self.centrality.insert(centrality))
	}

	/// Ranking of the computed centralities.
	pub fn ranking(&self, by: RankBy) -> Result<Ranking> {
		self.centrality
			.as_ref()
			.map(|c| c.ranked(by))
			.ok_or(Error::NoGraph)
	}

	/// Capture the analysis for storage. Community data is included only
	/// while colouring is on; the saved centrality list is the degree
	/// ranking's top entries.
	pub fn snapshot(&self, rows: &[Row], report: ReportFields) -> Snapshot {
		let (communities, community_colors) = match (&self.partition, self.community_detected) {
			(Some(partition), true) => (partition.members().clone(), partition.colors().clone()),
			_ => Default::default(),
		};
		let top_centrality = self
			.centrality
			.as_ref()
			.map(|c| c.ranked(RankBy::Degree).top().to_vec())
			.unwrap_or_default();

		Snapshot {
			version: SNAPSHOT_VERSION,
			rows: rows.iter().filter(|r| is_filled(r)).cloned().collect(),
			communities,
			community_colors,
			community_detected: self.community_detected,
			top_centrality,
			report,
		}
	}

	/// Redraw from a snapshot. Stored communities are reapplied when the
	/// snapshot had colouring on, or detected afresh when they no longer
	/// cover every node; centrality is left for the user to recompute.
	pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
		self.draw(&snapshot.rows)?;
		if snapshot.community_detected && !snapshot.communities.is_empty() {
			let partition = Partition::from_parts(
				self.resolution.value(),
				snapshot.communities.clone(),
				snapshot.community_colors.clone(),
			);
			if !partition.covers(self.graph.as_ref().ok_or(Error::NoGraph)?) {
				warn!("stored communities do not cover every node; detecting them again");
				self.detect_communities()?;
			} else {
				let iterations = self.config.partition_layout_iterations;
				let force = self.config.force.clone();
				let graph = self.graph_mut()?;
				partition.apply(graph);
				layout::relayout(graph, iterations, &force);
				self.partition = Some(partition);
				self.community_detected = true;
			}
		}
		info!("restored snapshot with {} rows", snapshot.rows.len());
		Ok(())
	}

	/// Drop the graph and all derived results.
	pub fn reset(&mut self) {
		self.graph = None;
		self.partition = None;
		self.centrality = None;
		self.community_detected = false;
		self.resolution.reset();
	}

	/// End the session, returning its configuration.
	pub fn dispose(self) -> AnalysisConfig {
		debug!("session disposed");
		self.config
	}
}
