//! Tunables for the analysis pipeline and the force simulation.
//!
//! Every field has a default, so a partial JSON document (or none at all) is
//! enough to get a working configuration.

use serde::{Deserialize, Serialize};

use crate::network::Result;

/// Parameters handed to the force-directed relaxation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceParams {
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Spring constant along edges.
	pub force_spring: f32,
	/// Upper bound on the force applied to a node in one step.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Velocity damping per step.
	pub damping_factor: f32,
	/// Mass of every node.
	pub node_mass: f32,
	/// Simulated seconds per layout iteration.
	pub time_step: f32,
	/// Radius of the circular seed layout.
	pub seed_radius: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
			time_step: 0.016,
			seed_radius: 100.0,
		}
	}
}

/// Configuration for a whole analysis session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
	/// Smallest rendered node size (lowest degree).
	pub node_size_min: f64,
	/// Largest rendered node size (highest degree).
	pub node_size_max: f64,
	/// Rendered width of the heaviest edge.
	pub edge_size_scale: f64,
	/// Resolution used when a graph is first drawn.
	pub resolution_default: f64,
	/// Increment applied by the resolution buttons.
	pub resolution_step: f64,
	/// Resolution above which the control wraps back to the default.
	pub resolution_max: f64,
	/// Layout iterations after a fresh draw.
	pub draw_layout_iterations: usize,
	/// Layout iterations after (re)partitioning.
	pub partition_layout_iterations: usize,
	/// Colour of nodes while community detection is off.
	pub neutral_color: String,
	/// Force simulation parameters.
	pub force: ForceParams,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			node_size_min: 3.0,
			node_size_max: 15.0,
			edge_size_scale: 2.0,
			resolution_default: 1.0,
			resolution_step: 0.2,
			resolution_max: 3.0,
			draw_layout_iterations: 500,
			partition_layout_iterations: 300,
			neutral_color: "#666".into(),
			force: ForceParams::default(),
		}
	}
}

impl AnalysisConfig {
	/// Parse a configuration document, filling missing fields with defaults.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_document_keeps_defaults() {
		let config =
			AnalysisConfig::from_json(r#"{"node_size_max": 20.0, "force": {"force_charge": 90.0}}"#)
				.unwrap();
		assert_eq!(config.node_size_max, 20.0);
		assert_eq!(config.node_size_min, 3.0);
		assert_eq!(config.force.force_charge, 90.0);
		assert_eq!(config.force.force_spring, 0.05);
		assert_eq!(config.draw_layout_iterations, 500);
	}

	#[test]
	fn rejects_malformed_documents() {
		assert!(AnalysisConfig::from_json("{not json").is_err());
	}
}
