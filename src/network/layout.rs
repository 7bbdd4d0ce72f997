//! Node placement: a circular seed followed by force-directed relaxation.

use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::graph::NetworkGraph;
use crate::config::ForceParams;

/// Place every node on a circle around the origin, in node order.
pub fn circular(graph: &mut NetworkGraph, radius: f64) {
	let n = graph.node_count().max(1) as f64;
	for (i, node) in graph.nodes_mut().enumerate() {
		let angle = i as f64 * 2.0 * PI / n;
		node.x = radius * angle.cos();
		node.y = radius * angle.sin();
	}
}

/// Seed a circular layout and relax it for `iterations` simulation steps.
/// Positions are written back onto the graph's nodes.
pub fn relayout(graph: &mut NetworkGraph, iterations: usize, params: &ForceParams) {
	circular(graph, params.seed_radius);

	let mut sim: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: params.force_charge,
		force_spring: params.force_spring,
		force_max: params.force_max,
		node_speed: params.node_speed,
		damping_factor: params.damping_factor,
	});

	let handles: Vec<_> = graph
		.nodes()
		.enumerate()
		.map(|(i, node)| {
			sim.add_node(NodeData {
				x: node.x as f32,
				y: node.y as f32,
				mass: params.node_mass,
				is_anchor: false,
				user_data: i,
			})
		})
		.collect();
	for (s, t, _) in graph.edges() {
		if s != t {
			sim.add_edge(handles[s], handles[t], EdgeData::default());
		}
	}

	for _ in 0..iterations {
		sim.update(params.time_step);
	}

	let mut positions = vec![(0.0, 0.0); handles.len()];
	sim.visit_nodes(|node| {
		positions[node.data.user_data] = (node.x() as f64, node.y() as f64);
	});
	for (node, (x, y)) in graph.nodes_mut().zip(positions) {
		node.x = x;
		node.y = y;
	}
	debug!("relaid {} nodes over {iterations} iterations", handles.len());
}
