//! Live simulation behind the canvas and the pointer interaction on it.

use std::collections::{BTreeMap, HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::config::ForceParams;

/// Smallest pick radius in world space, so tiny nodes stay clickable.
pub const HIT_RADIUS: f64 = 8.0;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
const FADE_IN_DELAY: f64 = 0.08;
const FADE_IN_RATE: f64 = 1.8;
const FADE_OUT_RATE: f64 = 1.26;

type Adjacency = HashMap<DefaultNodeIdx, HashSet<DefaultNodeIdx>>;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: String,
	pub color: String,
	pub radius: f64,
	pub community: Option<usize>,
}

/// Screen position of the world origin, and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Viewport {
	pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by `factor`, keeping the world point under `(sx, sy)` in place.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = k;
	}
}

/// What the pointer is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	DragNode {
		node: DefaultNodeIdx,
		from: (f64, f64),
		node_from: (f32, f32),
	},
	Pan {
		from: (f64, f64),
		view_from: (f64, f64),
	},
}

/// Hovered node plus its neighbours. `strength` eases towards 1 while a node
/// is hovered and back to 0 afterwards; the set stays lit until it is gone.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
	focus: Option<DefaultNodeIdx>,
	fading: Option<DefaultNodeIdx>,
	lit: HashSet<DefaultNodeIdx>,
	pub strength: f64,
	delay: f64,
}

impl Highlight {
	fn set(&mut self, node: Option<DefaultNodeIdx>, adjacency: &Adjacency) {
		if self.focus == node {
			return;
		}
		match node {
			Some(idx) => {
				if self.focus.is_none() {
					self.delay = 0.0;
				}
				self.focus = Some(idx);
				self.fading = None;
				self.lit = adjacency.get(&idx).cloned().unwrap_or_default();
				self.lit.insert(idx);
			}
			None => self.fading = self.focus.take(),
		}
	}

	fn step(&mut self, dt: f64) {
		if self.focus.is_some() {
			self.delay = (self.delay + dt).min(FADE_IN_DELAY);
			if self.delay >= FADE_IN_DELAY {
				self.strength += (1.0 - self.strength) * FADE_IN_RATE * dt;
			}
			return;
		}
		self.strength -= self.strength * FADE_OUT_RATE * dt;
		if self.strength < 0.01 {
			self.strength = 0.0;
			self.fading = None;
			self.lit.clear();
		}
	}

	pub fn active(&self) -> bool {
		self.focus.is_some() || self.fading.is_some()
	}

	pub fn is_lit(&self, idx: DefaultNodeIdx) -> bool {
		self.lit.contains(&idx)
	}

	pub fn is_focus(&self, idx: DefaultNodeIdx) -> bool {
		self.focus.or(self.fading) == Some(idx)
	}
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, f64>,
	pub view: Viewport,
	pub gesture: Gesture,
	pub highlight: Highlight,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	adjacency: Adjacency,
}

impl ForceGraphState {
	/// Seed the live simulation from an already laid-out graph, centred in
	/// a `width` by `height` canvas.
	pub fn new(data: &GraphData, params: &ForceParams, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: params.force_charge,
			force_spring: params.force_spring,
			force_max: params.force_max,
			node_speed: params.node_speed,
			damping_factor: params.damping_factor,
		});

		let by_id: HashMap<&str, DefaultNodeIdx> = data
			.nodes
			.iter()
			.map(|node| {
				let idx = graph.add_node(NodeData {
					x: node.x as f32,
					y: node.y as f32,
					mass: params.node_mass,
					is_anchor: false,
					user_data: NodeInfo {
						label: node.label.clone(),
						color: node.color.clone(),
						radius: node.size,
						community: node.community,
					},
				});
				(node.id.as_str(), idx)
			})
			.collect();

		let mut adjacency = Adjacency::new();
		for link in data.links.iter().filter(|l| l.source != l.target) {
			let endpoints = (by_id.get(link.source.as_str()), by_id.get(link.target.as_str()));
			let (Some(&src), Some(&tgt)) = endpoints else {
				continue;
			};
			graph.add_edge(src, tgt, EdgeData { user_data: link.width });
			adjacency.entry(src).or_default().insert(tgt);
			adjacency.entry(tgt).or_default().insert(src);
		}

		Self {
			graph,
			view: Viewport {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			gesture: Gesture::Idle,
			highlight: Highlight::default(),
			width,
			height,
			animation_running: true,
			adjacency,
		}
	}

	/// Topmost node under a screen point.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (wx, wy) = self.view.to_world(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - wx, node.y() as f64 - wy);
			if dx.hypot(dy) < node.data.user_data.radius.max(HIT_RADIUS) {
				found = Some(node.index());
			}
		});
		found
	}

	fn node_position(&self, idx: DefaultNodeIdx) -> (f32, f32) {
		let mut position = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				position = (node.x(), node.y());
			}
		});
		position
	}

	/// Grab the node under the pointer, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.gesture = match self.node_at(sx, sy) {
			Some(node) => Gesture::DragNode {
				node,
				from: (sx, sy),
				node_from: self.node_position(node),
			},
			None => Gesture::Pan {
				from: (sx, sy),
				view_from: (self.view.x, self.view.y),
			},
		};
	}

	/// Follow the pointer. A dragged node is pinned where it is dropped.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.gesture {
			Gesture::DragNode {
				node,
				from,
				node_from,
			} => {
				let x = node_from.0 + ((sx - from.0) / self.view.k) as f32;
				let y = node_from.1 + ((sy - from.1) / self.view.k) as f32;
				self.graph.visit_nodes_mut(|n| {
					if n.index() == node {
						n.data.x = x;
						n.data.y = y;
						n.data.is_anchor = true;
					}
				});
			}
			Gesture::Pan { from, view_from } => {
				self.view.x = view_from.0 + (sx - from.0);
				self.view.y = view_from.1 + (sy - from.1);
				self.hover(sx, sy);
			}
			Gesture::Idle => self.hover(sx, sy),
		}
	}

	fn hover(&mut self, sx: f64, sy: f64) {
		let node = self.node_at(sx, sy);
		self.highlight.set(node, &self.adjacency);
	}

	pub fn pointer_up(&mut self) {
		self.gesture = Gesture::Idle;
	}

	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.highlight.set(None, &self.adjacency);
	}

	/// Wheel zoom: scrolling down zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.view.zoom_at(sx, sy, factor);
	}

	/// Live centre of every community, for the "Community N" labels.
	pub fn community_anchors(&self) -> BTreeMap<usize, (f64, f64)> {
		let mut sums: BTreeMap<usize, (f64, f64, f64)> = BTreeMap::new();
		self.graph.visit_nodes(|node| {
			if let Some(id) = node.data.user_data.community {
				let entry = sums.entry(id).or_insert((0.0, 0.0, 0.0));
				entry.0 += node.x() as f64;
				entry.1 += node.y() as f64;
				entry.2 += 1.0;
			}
		});
		sums.into_iter()
			.map(|(id, (sx, sy, n))| (id, (sx / n, sy / n)))
			.collect()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.highlight.step(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, x: f64, community: Option<usize>) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			color: "#666".into(),
			size: 9.0,
			community,
			x,
			y: 0.0,
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			width: 2.0,
		}
	}

	// a, b and c sit on the x axis; the canvas centre (200, 150) is the origin
	fn state() -> ForceGraphState {
		let data = GraphData {
			nodes: vec![
				node("a", -100.0, Some(0)),
				node("b", -50.0, Some(0)),
				node("c", 100.0, Some(1)),
			],
			links: vec![link("a", "b"), link("b", "c"), link("c", "c")],
		};
		ForceGraphState::new(&data, &ForceParams::default(), 400.0, 300.0)
	}

	#[test]
	fn hover_lights_the_node_and_its_neighbours() {
		let mut s = state();
		s.pointer_move(150.0, 150.0);
		let b = s.node_at(150.0, 150.0).unwrap();
		assert!(s.highlight.is_focus(b));
		assert_eq!(s.highlight.lit.len(), 3);

		s.pointer_leave();
		assert!(s.highlight.active());
		for _ in 0..500 {
			s.highlight.step(0.016);
		}
		assert!(!s.highlight.active());
		assert!(!s.highlight.is_lit(b));
	}

	#[test]
	fn dragging_pins_the_node_where_it_is_dropped() {
		let mut s = state();
		s.pointer_down(100.0, 150.0);
		let a = match s.gesture {
			Gesture::DragNode { node, .. } => node,
			other => panic!("expected a drag, got {other:?}"),
		};
		s.pointer_move(100.0, 200.0);
		s.pointer_up();
		assert_eq!(s.gesture, Gesture::Idle);
		assert_eq!(s.node_position(a), (-100.0, 50.0));
	}

	#[test]
	fn background_drag_pans_the_view() {
		let mut s = state();
		s.pointer_down(200.0, 20.0);
		s.pointer_move(230.0, 40.0);
		assert_eq!((s.view.x, s.view.y), (230.0, 170.0));
	}

	#[test]
	fn zoom_keeps_the_cursor_point_and_clamps() {
		let mut view = Viewport {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		};
		let before = view.to_world(50.0, 50.0);
		view.zoom_at(50.0, 50.0, 2.0);
		let after = view.to_world(50.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		view.zoom_at(0.0, 0.0, 100.0);
		assert_eq!(view.k, MAX_ZOOM);
	}

	#[test]
	fn anchors_average_member_positions() {
		let anchors = state().community_anchors();
		assert_eq!(anchors.len(), 2);
		assert_eq!(anchors[&0], (-75.0, 0.0));
		assert_eq!(anchors[&1], (100.0, 0.0));
	}

	#[test]
	fn empty_space_hits_nothing() {
		assert_eq!(state().node_at(200.0, 20.0), None);
	}
}
