use crate::network::NetworkGraph;

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub color: String,
	pub size: f64,
	pub community: Option<usize>,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Snapshot of a laid-out graph for the canvas.
	pub fn from_network(graph: &NetworkGraph) -> Self {
		let nodes: Vec<GraphNode> = graph
			.nodes()
			.map(|node| GraphNode {
				id: node.label.clone(),
				label: node.label.clone(),
				color: node.color.clone(),
				size: node.size,
				community: node.community,
				x: node.x,
				y: node.y,
			})
			.collect();
		let links = graph
			.edges()
			.map(|(s, t, edge)| GraphLink {
				source: nodes[s].id.clone(),
				target: nodes[t].id.clone(),
				width: edge.size,
			})
			.collect();
		Self { nodes, links }
	}
}
