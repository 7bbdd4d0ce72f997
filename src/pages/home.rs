use leptos::prelude::*;
use log::info;
use web_sys::MouseEvent;

use crate::components::centrality_panel::CentralityPanel;
use crate::components::community_panel::CommunityPanel;
use crate::components::edge_table::{DataLoader, EdgeTableEditor};
use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::components::run_action;
use crate::components::snapshot_panel::SnapshotPanel;
use crate::network::{EdgeTable, RowRange, Session};

/// Analysis workbench: edge table on the left, graph and metrics on the right.
#[component]
pub fn Home() -> impl IntoView {
	let session = RwSignal::new(Session::default());
	let table = RwSignal::new(EdgeTable::new());
	let selection = RwSignal::new(None::<RowRange>);
	let status = RwSignal::new(None::<String>);

	// Only layout and colouring reach the canvas, so computing centrality
	// does not restart the simulation.
	let graph_data = Memo::new(move |_| {
		session.with(|s| s.graph().map(GraphData::from_network).unwrap_or_default())
	});
	let force = session.with_untracked(|s| s.config().force.clone());

	let draw = move |_: MouseEvent| {
		let rows = table.with(EdgeTable::filled_rows);
		if let Some(nodes) = run_action(session, status, |s| s.draw(&rows).map(|g| g.node_count())) {
			info!("graph drawn with {nodes} nodes");
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="workbench">
				<aside class="data-pane">
					<h1>"Network Canvas"</h1>
					<DataLoader table=table status=status />
					<EdgeTableEditor table=table selection=selection />
					<button class="draw" on:click=draw>"Draw graph"</button>
					{move || status.get().map(|msg| view! { <p class="status">{msg}</p> })}
				</aside>
				<main class="graph-pane">
					<div class="graph-canvas">
						<ForceGraphCanvas data=graph_data params=force />
						<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
					</div>
					<CommunityPanel session=session status=status />
					<CentralityPanel session=session status=status />
					<SnapshotPanel session=session table=table status=status />
				</main>
			</div>
		</ErrorBoundary>
	}
}
