pub mod centrality_panel;
pub mod community_panel;
pub mod edge_table;
pub mod force_graph;
pub mod snapshot_panel;

use leptos::prelude::*;
use log::warn;

use crate::network::{Result, Session};

/// Run one step against the shared session. Errors land on the status line
/// and come back as `None`; success clears the status line.
pub fn run_action<T>(
	session: RwSignal<Session>,
	status: RwSignal<Option<String>>,
	action: impl FnOnce(&mut Session) -> Result<T>,
) -> Option<T> {
	match session.try_update(action)? {
		Ok(value) => {
			status.set(None);
			Some(value)
		}
		Err(e) => {
			warn!("{e}");
			status.set(Some(e.to_string()));
			None
		}
	}
}
