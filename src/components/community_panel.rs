use leptos::prelude::*;
use web_sys::MouseEvent;

use super::run_action;
use crate::network::{Partition, ResolutionStep, Session};

#[component]
pub fn CommunityPanel(
	session: RwSignal<Session>,
	status: RwSignal<Option<String>>,
) -> impl IntoView {
	let notice = RwSignal::new(None::<String>);

	let show_step = move |step: Option<ResolutionStep>| {
		if let Some(step) = step {
			notice.set(step.notice.map(|n| n.to_string()));
		}
	};

	let detect = move |_: MouseEvent| {
		notice.set(None);
		run_action(session, status, |s| s.detect_communities().map(Partition::len));
	};
	let single = move |_: MouseEvent| {
		notice.set(None);
		run_action(session, status, Session::clear_communities);
	};
	let increase =
		move |_: MouseEvent| show_step(run_action(session, status, Session::increase_resolution));
	let decrease =
		move |_: MouseEvent| show_step(run_action(session, status, Session::decrease_resolution));

	let communities = move || {
		session.with(|s| {
			s.partition().map(|partition| {
				partition
					.members()
					.iter()
					.map(|(&id, nodes)| {
						let color = partition.color_of(id).unwrap_or("#666").to_string();
						view! {
							<li>
								<span class="swatch" style:background-color=color></span>
								{format!("Community {} ({}): {}", id + 1, nodes.len(), nodes.join(", "))}
							</li>
						}
					})
					.collect_view()
			})
		})
	};

	view! {
		<section class="community-panel">
			<h2>"Communities"</h2>
			<div class="actions">
				<button on:click=detect>"Detect communities"</button>
				<button on:click=single>"Single community"</button>
			</div>
			<div class="resolution">
				<button on:click=decrease>"Fewer"</button>
				<span>{move || session.with(|s| format!("Resolution {:.1}", s.resolution()))}</span>
				<button on:click=increase>"More"</button>
			</div>
			{move || notice.get().map(|n| view! { <p class="notice">{n}</p> })}
			<ul class="community-list">{communities}</ul>
		</section>
	}
}
