use leptos::prelude::*;
use web_sys::{Event, MouseEvent};

use super::run_action;
use crate::network::{Centrality, RankBy, Session};

#[component]
pub fn CentralityPanel(
	session: RwSignal<Session>,
	status: RwSignal<Option<String>>,
) -> impl IntoView {
	let rank_by = RwSignal::new(RankBy::Degree);

	let compute = move |_: MouseEvent| {
		let available = run_action(session, status, |s| {
			s.compute_centrality().map(Centrality::eigenvector_available)
		});
		if available == Some(false) {
			rank_by.set(RankBy::Degree);
		}
	};

	let choose = move |ev: Event| {
		rank_by.set(match event_target_value(&ev).as_str() {
			"eigenvector" => RankBy::Eigenvector,
			_ => RankBy::Degree,
		});
	};

	let eigen_available =
		move || session.with(|s| s.centrality().is_some_and(Centrality::eigenvector_available));

	let rows = move || {
		let ranking = session.with(|s| s.ranking(rank_by.get()).ok())?;
		Some(
			ranking
				.entries()
				.iter()
				.enumerate()
				.map(|(i, entry)| {
					let weight = if ranking.is_top(i) { "bold" } else { "normal" };
					view! {
						<tr style:font-weight=weight>
							<td>{i + 1}</td>
							<td>{entry.node.clone()}</td>
							<td>{format!("{:.3}", entry.degree)}</td>
							<td>{entry.eigenvector.to_string()}</td>
						</tr>
					}
				})
				.collect_view(),
		)
	};

	view! {
		<section class="centrality-panel">
			<h2>"Centrality"</h2>
			<div class="actions">
				<button on:click=compute>"Compute centrality"</button>
				<select on:change=choose prop:value=move || match rank_by.get() {
					RankBy::Degree => "degree",
					RankBy::Eigenvector => "eigenvector",
				}>
					<option value="degree">"Sort by degree centrality"</option>
					<Show when=eigen_available>
						<option value="eigenvector">"Sort by eigenvector centrality"</option>
					</Show>
				</select>
			</div>
			<table>
				<thead>
					<tr>
						<th>"Rank"</th>
						<th>"Node"</th>
						<th>"Degree"</th>
						<th>"Eigenvector"</th>
					</tr>
				</thead>
				<tbody>{rows}</tbody>
			</table>
		</section>
	}
}
