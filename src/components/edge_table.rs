//! Editable edge list plus the ways of filling it: pasted CSV, the bundled
//! samples, and edge lists generated from a survey table.

use leptos::prelude::*;
use log::info;
use web_sys::{Event, MouseEvent};

use crate::network::samples::{load_sample, samples};
use crate::network::survey::{self, edge_rows};
use crate::network::{EdgeRecord, EdgeTable, Result, Row, RowRange, parse_csv};

type Generator = fn(&[Row]) -> Result<Vec<EdgeRecord>>;

#[component]
pub fn EdgeTableEditor(
	table: RwSignal<EdgeTable>,
	selection: RwSignal<Option<RowRange>>,
) -> impl IntoView {
	// shift-click extends the selection from its first row
	let select_row = move |row: usize, extend: bool| {
		selection.update(|sel| {
			*sel = match (*sel, extend) {
				(Some(range), true) => Some(RowRange {
					start: range.start,
					end: row,
				}),
				_ => Some(RowRange::single(row)),
			};
		});
	};

	let rows_view = move || {
		table.with(|t| {
			t.rows()
				.iter()
				.enumerate()
				.map(|(i, row)| {
					let cells = (0..EdgeTable::COLUMNS)
						.map(|c| {
							let value = row.get(c).map(ToString::to_string).unwrap_or_default();
							view! {
								<td>
									<input
										type="text"
										prop:value=value
										on:change=move |ev| {
											let value = event_target_value(&ev);
											table.update(|t| t.set_cell(i, c, &value));
										}
									/>
								</td>
							}
						})
						.collect_view();
					view! {
						<tr class:selected=move || selection.get().is_some_and(|s| s.contains(i))>
							<th on:click=move |ev: MouseEvent| select_row(i, ev.shift_key())>
								{i + 1}
							</th>
							{cells}
						</tr>
					}
				})
				.collect_view()
		})
	};

	view! {
		<section class="edge-table">
			<table>
				<thead>
					<tr>
						<th></th>
						<th>"Source1"</th>
						<th>"Source2"</th>
						<th>"Weight"</th>
					</tr>
				</thead>
				<tbody>{rows_view}</tbody>
			</table>
			<div class="table-actions">
				<button on:click=move |_| table.update(EdgeTable::push_empty_row)>"Add row"</button>
				<button on:click=move |_| {
					let removed = table.try_update(|t| t.delete_rows(selection.get_untracked()));
					selection.set(None);
					info!("removed {} rows", removed.unwrap_or(0));
				}>"Delete rows"</button>
				<button on:click=move |_| {
					table.update(EdgeTable::clear);
					selection.set(None);
				}>"Clear"</button>
				<span class="row-count">
					{move || format!("{} rows with data", table.with(EdgeTable::filled_count))}
				</span>
			</div>
		</section>
	}
}

#[component]
pub fn DataLoader(
	table: RwSignal<EdgeTable>,
	status: RwSignal<Option<String>>,
) -> impl IntoView {
	let csv_text = RwSignal::new(String::new());
	let description = RwSignal::new(None::<&'static str>);

	let load_csv = move |_: MouseEvent| match csv_text.with(|text| parse_csv(text)) {
		Ok(rows) => {
			table.set(EdgeTable::load(rows));
			status.set(None);
		}
		Err(e) => status.set(Some(e.to_string())),
	};

	let load_sample_by_id = move |ev: Event| {
		let id = event_target_value(&ev);
		if id.is_empty() {
			return;
		}
		match load_sample(&id) {
			Ok(rows) => {
				table.set(EdgeTable::load(rows));
				description.set(samples().iter().find(|s| s.id == id).map(|s| s.description));
				status.set(None);
			}
			Err(e) => status.set(Some(e.to_string())),
		}
	};

	// the table holds names and answer lists; replace it with the edges
	let generate = move |generator: Generator| {
		move |_: MouseEvent| match table.with(|t| generator(&t.filled_rows())) {
			Ok(records) => {
				info!("generated {} relations from the survey table", records.len());
				status.set(Some(format!("{} relations generated", records.len())));
				table.set(EdgeTable::load(edge_rows(&records)));
			}
			Err(e) => status.set(Some(e.to_string())),
		}
	};

	let options = samples()
		.iter()
		.map(|s| view! { <option value=s.id>{s.name}</option> })
		.collect_view();

	view! {
		<section class="data-loader">
			<select on:change=load_sample_by_id>
				<option value="">"Choose a sample dataset"</option>
				{options}
			</select>
			{move || description.get().map(|d| view! { <p class="sample-description">{d}</p> })}
			<textarea
				placeholder="Paste CSV: Source1,Source2,Weight"
				prop:value=move || csv_text.get()
				on:input=move |ev| csv_text.set(event_target_value(&ev))
			></textarea>
			<button on:click=load_csv>"Load CSV"</button>
			<div class="survey-tools" title="Rows of name, comma-separated answers">
				<button on:click={generate(survey::name_network)}>"Name network"</button>
				<button on:click={generate(survey::element_network)}>"Element network"</button>
			</div>
		</section>
	}
}
