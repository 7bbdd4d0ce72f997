//! Report fields plus export and import of the analysis as a stored
//! JSON document.

use leptos::prelude::*;
use log::info;
use web_sys::MouseEvent;

use super::run_action;
use crate::network::{EdgeTable, ReportFields, Session, Snapshot};

type Field = fn(&mut ReportFields) -> &mut String;

fn report_field(
	report: RwSignal<ReportFields>,
	label: &'static str,
	field: Field,
	multiline: bool,
) -> impl IntoView {
	let value = move || report.with(|r| field(&mut r.clone()).clone());
	let write = move |text: String| report.update(|r| *field(r) = text);
	let control = if multiline {
		view! {
			<textarea
				prop:value=value
				on:input=move |ev| write(event_target_value(&ev))
			></textarea>
		}
		.into_any()
	} else {
		view! {
			<input
				type="text"
				prop:value=value
				on:input=move |ev| write(event_target_value(&ev))
			/>
		}
		.into_any()
	};
	view! { <label>{label} {control}</label> }
}

#[component]
pub fn SnapshotPanel(
	session: RwSignal<Session>,
	table: RwSignal<EdgeTable>,
	status: RwSignal<Option<String>>,
) -> impl IntoView {
	let report = RwSignal::new(ReportFields::default());
	let document = RwSignal::new(String::new());

	let export = move |_: MouseEvent| {
		let rows = table.with(EdgeTable::filled_rows);
		let snapshot = session.with(|s| s.snapshot(&rows, report.get()));
		match snapshot.to_json() {
			Ok(json) => {
				document.set(json);
				status.set(None);
			}
			Err(e) => status.set(Some(e.to_string())),
		}
	};

	let import = move |_: MouseEvent| {
		let snapshot = match document.with(|text| Snapshot::from_json(text)) {
			Ok(snapshot) => snapshot,
			Err(e) => {
				status.set(Some(e.to_string()));
				return;
			}
		};
		table.set(EdgeTable::load(snapshot.rows.clone()));
		report.set(snapshot.report.clone());
		if run_action(session, status, |s| s.restore(&snapshot)).is_some() {
			info!("imported analysis '{}'", snapshot.report.report_title);
		}
	};

	view! {
		<section class="snapshot-panel">
			<h2>"Report"</h2>
			{report_field(report, "Title", |r| &mut r.report_title, false)}
			{report_field(report, "Author", |r| &mut r.author, false)}
			{report_field(report, "Content", |r| &mut r.content, true)}
			{report_field(report, "Conclusion", |r| &mut r.conclusion, true)}
			{report_field(report, "Limitations", |r| &mut r.limitations, true)}
			{report_field(report, "Questions", |r| &mut r.questions, true)}
			{report_field(report, "Data title", |r| &mut r.data_title, false)}
			{report_field(report, "Data description", |r| &mut r.data_description, true)}
			{report_field(report, "Data date", |r| &mut r.data_date, false)}
			<div class="actions">
				<button on:click=export>"Export"</button>
				<button on:click=import>"Import"</button>
			</div>
			<textarea
				class="snapshot-document"
				prop:value=move || document.get()
				on:input=move |ev| document.set(event_target_value(&ev))
			></textarea>
		</section>
	}
}
