//! Survey tables turned into edge lists.
//!
//! A survey table has one respondent per row: a name in the first column
//! and a comma-separated list of answers in the second. Two networks can be
//! derived from it. The name network ties respondents whose answer sets
//! overlap, weighted by Jaccard similarity. The element network ties answers
//! that were given together, weighted by how many respondents gave both.
//!
//! Both produce [`EdgeRecord`]s, so the result goes through the same builder
//! as a hand-made edge list.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use super::error::{Error, Result};
use super::records::EdgeRecord;
use super::table::{Cell, Row};

/// Header written above generated edge rows.
pub const EDGE_HEADER: [&str; 3] = ["Source1", "Source2", "Weight"];

/// One respondent and the distinct answers they gave, in the order given.
#[derive(Clone, Debug, PartialEq)]
pub struct SurveyResponse {
	pub name: String,
	pub answers: IndexSet<String>,
}

/// Split a comma-separated answer list, trimming items and dropping blanks.
/// Repeated answers count once.
pub fn parse_answers(text: &str) -> IndexSet<String> {
	text.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_string)
		.collect()
}

/// Respondents of a survey table. Rows missing a name or an answer list are
/// skipped. A repeated name keeps its first position and its last answers.
pub fn responses(rows: &[Row]) -> Vec<SurveyResponse> {
	let mut by_name: IndexMap<String, IndexSet<String>> = IndexMap::new();
	for row in rows {
		let name = row.first().map(Cell::label).unwrap_or_default();
		let answers = row.get(1).map(Cell::label).unwrap_or_default();
		if name.is_empty() || answers.is_empty() {
			continue;
		}
		by_name.insert(name, parse_answers(&answers));
	}
	by_name
		.into_iter()
		.map(|(name, answers)| SurveyResponse { name, answers })
		.collect()
}

/// Size of the intersection over size of the union; 0 for two empty sets.
pub fn jaccard(a: &IndexSet<String>, b: &IndexSet<String>) -> f64 {
	let shared = a.intersection(b).count();
	let union = a.len() + b.len() - shared;
	if union == 0 {
		return 0.0;
	}
	shared as f64 / union as f64
}

/// Respondent network: an edge for every pair of respondents, in table
/// order, whose answers overlap at all.
pub fn name_network(rows: &[Row]) -> Result<Vec<EdgeRecord>> {
	let people = responses(rows);
	if people.len() < 2 {
		return Err(Error::NotEnoughResponses {
			needed: 2,
			found: people.len(),
		});
	}

	let mut records = Vec::new();
	for (i, a) in people.iter().enumerate() {
		for b in &people[i + 1..] {
			let similarity = jaccard(&a.answers, &b.answers);
			if similarity > 0.0 {
				records.push(EdgeRecord::new(&a.name, &b.name, similarity));
			}
		}
	}
	if records.is_empty() {
		return Err(Error::NoRelations("no two respondents share an answer"));
	}
	debug!("name network: {} respondents, {} ties", people.len(), records.len());
	Ok(records)
}

/// Answer network: an edge for every unordered pair of answers given by the
/// same respondent, weighted by the number of such respondents. The smaller
/// label is the source; pairs are listed in order of first appearance.
pub fn element_network(rows: &[Row]) -> Result<Vec<EdgeRecord>> {
	let people = responses(rows);
	if people.is_empty() {
		return Err(Error::NotEnoughResponses { needed: 1, found: 0 });
	}

	let mut counts: IndexMap<(&str, &str), usize> = IndexMap::new();
	for person in &people {
		let answers: Vec<&str> = person.answers.iter().map(String::as_str).collect();
		for (i, &a) in answers.iter().enumerate() {
			for &b in &answers[i + 1..] {
				let pair = if a < b { (a, b) } else { (b, a) };
				*counts.entry(pair).or_default() += 1;
			}
		}
	}
	if counts.is_empty() {
		return Err(Error::NoRelations("no answers were given together"));
	}
	debug!("element network: {} co-occurring pairs", counts.len());
	Ok(counts
		.into_iter()
		.map(|((a, b), count)| EdgeRecord::new(a, b, count as f64))
		.collect())
}

/// Table rows for generated records, under the standard edge header.
pub fn edge_rows(records: &[EdgeRecord]) -> Vec<Row> {
	let header: Row = EDGE_HEADER.iter().map(|h| Cell::text(*h)).collect();
	std::iter::once(header)
		.chain(records.iter().map(|r| {
			vec![
				Cell::text(r.source.as_str()),
				Cell::text(r.target.as_str()),
				Cell::Number(r.weight),
			]
		}))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::AnalysisConfig;
	use crate::network::graph::NetworkGraph;
	use crate::network::records::extract_records;

	fn survey(rows: &[(&str, &str)]) -> Vec<Row> {
		rows.iter()
			.map(|(name, answers)| vec![Cell::text(*name), Cell::text(*answers)])
			.collect()
	}

	fn set(items: &[&str]) -> IndexSet<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	fn triples(records: &[EdgeRecord]) -> Vec<(&str, &str, f64)> {
		records
			.iter()
			.map(|r| (r.source.as_str(), r.target.as_str(), r.weight))
			.collect()
	}

	#[test]
	fn answers_are_trimmed_and_blanks_dropped() {
		assert_eq!(parse_answers(" soccer , ,music,, soccer"), set(&["soccer", "music"]));
		assert!(parse_answers(" , ").is_empty());
	}

	#[test]
	fn jaccard_values() {
		assert_eq!(jaccard(&set(&["a", "b", "c"]), &set(&["b", "c", "d"])), 0.5);
		assert_eq!(jaccard(&set(&["a"]), &set(&["a"])), 1.0);
		assert_eq!(jaccard(&set(&["a"]), &set(&["b"])), 0.0);
		assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
	}

	#[test]
	fn rows_without_name_or_answers_are_skipped() {
		let mut rows = survey(&[("Mina", "art"), ("", "music"), ("Joon", "  ")]);
		rows.push(vec![Cell::text("Hana")]);
		let names: Vec<String> = responses(&rows).into_iter().map(|r| r.name).collect();
		assert_eq!(names, vec!["Mina"]);
	}

	#[test]
	fn repeated_name_keeps_position_and_last_answers() {
		let people = responses(&survey(&[("Mina", "art"), ("Joon", "art"), ("Mina", "music")]));
		assert_eq!(people[0].name, "Mina");
		assert_eq!(people[0].answers, set(&["music"]));
		assert_eq!(people.len(), 2);
	}

	#[test]
	fn name_network_links_overlapping_pairs_in_table_order() {
		let rows = survey(&[
			("Mina", "soccer, music, art"),
			("Joon", "music, art, games"),
			("Hana", "cooking"),
			("Seo", "art"),
		]);
		let records = name_network(&rows).unwrap();
		assert_eq!(
			triples(&records),
			vec![("Mina", "Joon", 0.5), ("Mina", "Seo", 1.0 / 3.0), ("Joon", "Seo", 1.0 / 3.0)]
		);
	}

	#[test]
	fn name_network_needs_two_respondents_and_an_overlap() {
		assert!(matches!(
			name_network(&survey(&[("Mina", "art")])),
			Err(Error::NotEnoughResponses { needed: 2, found: 1 })
		));
		assert!(matches!(
			name_network(&survey(&[("Mina", "art"), ("Joon", "music")])),
			Err(Error::NoRelations(_))
		));
	}

	#[test]
	fn element_network_counts_pairs_with_smaller_label_first() {
		let rows = survey(&[
			("Mina", "soccer, music"),
			("Joon", "music, soccer, art"),
			("Hana", "art"),
		]);
		let records = element_network(&rows).unwrap();
		assert_eq!(
			triples(&records),
			vec![("music", "soccer", 2.0), ("art", "music", 1.0), ("art", "soccer", 1.0)]
		);
	}

	#[test]
	fn element_network_without_pairs_is_an_error() {
		assert!(matches!(element_network(&[]), Err(Error::NotEnoughResponses { found: 0, .. })));
		assert!(matches!(
			element_network(&survey(&[("Mina", "art"), ("Joon", "music")])),
			Err(Error::NoRelations(_))
		));
	}

	#[test]
	fn generated_rows_feed_the_graph_builder() {
		let rows = survey(&[("Mina", "soccer, music"), ("Joon", "music"), ("Hana", "soccer")]);
		let table = edge_rows(&name_network(&rows).unwrap());
		assert_eq!(table.len(), 3);

		let records: Vec<EdgeRecord> = extract_records(&table).collect();
		assert_eq!(triples(&records), vec![("Mina", "Joon", 0.5), ("Mina", "Hana", 0.5)]);
		let graph = NetworkGraph::build(records, &AnalysisConfig::default()).unwrap();
		assert_eq!(graph.node("Mina").unwrap().degree, 2);
	}
}
