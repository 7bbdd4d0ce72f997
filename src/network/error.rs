/// Result alias for the analysis pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Whole-pipeline failures. Per-row problems never surface here; bad rows are
/// dropped during extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The edge table holds no filled rows.
	#[error("load some data into the table before drawing a graph")]
	NoTableData,
	/// Rows were present but none of them produced an edge.
	#[error("no valid graph data: expected Source1, Source2, Weight rows")]
	NoGraphData,
	/// An analysis step was requested before any graph was drawn.
	#[error("draw a graph first")]
	NoGraph,
	/// CSV text could not be parsed.
	#[error("CSV parse error: {0}")]
	Csv(#[from] csv::Error),
	/// A snapshot or configuration document was not valid JSON for its schema.
	#[error("could not decode document: {0}")]
	Json(#[from] serde_json::Error),
	/// A snapshot decoded but its content is inconsistent.
	#[error("invalid snapshot: {0}")]
	InvalidSnapshot(String),
	/// Too few survey respondents with answers to relate anything.
	#[error("need at least {needed} survey responses with answers, found {found}")]
	NotEnoughResponses { needed: usize, found: usize },
	/// Survey answers were present but no pair of them is related.
	#[error("no relations: {0}")]
	NoRelations(&'static str),
	/// No built-in dataset has this id.
	#[error("unknown sample dataset '{0}'")]
	UnknownSample(String),
}
