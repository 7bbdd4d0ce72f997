//! Edge-list analysis: from a loosely typed table to a laid-out graph with
//! communities and centrality.
//!
//! ```text
//! rows -> columns -> records -> graph -> { community, centrality } -> layout
//! ```
//!
//! Everything here is synchronous and independent of the browser; the
//! components only read the results.

pub mod centrality;
pub mod columns;
pub mod community;
mod error;
pub mod graph;
pub mod layout;
pub mod records;
pub mod samples;
pub mod session;
pub mod snapshot;
pub mod survey;
pub mod table;

pub use centrality::{Centrality, CentralityEntry, Eigenvector, RankBy, Ranking};
pub use columns::{ColumnLayout, infer_columns};
pub use community::{Partition, Resolution, ResolutionNotice, ResolutionStep};
pub use error::{Error, Result};
pub use graph::{EdgeAttrs, NetworkGraph, NodeAttrs};
pub use records::{EdgeRecord, EdgeRecords, extract_records};
pub use session::Session;
pub use snapshot::{ReportFields, Snapshot, StoredSnapshot};
pub use table::{Cell, EdgeTable, Row, RowRange, parse_csv};
