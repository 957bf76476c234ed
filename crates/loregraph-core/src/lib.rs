//! Loregraph core: turning graph query results into something you can look at.
//!
//! A query against a knowledge-graph database returns records: mappings from a
//! field name to either a primitive or a node/relationship/path. The same graph
//! element often appears many times across records (every row of
//! `MATCH (a)-[r]-(b) RETURN a, r, b` repeats `a`). This crate turns such result
//! sets into:
//!
//! - a deduplicated node/edge set for a network canvas ([`extract`]),
//! - a flat table for a grid view ([`project`]),
//! - and a yes/no answer to "is this worth drawing as a graph?" ([`classify`]).
//!
//! ```text
//!   records ──► classify ──┬──► extract ──► canvas / stats
//!                          └──► project ──► table (or fallback listing)
//! ```
//!
//! The database itself stays outside: callers plug in a [`session::QueryRunner`]
//! and native driver objects are serialized once at the boundary ([`wire`]).

pub mod canvas;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod project;
pub mod queries;
pub mod record;
pub mod session;
pub mod stats;
pub mod wire;

pub use classify::is_graph_result;
pub use config::{EndpointResolution, ExplorerConfig};
pub use error::{ExploreError, Result};
pub use extract::{extract, extract_with, ExtractOptions, Extraction, GraphNode, GraphRelationship};
pub use normalize::GraphValue;
pub use project::{fallback_listing, project, Table};
pub use record::Record;
pub use session::{QueryRunner, ResultView, Session};
