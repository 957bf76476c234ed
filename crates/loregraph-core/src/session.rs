//! One user's exploration session: the query box, what has been run, and the
//! views built from the latest result.
//!
//! The database sits behind [`QueryRunner`]; a session never talks to a
//! driver directly.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::canvas::CanvasGraph;
use crate::classify::is_graph_result;
use crate::config::ExplorerConfig;
use crate::error::{ExploreError, Result};
use crate::extract::{extract_with, ExtractOptions, Extraction};
use crate::project::{fallback_listing, project_with, ProjectOptions, Table};
use crate::queries::{quick_action, QuickAction};
use crate::record::Record;
use crate::stats::GraphStats;

pub type Params = serde_json::Map<String, Value>;

/// Executes a query and hands back fully materialized records, with graph
/// values already in record shape (see [`crate::wire`]).
pub trait QueryRunner {
    fn run_query(&self, query: &str, params: Option<&Params>) -> Result<Vec<Record>>;
}

impl<F> QueryRunner for F
where
    F: Fn(&str, Option<&Params>) -> Result<Vec<Record>>,
{
    fn run_query(&self, query: &str, params: Option<&Params>) -> Result<Vec<Record>> {
        self(query, params)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableView {
    Table(Table),
    /// The table couldn't be built; `lines` enumerates a prefix of the records.
    Fallback { message: String, lines: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphView {
    /// Nothing in the result can be drawn.
    Empty,
    Ready {
        extraction: Extraction,
        stats: GraphStats,
        canvas: CanvasGraph,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    /// The query returned no records.
    Empty,
    Populated {
        record_count: usize,
        graph_like: bool,
        table: TableView,
        graph: GraphView,
        /// The records verbatim, for the raw JSON view.
        raw: Value,
    },
}

impl ResultView {
    pub fn build(records: &[Record], config: &ExplorerConfig) -> Self {
        if records.is_empty() {
            return Self::Empty;
        }
        let graph_like = is_graph_result(records);

        let table = match project_with(records, graph_like, &ProjectOptions::default()) {
            Ok(table) => TableView::Table(table),
            Err(err) => {
                warn!(error = %err, "falling back to record listing");
                TableView::Fallback {
                    message: err.to_string(),
                    lines: fallback_listing(records, config.fallback_limit),
                }
            }
        };

        let extraction = extract_with(records, &ExtractOptions::from(config));
        let graph = if extraction.is_empty() {
            GraphView::Empty
        } else {
            GraphView::Ready {
                stats: GraphStats::from_extraction(&extraction),
                canvas: CanvasGraph::from_extraction(&extraction),
                extraction,
            }
        };

        Self::Populated {
            record_count: records.len(),
            graph_like,
            table,
            graph,
            raw: Value::Array(records.iter().cloned().map(Value::Object).collect()),
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Populated { record_count, .. } => *record_count,
        }
    }

    pub fn is_graph_like(&self) -> bool {
        matches!(self, Self::Populated { graph_like: true, .. })
    }
}

/// Result of running one of the predefined [`QuickAction`]s.
#[derive(Debug, Clone)]
pub struct QuickActionOutcome {
    pub action: &'static QuickAction,
    pub view: ResultView,
    /// The action expects a network and the result can be drawn.
    pub network_ready: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: ExplorerConfig,
    query_text: String,
    query_history: Vec<String>,
    current_results: Option<Vec<Record>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl Session {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            query_text: config.default_query.clone(),
            config,
            query_history: Vec::new(),
            current_results: None,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    pub fn clear_query(&mut self) {
        self.query_text.clear();
    }

    /// Distinct queries in the order they were first run.
    pub fn history(&self) -> &[String] {
        &self.query_history
    }

    pub fn current_results(&self) -> Option<&[Record]> {
        self.current_results.as_deref()
    }

    /// Rebuild the view of the most recent result (for re-display).
    pub fn current_view(&self) -> Option<ResultView> {
        self.current_results
            .as_deref()
            .map(|records| ResultView::build(records, &self.config))
    }

    /// Run the current query text.
    pub fn execute_current(&mut self, runner: &dyn QueryRunner) -> Result<ResultView> {
        let query = self.query_text.clone();
        self.execute(runner, &query)
    }

    /// Run `query`. On failure the previous result is kept and the error is
    /// returned for display.
    pub fn execute(&mut self, runner: &dyn QueryRunner, query: &str) -> Result<ResultView> {
        if query.trim().is_empty() {
            return Err(ExploreError::query("query is empty"));
        }
        self.query_text = query.to_string();

        let records = runner.run_query(query, None).map_err(|err| {
            warn!(error = %err, "query failed");
            err
        })?;
        info!(records = records.len(), "query executed");

        if !self.query_history.iter().any(|q| q == query) {
            self.query_history.push(query.to_string());
        }
        let view = ResultView::build(&records, &self.config);
        self.current_results = Some(records);
        Ok(view)
    }

    pub fn execute_quick_action(
        &mut self,
        runner: &dyn QueryRunner,
        key: &str,
    ) -> Result<QuickActionOutcome> {
        let action =
            quick_action(key).ok_or_else(|| ExploreError::UnknownQuickAction(key.to_string()))?;
        let view = self.execute(runner, action.query)?;
        let network_ready = action.show_network_message && view.is_graph_like();
        Ok(QuickActionOutcome {
            action,
            view,
            network_ready,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::records_from_value;
    use serde_json::json;

    fn gwyn_runner(_query: &str, _params: Option<&Params>) -> Result<Vec<Record>> {
        records_from_value(json!([
            {"alias": {"id": "4:2", "labels": ["Character"], "name": "Lord of Sunlight"}},
            {"alias": {"id": "4:3", "labels": ["Character"], "name": "Gravelord"}},
        ]))
    }

    fn failing_runner(_query: &str, _params: Option<&Params>) -> Result<Vec<Record>> {
        Err(ExploreError::query("Invalid input 'RETRN'"))
    }

    fn empty_runner(_query: &str, _params: Option<&Params>) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    #[test]
    fn fresh_session_uses_default_query() {
        let session = Session::default();
        assert_eq!(session.query_text(), "MATCH (n) RETURN n LIMIT 10");
        assert!(session.history().is_empty());
        assert!(session.current_view().is_none());
    }

    #[test]
    fn execute_records_history_once() {
        let mut session = Session::default();
        let view = session.execute(&gwyn_runner, "MATCH (a) RETURN a").unwrap();
        session.execute(&gwyn_runner, "MATCH (a) RETURN a").unwrap();
        session.execute(&gwyn_runner, "MATCH (b) RETURN b").unwrap();
        assert_eq!(session.history(), ["MATCH (a) RETURN a", "MATCH (b) RETURN b"]);
        assert_eq!(view.record_count(), 2);
        assert!(view.is_graph_like());
        let ResultView::Populated { graph: GraphView::Ready { stats, .. }, .. } = view else {
            panic!("expected a drawable graph");
        };
        assert_eq!(stats.nodes, 2);
    }

    #[test]
    fn failures_keep_previous_results() {
        let mut session = Session::default();
        session.execute(&gwyn_runner, "MATCH (a) RETURN a").unwrap();
        let err = session.execute(&failing_runner, "RETRN x").unwrap_err();
        assert!(err.to_string().contains("RETRN"));
        assert_eq!(session.current_results().map(|r| r.len()), Some(2));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn empty_results_are_a_state() {
        let mut session = Session::default();
        let view = session.execute(&empty_runner, "MATCH (n:Nothing) RETURN n").unwrap();
        assert_eq!(view, ResultView::Empty);
        assert!(session.execute(&empty_runner, "   ").is_err());
    }

    #[test]
    fn quick_action_flags_network_results() {
        let mut session = Session::default();
        let outcome = session.execute_quick_action(&gwyn_runner, "sample_network").unwrap();
        assert!(outcome.network_ready);
        assert_eq!(session.query_text(), outcome.action.query);

        let outcome = session.execute_quick_action(&gwyn_runner, "gwyn_aliases").unwrap();
        assert!(!outcome.network_ready);
        assert!(matches!(
            session.execute_quick_action(&gwyn_runner, "bogus"),
            Err(ExploreError::UnknownQuickAction(_))
        ));
    }

    #[test]
    fn projection_failure_falls_back_to_listing() {
        let runner = |_: &str, _: Option<&Params>| {
            records_from_value(json!([{
                "c": {"labels": ["Character"], "name": "Gwyn"},
                "c name": "clash",
            }]))
        };
        let mut session = Session::default();
        let view = session.execute(&runner, "MATCH (c) RETURN c").unwrap();
        let ResultView::Populated { table: TableView::Fallback { message, lines }, .. } = view else {
            panic!("expected fallback");
        };
        assert!(message.contains("projection failed"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Record 1: "));
    }

    #[test]
    fn clear_and_rerun_current() {
        let mut session = Session::default();
        session.clear_query();
        assert!(session.execute_current(&gwyn_runner).is_err());
        session.set_query_text("MATCH (a) RETURN a");
        assert!(session.execute_current(&gwyn_runner).is_ok());
        assert_eq!(session.current_view().map(|v| v.record_count()), Some(2));
    }
}
