//! Tabular projection of a result set.
//!
//! Two layouts:
//!
//! - **graph-aware** (the result holds graph values): each node, relationship
//!   or path field expands into a handful of summary columns (`c_name`,
//!   `c_type`, `r_relationship`, `p_nodes_count`, ...) and headers are
//!   humanized (`c_name` → `C Name`);
//! - **generic**: one column per field, nested values stringified.
//!
//! Columns appear in first-seen order across all rows; cells a row doesn't
//! have are `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ExploreError, Result};
use crate::normalize::{GraphValue, NodeView, PathView, RelationshipView};
use crate::record::{display_string, is_truthy, truncate_text, Record, TEXT_LIMIT};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    /// Row-major cells aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Relationship properties summarized per cell.
    pub max_properties: usize,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self { max_properties: 3 }
    }
}

pub fn project(records: &[Record], is_graph_like: bool) -> Result<Table> {
    project_with(records, is_graph_like, &ProjectOptions::default())
}

pub fn project_with(
    records: &[Record],
    is_graph_like: bool,
    options: &ProjectOptions,
) -> Result<Table> {
    let rows: Vec<RowCells> = records
        .iter()
        .map(|record| {
            if is_graph_like {
                graph_row(record, options)
            } else {
                generic_row(record)
            }
        })
        .collect();
    let table = assemble(rows, is_graph_like)?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        graph_like = is_graph_like,
        "projected table"
    );
    Ok(table)
}

/// Plain enumerated rendering used when a table can't be built.
pub fn fallback_listing(records: &[Record], limit: usize) -> Vec<String> {
    records
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, record)| format!("Record {}: {}", i + 1, Value::Object(record.clone())))
        .collect()
}

/// `c_start_node` → `C Start Node`.
pub fn humanize_column(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_cased = false;
    for c in raw.replace('_', " ").chars() {
        // Only cased letters continue a word; digits, punctuation and
        // uncased scripts (CJK, ...) start a new one.
        if c.is_lowercase() || c.is_uppercase() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}

/// One row's cells in insertion order; setting a key again overwrites it in
/// place.
#[derive(Default)]
struct RowCells {
    cells: Vec<(String, Value)>,
}

impl RowCells {
    fn set(&mut self, key: String, value: impl Into<Value>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((key, value)),
        }
    }
}

fn generic_row(record: &Record) -> RowCells {
    let mut row = RowCells::default();
    for (key, value) in record {
        let cell = match value {
            Value::Array(_) | Value::Object(_) => Value::String(display_string(value)),
            Value::Null => Value::String(String::new()),
            other => other.clone(),
        };
        row.set(key.clone(), cell);
    }
    row
}

fn graph_row(record: &Record, options: &ProjectOptions) -> RowCells {
    let mut row = RowCells::default();
    for (key, value) in record {
        match GraphValue::from_value(value) {
            GraphValue::Node(node) => node_cells(&mut row, key, node),
            GraphValue::Relationship(rel) => relationship_cells(&mut row, key, rel, options),
            GraphValue::Path(path) => path_cells(&mut row, key, path),
            GraphValue::Other(Value::Object(_)) => {
                row.set(key.clone(), truncate_text(&display_string(value), TEXT_LIMIT));
            }
            GraphValue::Other(Value::Null) => row.set(key.clone(), ""),
            GraphValue::Other(other) => row.set(key.clone(), other.clone()),
        }
    }
    row
}

fn node_cells(row: &mut RowCells, key: &str, node: NodeView<'_>) {
    row.set(
        format!("{key}_name"),
        node.explicit_name().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    row.set(format!("{key}_type"), node.joined_labels());
    row.set(
        format!("{key}_id"),
        node.raw_id().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    if let Some(desc) = node.get("description").filter(|v| is_truthy(v)) {
        row.set(
            format!("{key}_description"),
            truncate_text(&display_string(desc), TEXT_LIMIT),
        );
    }
}

fn relationship_cells(
    row: &mut RowCells,
    key: &str,
    rel: RelationshipView<'_>,
    options: &ProjectOptions,
) {
    row.set(format!("{key}_relationship"), rel.rel_type());
    row.set(
        format!("{key}_id"),
        rel.raw_id().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    let pairs: Vec<String> = rel
        .custom_properties()
        .take(options.max_properties)
        .map(|(k, v)| format!("{k}: {}", display_string(v)))
        .collect();
    if !pairs.is_empty() {
        row.set(format!("{key}_properties"), pairs.join(", "));
    }
}

fn path_cells(row: &mut RowCells, key: &str, path: PathView<'_>) {
    row.set(format!("{key}_path_summary"), path.summary());
    row.set(format!("{key}_path_length"), path.length());
    row.set(format!("{key}_nodes_count"), path.node_count());
    row.set(format!("{key}_relationships_count"), path.relationship_count());

    let names: Vec<String> = path
        .nodes()
        .map(|n| n.explicit_name().unwrap_or_else(|| "Unknown".to_string()))
        .collect();
    if let Some(first) = names.first() {
        row.set(format!("{key}_start_node"), first.clone());
    }
    if path.node_count() > 1 {
        if let Some(last) = names.last() {
            row.set(format!("{key}_end_node"), last.clone());
        }
    }
}

fn assemble(rows: Vec<RowCells>, humanize: bool) -> Result<Table> {
    let mut raw_columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in &rows {
        for (key, _) in &row.cells {
            if !index.contains_key(key) {
                index.insert(key.clone(), raw_columns.len());
                raw_columns.push(key.clone());
            }
        }
    }

    let columns = if humanize {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut out = Vec::with_capacity(raw_columns.len());
        for raw in &raw_columns {
            let header = humanize_column(raw);
            if let Some(previous) = seen.insert(header.clone(), raw) {
                return Err(ExploreError::Projection(format!(
                    "columns `{previous}` and `{raw}` both display as `{header}`"
                )));
            }
            out.push(header);
        }
        out
    } else {
        raw_columns
    };

    let width = columns.len();
    let rows = rows
        .into_iter()
        .map(|row| {
            let mut cells = vec![Value::Null; width];
            for (key, value) in row.cells {
                cells[index[&key]] = value;
            }
            cells
        })
        .collect();

    Ok(Table { columns, rows })
}
