//! Whole-result classification: graph-shaped or plain tabular.

use crate::normalize::GraphValue;
use crate::record::Record;

/// `true` when any field of any record is a node, relationship or path.
///
/// Decides whether the graph view is meaningful and which table layout the
/// projector uses.
pub fn is_graph_result(records: &[Record]) -> bool {
    records
        .iter()
        .flat_map(|record| record.values())
        .any(|value| GraphValue::from_value(value).is_graph())
}
