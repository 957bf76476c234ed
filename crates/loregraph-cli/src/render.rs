//! Plain-text rendering of result views for the terminal.

use serde_json::Value;

use loregraph_core::stats::GraphStats;
use loregraph_core::Table;

/// Cell text as shown in the terminal; missing cells are blank.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header.
pub fn render_table(table: &Table) -> String {
    let text: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &text {
        for (i, cell) in row.iter().enumerate() {
            // Multi-line cells are flattened before measuring.
            let len = flatten(cell).chars().count();
            if len > widths[i] {
                widths[i] = len;
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, table.columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &text {
        let flat: Vec<String> = row.iter().map(|c| flatten(c)).collect();
        push_line(&mut out, flat.iter().map(String::as_str), &widths);
    }
    out
}

fn flatten(cell: &str) -> String {
    cell.replace('\n', " ")
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_stats(stats: &GraphStats) -> String {
    let mut out = format!(
        "nodes: {}\nrelationships: {}\nnode types: {}\n",
        stats.nodes,
        stats.relationships,
        stats.distinct_types()
    );
    for (ty, count) in &stats.node_types {
        out.push_str(&format!("  {ty}: {count}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn columns_align_on_widest_cell() {
        let table = Table {
            columns: vec!["C Name".to_string(), "Score".to_string()],
            rows: vec![
                vec![json!("Gwyn"), json!(7)],
                vec![json!("Kalameet"), Value::Null],
            ],
        };
        assert_eq!(
            render_table(&table),
            "C Name    Score\n--------  -----\nGwyn      7\nKalameet\n"
        );
    }

    #[test]
    fn stats_list_types_in_order() {
        let stats = GraphStats {
            nodes: 3,
            relationships: 1,
            node_types: vec![("Character".to_string(), 2), ("Location".to_string(), 1)],
        };
        let text = render_stats(&stats);
        assert!(text.starts_with("nodes: 3\nrelationships: 1\nnode types: 2\n"));
        assert!(text.ends_with("  Character: 2\n  Location: 1\n"));
    }
}
