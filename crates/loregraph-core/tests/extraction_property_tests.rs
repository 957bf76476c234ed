use std::collections::HashSet;

use loregraph_core::record::Record;
use loregraph_core::{extract, extract_with, is_graph_result, project, EndpointResolution, ExtractOptions};
use proptest::prelude::*;
use serde_json::{json, Value};

const NAMES: [&str; 5] = ["Gwyn", "Nito", "Seath", "Manus", "Kalameet"];
const LABELS: [&str; 3] = ["Character", "Location", "Group"];
const REL_TYPES: [&str; 3] = ["ALSO_KNOWN_AS", "ENEMY_OF", "LOCATED_IN"];

fn raw_id() -> impl Strategy<Value = String> {
    // Ids overlap only partly with the node ids below, so some endpoints stay
    // unresolved.
    (0u8..8).prop_map(|i| format!("4:{i}"))
}

fn node_value() -> impl Strategy<Value = Value> {
    (raw_id(), 0..NAMES.len(), 0..LABELS.len(), any::<u8>()).prop_map(|(id, n, l, power)| {
        json!({"id": id, "labels": [LABELS[l]], "name": NAMES[n], "power": power})
    })
}

fn relationship_value() -> impl Strategy<Value = Value> {
    (raw_id(), raw_id(), 0..REL_TYPES.len(), any::<u8>())
        .prop_map(|(s, e, t, w)| json!({"type": REL_TYPES[t], "start": s, "end": e, "weight": w}))
}

fn path_value() -> impl Strategy<Value = Value> {
    (
        proptest::collection::vec(node_value(), 1..4),
        proptest::collection::vec(relationship_value(), 0..3),
    )
        .prop_map(|(nodes, relationships)| {
            json!({"path_type": "neo4j_path", "nodes": nodes, "relationships": relationships})
        })
}

fn primitive_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i32>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        Just(json!(["a", "b"])),
        Just(json!({"kind": "area"})),
    ]
}

fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => node_value(),
        3 => relationship_value(),
        1 => path_value(),
        2 => primitive_value(),
    ]
}

fn record_set(values: impl Strategy<Value = Value>) -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(proptest::collection::vec(values, 1..4), 0..8).prop_map(|rows| {
        rows.into_iter()
            .map(|fields| {
                fields
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (format!("f{i}"), v))
                    .collect::<Record>()
            })
            .collect()
    })
}

fn both_modes() -> [ExtractOptions; 2] {
    [
        ExtractOptions {
            endpoint_resolution: EndpointResolution::TwoPass,
        },
        ExtractOptions {
            endpoint_resolution: EndpointResolution::VisitOrder,
        },
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn at_most_one_node_per_name(records in record_set(field_value())) {
        for options in both_modes() {
            let g = extract_with(&records, &options);
            let mut seen = HashSet::new();
            for node in &g.nodes {
                prop_assert!(seen.insert(node.name.clone()), "duplicate node {}", node.name);
                prop_assert_eq!(&node.id, &node.name);
            }
        }
    }

    #[test]
    fn at_most_one_relationship_per_key(records in record_set(field_value())) {
        for options in both_modes() {
            let g = extract_with(&records, &options);
            let mut seen = HashSet::new();
            for rel in &g.relationships {
                let (s, t, ty) = rel.key();
                prop_assert!(seen.insert((s.to_string(), t.to_string(), ty.to_string())));
            }
        }
    }

    #[test]
    fn every_endpoint_has_a_node(records in record_set(field_value())) {
        for options in both_modes() {
            let g = extract_with(&records, &options);
            let ids: HashSet<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
            for rel in &g.relationships {
                prop_assert!(ids.contains(rel.source.as_str()));
                prop_assert!(ids.contains(rel.target.as_str()));
            }
        }
    }

    #[test]
    fn extraction_is_repeatable(records in record_set(field_value())) {
        prop_assert_eq!(extract(&records), extract(&records));
    }

    #[test]
    fn two_pass_resolves_every_known_id(records in record_set(field_value())) {
        // Any endpoint left as a raw id must belong to no node in the result.
        let g = extract(&records);
        let node_ids: HashSet<String> = records
            .iter()
            .flat_map(|r| r.values())
            .flat_map(|v| {
                let mut ids = Vec::new();
                if v.get("labels").is_some() {
                    ids.extend(v.get("id").and_then(Value::as_str).map(str::to_string));
                }
                if let Some(nodes) = v.get("nodes").and_then(Value::as_array) {
                    ids.extend(nodes.iter().filter_map(|n| n.get("id")?.as_str().map(str::to_string)));
                }
                ids
            })
            .collect();
        for rel in &g.relationships {
            prop_assert!(!node_ids.contains(&rel.source));
            prop_assert!(!node_ids.contains(&rel.target));
        }
    }

    #[test]
    fn primitive_results_never_classify_as_graphs(records in record_set(primitive_value())) {
        prop_assert!(!is_graph_result(&records));
        let g = extract(&records);
        prop_assert!(g.nodes.is_empty() && g.relationships.is_empty());
    }

    #[test]
    fn classification_matches_extraction_inputs(records in record_set(field_value())) {
        let has_graph_value = records.iter().flat_map(|r| r.values()).any(|v| {
            v.get("labels").is_some() || v.get("start").is_some() || v.get("path_type").is_some()
        });
        prop_assert_eq!(is_graph_result(&records), has_graph_value);
    }

    #[test]
    fn descriptions_obey_truncation_law(text in "[a-zA-Z ]{0,180}") {
        let record: Record = [(
            "c".to_string(),
            json!({"labels": ["Character"], "name": "Gwyn", "description": text.clone()}),
        )]
        .into_iter()
        .collect();
        let table = project(&[record], true).expect("table");
        let cell = table.cell(0, "C Description").and_then(Value::as_str).map(str::to_string);
        if text.is_empty() {
            prop_assert!(cell.is_none());
        } else if text.chars().count() > 100 {
            let expected = format!("{}...", &text[..100]);
            prop_assert_eq!(cell, Some(expected));
        } else {
            prop_assert_eq!(cell, Some(text));
        }
    }
}
