//! Predefined exploration queries offered as one-click actions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub key: &'static str,
    pub button_text: &'static str,
    pub query: &'static str,
    /// The result is a network worth opening the graph view for.
    pub show_network_message: bool,
}

const QUICK_ACTIONS: [QuickAction; 5] = [
    QuickAction {
        key: "sample_network",
        button_text: "Sample Network View",
        query: "MATCH (n)\n\
                WITH n, COUNT { (n)--() } AS connections\n\
                WHERE connections > 0\n\
                ORDER BY connections DESC\n\
                LIMIT 50\n\
                MATCH (n)-[r]-(connected)\n\
                RETURN n, r, connected",
        show_network_message: true,
    },
    QuickAction {
        key: "four_knights",
        button_text: "Four Knights Members",
        query: "MATCH (knight)-[:MEMBER_OF|LEADER_OF]->({name: \"Four Knights\"})\n\
                MATCH p = (knight)-[r]-(connected)\n\
                RETURN p",
        show_network_message: true,
    },
    QuickAction {
        key: "manus_location",
        button_text: "Where is Manus?",
        query: "MATCH (manus {name: \"Manus\"})-[:ALSO_KNOWN_AS*]-(alias)-[:LOCATED_IN*]->(location)\n\
                RETURN DISTINCT location.name AS LocationName",
        show_network_message: false,
    },
    QuickAction {
        key: "sealers_enemies",
        button_text: "Sealers' Enemies",
        query: "MATCH (sealers)-[:ENEMY_OF]->(enemy)\n\
                WHERE toLower(sealers.name) CONTAINS \"sealers\"\n\
                RETURN enemy",
        show_network_message: false,
    },
    QuickAction {
        key: "gwyn_aliases",
        button_text: "Gwyn's Aliases",
        query: "MATCH ({name: \"Gwyn\"})-[:ALSO_KNOWN_AS]->(alias)\n\
                RETURN alias",
        show_network_message: false,
    },
];

pub fn quick_actions() -> &'static [QuickAction] {
    &QUICK_ACTIONS
}

pub fn quick_action(key: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|a| a.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_resolvable() {
        let mut keys: Vec<_> = quick_actions().iter().map(|a| a.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), quick_actions().len());
        assert!(quick_action("gwyn_aliases").is_some());
        assert!(quick_action("nope").is_none());
    }

    #[test]
    fn line_continuations_keep_newlines() {
        let action = quick_action("four_knights").unwrap();
        let lines: Vec<_> = action.query.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "RETURN p");
        assert!(action.show_network_message);
    }
}
