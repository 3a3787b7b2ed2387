use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::io::store::ListSummary;
use crate::model::key::ListKey;
use crate::model::list::{List, Node, Nodes};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ListSummaryJson {
    pub key: String,
    pub name: String,
    pub colour: String,
    pub item_count: usize,
}

#[derive(Serialize)]
pub struct ListJson {
    pub key: String,
    pub name: String,
    pub colour: String,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_item_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_item_line: Option<usize>,
    pub items: Vec<NodeJson>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeJson {
    Item {
        name: String,
        line: usize,
        path: String,
    },
    Sublist {
        name: String,
        line: usize,
        colour: String,
        item_count: usize,
        children: Vec<NodeJson>,
    },
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn summary_to_json(summary: &ListSummary) -> ListSummaryJson {
    ListSummaryJson {
        key: summary.key.to_string(),
        name: summary.name.clone(),
        colour: summary.colour.clone(),
        item_count: summary.item_count,
    }
}

pub fn list_to_json(key: &ListKey, list: &List) -> ListJson {
    ListJson {
        key: key.to_string(),
        name: list.name.clone(),
        colour: list.colour.clone(),
        item_count: list.item_count(),
        first_item_line: list.item_span.map(|s| s.first),
        last_item_line: list.item_span.map(|s| s.last),
        items: nodes_to_json(&list.items),
    }
}

fn nodes_to_json(nodes: &Nodes) -> Vec<NodeJson> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Item { name, line, path } => NodeJson::Item {
                name: name.clone(),
                line: *line,
                path: path.clone(),
            },
            Node::Sublist(sub) => NodeJson::Sublist {
                name: sub.name.clone(),
                line: sub.line,
                colour: sub.colour.to_string(),
                item_count: sub.item_count(),
                children: nodes_to_json(&sub.children),
            },
        })
        .collect()
}

pub fn recovery_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn plural(n: usize) -> &'static str {
    if n == 1 { "item" } else { "items" }
}

/// One line per list: key, name, colour and item count, keys aligned
pub fn format_summaries(summaries: &[ListSummary]) -> Vec<String> {
    let width = summaries
        .iter()
        .map(|s| s.key.as_str().len())
        .max()
        .unwrap_or(0);
    summaries
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {} [{}] ({} {})",
                s.key.as_str(),
                s.name,
                s.colour,
                s.item_count,
                plural(s.item_count),
                width = width
            )
        })
        .collect()
}

/// A list as a tree. Items carry the line number `alter`/`rm` take.
pub fn format_list(list: &List) -> Vec<String> {
    let count = list.item_count();
    let mut lines = vec![format!(
        "{} [{}] ({} {})",
        list.name,
        list.colour,
        count,
        plural(count)
    )];
    format_nodes(&list.items, 0, &mut lines);
    lines
}

fn format_nodes(nodes: &Nodes, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            Node::Item { name, line, .. } => {
                lines.push(format!("{:>4}  {}{}", line, indent, name));
            }
            Node::Sublist(sub) => {
                lines.push(format!(
                    "      {}{}: [{}] ({})",
                    indent,
                    sub.name,
                    sub.colour,
                    sub.item_count()
                ));
                format_nodes(&sub.children, depth + 1, lines);
            }
        }
    }
}
