use std::collections::HashMap;

use super::colour::{Colour, ColourMode};

/// The character separating sublist segments in an item path
pub const SUBLIST_DELIM: char = ':';

/// A node in a list's item tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single item
    Item {
        /// The last path segment
        name: String,
        /// 1-based line of the `Item` line at the last parse
        line: usize,
        /// The full path text of the line, e.g. `fruit:apple`
        path: String,
    },
    /// A named group of nodes
    Sublist(Sublist),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Item { name, .. } => name,
            Node::Sublist(sub) => &sub.name,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Node::Item { line, .. } => *line,
            Node::Sublist(sub) => sub.line,
        }
    }

    /// Number of items below (or at) this node. A sublist counts for nothing itself.
    pub fn item_count(&self) -> usize {
        match self {
            Node::Item { .. } => 1,
            Node::Sublist(sub) => sub.item_count(),
        }
    }

    /// A reference suitable for addressing this item in a mutation.
    /// Sublists are not addressable; their items are.
    pub fn item_ref(&self) -> Option<ItemRef> {
        match self {
            Node::Item { line, path, .. } => Some(ItemRef::expecting(*line, path)),
            Node::Sublist(_) => None,
        }
    }
}

/// A named group of nodes, created by the first item that names it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sublist {
    pub name: String,
    /// Line of the first item that created this sublist
    pub line: usize,
    pub colour: Colour,
    pub children: Nodes,
}

impl Sublist {
    pub fn new(name: String, line: usize, colour: Colour) -> Self {
        Sublist {
            name,
            line,
            colour,
            children: Nodes::default(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.children.item_count()
    }
}

/// An ordered sequence of nodes with a lookup table for its sublists
#[derive(Debug, Clone, Default)]
pub struct Nodes {
    nodes: Vec<Node>,
    /// Sublist name → position in `nodes`
    sublists: HashMap<String, usize>,
}

impl PartialEq for Nodes {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for Nodes {}

impl Nodes {
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Direct child sublist by exact name
    pub fn sublist(&self, name: &str) -> Option<&Sublist> {
        let idx = *self.sublists.get(name)?;
        match &self.nodes[idx] {
            Node::Sublist(sub) => Some(sub),
            Node::Item { .. } => None,
        }
    }

    /// Follow a chain of sublist names from this level
    pub fn descend<'a, I>(&self, names: I) -> Option<&Sublist>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = names.into_iter();
        let mut current = self.sublist(names.next()?)?;
        for name in names {
            current = current.children.sublist(name)?;
        }
        Some(current)
    }

    pub fn item_count(&self) -> usize {
        self.nodes.iter().map(Node::item_count).sum()
    }

    /// Insert the item described by `path` (relative to this level).
    ///
    /// The text before the first delimiter names a sublist, created here if it
    /// does not exist yet; the rest is trimmed and inserted into it. Without a
    /// delimiter, `path` is the item's own name. `source` is the full path of the
    /// line and is stored on the item.
    pub fn insert(&mut self, path: &str, line: usize, source: &str, colours: ColourMode) {
        let Some((head, rest)) = path.split_once(SUBLIST_DELIM) else {
            self.nodes.push(Node::Item {
                name: path.to_string(),
                line,
                path: source.to_string(),
            });
            return;
        };

        let idx = match self.sublists.get(head) {
            Some(&idx) => idx,
            None => {
                let sub = Sublist::new(head.to_string(), line, colours.pick(head));
                self.nodes.push(Node::Sublist(sub));
                self.sublists.insert(head.to_string(), self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };

        if let Node::Sublist(sub) = &mut self.nodes[idx] {
            sub.children.insert(rest.trim(), line, source, colours);
        }
    }

    /// Every item's full path, depth first in tree order
    pub fn item_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_paths(self, &mut out);
        out
    }
}

fn collect_paths<'a>(nodes: &'a Nodes, out: &mut Vec<&'a str>) {
    for node in nodes.iter() {
        match node {
            Node::Item { path, .. } => out.push(path),
            Node::Sublist(sub) => collect_paths(&sub.children, out),
        }
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// First and last item line seen by a parse (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpan {
    pub first: usize,
    pub last: usize,
}

impl ItemSpan {
    /// Widen the span to include `line`
    pub fn extend(span: Option<ItemSpan>, line: usize) -> ItemSpan {
        match span {
            None => ItemSpan {
                first: line,
                last: line,
            },
            Some(s) => ItemSpan {
                first: s.first,
                last: line,
            },
        }
    }
}

/// A parsed list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    /// Display name from the `Name` header
    pub name: String,
    /// Colour from the `Colour` header, or a palette pick
    pub colour: String,
    /// Whether `colour` came from the file's header
    pub colour_from_header: bool,
    /// Top-level nodes in file order
    pub items: Nodes,
    /// Lines spanned by `Item` lines, if any
    pub item_span: Option<ItemSpan>,
}

impl List {
    /// A fresh, empty list
    pub fn new(name: impl Into<String>, colour: Option<Colour>) -> Self {
        let colour_from_header = colour.is_some();
        List {
            name: name.into(),
            colour: colour.map(|c| c.to_string()).unwrap_or_default(),
            colour_from_header,
            items: Nodes::default(),
            item_span: None,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.item_count()
    }

    /// Find the item on a given line, at any depth
    pub fn item_at_line(&self, line: usize) -> Option<&Node> {
        find_line(&self.items, line)
    }
}

fn find_line(nodes: &Nodes, line: usize) -> Option<&Node> {
    for node in nodes {
        match node {
            Node::Item { line: l, .. } if *l == line => return Some(node),
            Node::Item { .. } => {}
            Node::Sublist(sub) => {
                if let Some(found) = find_line(&sub.children, line) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Addresses one `Item` line of a list file for alteration or removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// 1-based line number from the most recent parse
    pub line: usize,
    /// The path the caller saw on that line; checked before mutating if set
    pub expected: Option<String>,
}

impl ItemRef {
    pub fn at_line(line: usize) -> Self {
        ItemRef {
            line,
            expected: None,
        }
    }

    pub fn expecting(line: usize, path: &str) -> Self {
        ItemRef {
            line,
            expected: Some(path.to_string()),
        }
    }
}
