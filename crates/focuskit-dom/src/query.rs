//! Element Queries
//!
//! Simple selector parsing and scoped first-match search.

use crate::tree::DomTree;
use crate::NodeId;

/// Simple selector for matching
#[derive(Debug, Clone)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_lowercase()))
        }
    }

    /// Check whether an element in the tree matches this selector
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(el) = tree.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        match self {
            Self::Universal => true,
            Self::Tag(tag) => el.tag_name.eq_ignore_ascii_case(tag),
            Self::Id(want) => el.id() == Some(want.as_str()),
            Self::Class(class) => el.has_class(class),
        }
    }
}

/// First descendant of `root` matching `selector`, in tree order.
///
/// `root` itself is never a match, mirroring `querySelector` scoping.
pub fn query_selector(tree: &DomTree, root: NodeId, selector: &str) -> Option<NodeId> {
    let selector = SimpleSelector::parse(selector)?;
    tree.descendants(root)
        .into_iter()
        .find(|&id| selector.matches(tree, id))
}

/// Static node list (collection-like query result)
#[derive(Debug, Clone, Default)]
pub struct NodeList {
    nodes: Vec<NodeId>,
}

impl NodeList {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn from_vec(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }
}
