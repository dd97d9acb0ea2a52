//! Document
//!
//! High-level document API: html/body skeleton plus the active-element slot.

use crate::query;
use crate::tree::DomTree;
use crate::NodeId;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Element currently holding focus, if any
    active_element: Option<NodeId>,
}

impl Document {
    /// Create a new document with the html/body skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            body_element: body,
            active_element: None,
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// The element currently holding focus
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    pub(crate) fn set_active_element(&mut self, el: Option<NodeId>) {
        self.active_element = el;
    }

    /// First element matching `selector` anywhere in the document
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        query::query_selector(&self.tree, self.tree.root(), selector)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| {
                self.tree
                    .get(n)
                    .and_then(|node| node.as_element())
                    .is_some_and(|el| el.id() == Some(id))
            })
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
