//! focuskit DOM - Host environment surface
//!
//! Minimal retained DOM for focus management:
//! - Arena tree with elements, text, attributes
//! - Scoped selector queries
//! - Focus/blur event dispatch with capturing listeners
//! - After-render callback queue

mod node;
mod tree;
mod document;
mod query;
mod events;
mod host;

pub use node::{Node, NodeData, ElementData, Attr};
pub use tree::DomTree;
pub use document::Document;
pub use query::{SimpleSelector, NodeList};
pub use events::{UiEvent, UiEventType, ListenerId};
pub use host::Dom;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Check that this ID refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }
}
