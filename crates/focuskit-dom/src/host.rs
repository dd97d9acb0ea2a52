//! Host Handle
//!
//! `Dom` bundles the document, the listener registry, and the after-render
//! callback queue behind a cheap-to-clone handle. Whether an event surface
//! exists is decided once, at construction: a headless host has no listener
//! registry and never dispatches anything.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::Document;
use crate::events::{ListenerId, ListenerRegistry, UiEvent, UiEventType};
use crate::query;
use crate::{NodeId, NodeList};

type RenderCallback = Box<dyn FnOnce()>;

struct DomInner {
    document: RefCell<Document>,
    /// None in headless hosts
    listeners: Option<RefCell<ListenerRegistry>>,
    after_render: RefCell<Vec<RenderCallback>>,
}

/// Handle to the host environment
#[derive(Clone)]
pub struct Dom {
    inner: Rc<DomInner>,
}

impl Dom {
    /// Create an interactive host: events dispatch to attached listeners
    pub fn new() -> Self {
        Self::build(Some(RefCell::new(ListenerRegistry::default())))
    }

    /// Create a headless host: no event surface, dispatch is a no-op
    pub fn headless() -> Self {
        Self::build(None)
    }

    fn build(listeners: Option<RefCell<ListenerRegistry>>) -> Self {
        Self {
            inner: Rc::new(DomInner {
                document: RefCell::new(Document::new()),
                listeners,
                after_render: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Whether this host can dispatch events
    pub fn is_interactive(&self) -> bool {
        self.inner.listeners.is_some()
    }

    /// The document <body> element
    pub fn body(&self) -> NodeId {
        self.inner.document.borrow().body()
    }

    // --- tree construction -------------------------------------------------

    /// Create an element and append it under `parent`
    pub fn create_element(&self, parent: NodeId, tag_name: &str) -> NodeId {
        let mut doc = self.inner.document.borrow_mut();
        let el = doc.tree_mut().create_element(tag_name);
        doc.tree_mut().append_child(parent, el);
        el
    }

    // --- attributes --------------------------------------------------------

    /// Get an attribute value
    pub fn get_attribute(&self, el: NodeId, name: &str) -> Option<String> {
        self.inner
            .document
            .borrow()
            .tree()
            .get(el)?
            .as_element()?
            .get_attribute(name)
            .map(str::to_string)
    }

    /// Set an attribute
    pub fn set_attribute(&self, el: NodeId, name: &str, value: &str) {
        if let Some(data) = self
            .inner
            .document
            .borrow_mut()
            .tree_mut()
            .get_mut(el)
            .and_then(|n| n.as_element_mut())
        {
            data.set_attribute(name, value);
        }
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, el: NodeId, name: &str) {
        if let Some(data) = self
            .inner
            .document
            .borrow_mut()
            .tree_mut()
            .get_mut(el)
            .and_then(|n| n.as_element_mut())
        {
            data.remove_attribute(name);
        }
    }

    /// Check attribute presence
    pub fn has_attribute(&self, el: NodeId, name: &str) -> bool {
        self.inner
            .document
            .borrow()
            .tree()
            .get(el)
            .and_then(|n| n.as_element())
            .is_some_and(|data| data.has_attribute(name))
    }

    /// Tag name of an element
    pub fn tag_name(&self, el: NodeId) -> Option<String> {
        self.inner
            .document
            .borrow()
            .tree()
            .tag_name(el)
            .map(str::to_string)
    }

    // --- queries -----------------------------------------------------------

    /// First descendant of `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let doc = self.inner.document.borrow();
        query::query_selector(doc.tree(), root, selector)
    }

    /// All descendants of `root` matching `selector`, as a node list
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> NodeList {
        let doc = self.inner.document.borrow();
        let Some(sel) = query::SimpleSelector::parse(selector) else {
            return NodeList::new();
        };
        NodeList::from_vec(
            doc.tree()
                .descendants(root)
                .into_iter()
                .filter(|&id| sel.matches(doc.tree(), id))
                .collect(),
        )
    }

    // --- focus state -------------------------------------------------------

    /// The element currently holding focus
    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.document.borrow().active_element()
    }

    /// Move focus to `el`, firing blur for the previously active element
    pub fn focus(&self, el: NodeId) {
        let previous = {
            let mut doc = self.inner.document.borrow_mut();
            let prev = doc.active_element();
            if prev == Some(el) {
                return;
            }
            doc.set_active_element(None);
            prev
        };

        if let Some(prev) = previous {
            self.dispatch(UiEvent::blur(prev));
        }

        self.inner.document.borrow_mut().set_active_element(Some(el));
        tracing::debug!("focus moved to node {:?}", el);
        self.dispatch(UiEvent::focus(el));
    }

    /// Remove focus from `el` if it is the active element
    pub fn blur(&self, el: NodeId) {
        {
            let mut doc = self.inner.document.borrow_mut();
            if doc.active_element() != Some(el) {
                return;
            }
            doc.set_active_element(None);
        }
        self.dispatch(UiEvent::blur(el));
    }

    // --- listeners ---------------------------------------------------------

    /// Attach a document-level listener; `None` on headless hosts
    pub fn add_event_listener(
        &self,
        event_type: UiEventType,
        capture: bool,
        callback: impl Fn(&UiEvent) + 'static,
    ) -> Option<ListenerId> {
        let registry = self.inner.listeners.as_ref()?;
        Some(registry.borrow_mut().add(event_type, capture, Rc::new(callback)))
    }

    /// Detach a previously attached listener
    pub fn remove_event_listener(&self, id: ListenerId) {
        if let Some(registry) = self.inner.listeners.as_ref() {
            registry.borrow_mut().remove(id);
        }
    }

    fn dispatch(&self, event: UiEvent) {
        let Some(registry) = self.inner.listeners.as_ref() else {
            return;
        };
        // Snapshot callbacks so listeners can re-enter the document or the
        // registry while the event is being delivered.
        let callbacks = registry.borrow().matching(&event);
        for callback in callbacks {
            callback(&event);
        }
    }

    // --- render scheduling -------------------------------------------------

    /// Enqueue a one-shot callback for the next render completion
    pub fn schedule_after_render(&self, callback: impl FnOnce() + 'static) {
        self.inner.after_render.borrow_mut().push(Box::new(callback));
    }

    /// Signal render completion: run all queued callbacks once.
    ///
    /// Callbacks scheduled while draining land in the next batch.
    pub fn complete_render(&self) {
        let batch: Vec<RenderCallback> =
            self.inner.after_render.borrow_mut().drain(..).collect();
        if !batch.is_empty() {
            tracing::trace!("running {} after-render callbacks", batch.len());
        }
        for callback in batch {
            callback();
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
