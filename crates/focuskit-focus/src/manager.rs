//! Focus Manager
//!
//! The focus/restore state machine. Owns the single patched-element slot, the
//! deferred-request slot, and the document-level blur cleanup listener.
//!
//! Tracking is deliberately single-slot: patching a second element before the
//! first blurs abandons the first element's synthetic tabindex, and the blur
//! cleanup runs on any blur in the document, not just the tracked element's.
//! Both behaviors are kept as-is; see DESIGN.md.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use focuskit_dom::{Dom, ListenerId, NodeId, UiEventType};

use crate::component::Component;
use crate::promise::FocusPromise;
use crate::resolver::{resolve_target, ChildSpec};
use crate::FocusError;

/// Tags that receive focus without any tabindex
const FOCUSABLE_TAGS: [&str; 6] = ["a", "button", "input", "option", "select", "textarea"];

fn is_default_focusable(tag_name: &str) -> bool {
    FOCUSABLE_TAGS.contains(&tag_name)
}

struct PendingRequest {
    component: Rc<dyn Component>,
    child: Option<ChildSpec>,
}

#[derive(Default)]
struct ManagerState {
    /// Last element given a synthetic tabindex, awaiting blur-driven cleanup
    patched: Option<NodeId>,
    /// Most recent deferred request; earlier ones in the batch are superseded
    pending_request: Option<PendingRequest>,
    /// Shared promise for the current batch; `Some` also means the batch's
    /// after-render callback is already scheduled
    pending_promise: Option<FocusPromise>,
}

enum ListenerMode {
    Attached(ListenerId),
    Absent,
}

/// Long-lived focus manager; construct once and hand out by reference
pub struct FocusManager {
    dom: Dom,
    state: Rc<RefCell<ManagerState>>,
    mode: ListenerMode,
}

impl FocusManager {
    /// Create a manager for the given host.
    ///
    /// On an interactive host this attaches one capturing blur listener at
    /// the document level. On a headless host no listener is attached and
    /// synthetic tabindexes are never removed automatically.
    pub fn new(dom: Dom) -> Self {
        let state = Rc::new(RefCell::new(ManagerState::default()));

        let mode = {
            let weak = Rc::downgrade(&state);
            let cleanup_dom = dom.clone();
            match dom.add_event_listener(UiEventType::Blur, true, move |_event| {
                Self::handle_blur(&weak, &cleanup_dom);
            }) {
                Some(id) => ListenerMode::Attached(id),
                None => ListenerMode::Absent,
            }
        };

        Self { dom, state, mode }
    }

    /// The host this manager operates on
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Resolve and focus the target element immediately.
    ///
    /// A non-interactive target gets a synthetic `tabindex="-1"` first, which
    /// is removed again when a blur is observed.
    pub fn focus_component(
        &self,
        component: &dyn Component,
        child: Option<&ChildSpec>,
    ) -> Result<NodeId, FocusError> {
        focus_target(&self.dom, &self.state, component, child)
    }

    /// Focus the target element once the next render pass completes.
    ///
    /// Requests made before the render-completion signal are coalesced: only
    /// the last one is honored, and every caller in the batch receives the
    /// same promise, resolved once with that last request's outcome.
    pub fn focus_component_after_render(
        &self,
        component: Rc<dyn Component>,
        child: Option<ChildSpec>,
    ) -> FocusPromise {
        let mut state = self.state.borrow_mut();
        state.pending_request = Some(PendingRequest { component, child });

        if let Some(promise) = &state.pending_promise {
            return promise.clone();
        }

        let promise = FocusPromise::new();
        state.pending_promise = Some(promise.clone());
        drop(state);

        // One callback per batch; the promise slot doubles as the flag.
        let weak = Rc::downgrade(&self.state);
        let callback_dom = self.dom.clone();
        self.dom.schedule_after_render(move || {
            Self::after_render(&weak, &callback_dom);
        });

        promise
    }

    fn after_render(weak: &Weak<RefCell<ManagerState>>, dom: &Dom) {
        let Some(state) = weak.upgrade() else {
            return;
        };

        let request = state.borrow_mut().pending_request.take();
        let Some(request) = request else {
            return;
        };

        let result = focus_target(dom, &state, request.component.as_ref(), request.child.as_ref());

        let promise = state.borrow_mut().pending_promise.take();
        if let Some(promise) = promise {
            promise.resolve(result);
        }
    }

    fn handle_blur(weak: &Weak<RefCell<ManagerState>>, dom: &Dom) {
        let Some(state) = weak.upgrade() else {
            return;
        };
        // Any blur clears the record and reverts the tracked element's
        // attribute, whether or not that element is the one that blurred.
        let patched = state.borrow_mut().patched.take();
        if let Some(el) = patched {
            tracing::trace!("removing synthetic tabindex from {:?}", el);
            dom.remove_attribute(el, "tabindex");
        }
    }
}

impl Drop for FocusManager {
    fn drop(&mut self) {
        if let ListenerMode::Attached(id) = self.mode {
            self.dom.remove_event_listener(id);
        }
    }
}

fn focus_target(
    dom: &Dom,
    state: &RefCell<ManagerState>,
    component: &dyn Component,
    child: Option<&ChildSpec>,
) -> Result<NodeId, FocusError> {
    let el = resolve_target(dom, component, child)?;

    let is_focusable = dom.has_attribute(el, "tabindex")
        || dom.tag_name(el).is_some_and(|tag| is_default_focusable(&tag));

    if !is_focusable {
        dom.set_attribute(el, "tabindex", "-1");
        // Recorded before the focus call: focusing may fire blur on the
        // previously active element, and the cleanup listener must already
        // see the new slot by then.
        state.borrow_mut().patched = Some(el);
    }

    tracing::debug!("focusing node {:?} (patched: {})", el, !is_focusable);
    dom.focus(el);

    Ok(el)
}

#[cfg(test)]
mod tests {
    use super::*;
    use focuskit_dom::NodeList;
    use std::cell::Cell;

    struct Comp {
        element: NodeId,
    }

    impl Component for Comp {
        fn element(&self) -> NodeId {
            self.element
        }
    }

    /// Host with a component root <div> inside <body>
    fn setup() -> (Dom, FocusManager, Rc<Comp>) {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "div");
        let manager = FocusManager::new(dom.clone());
        (dom, manager, Rc::new(Comp { element: root }))
    }

    fn focus_event_counter(dom: &Dom) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        dom.add_event_listener(UiEventType::Focus, true, move |_| c.set(c.get() + 1));
        count
    }

    #[test]
    fn test_no_child_focuses_component_element() {
        let (dom, manager, comp) = setup();

        let el = manager.focus_component(comp.as_ref(), None).unwrap();

        assert_eq!(el, comp.element);
        assert_eq!(dom.active_element(), Some(comp.element));
    }

    #[test]
    fn test_selector_focuses_first_match() {
        let (dom, manager, comp) = setup();
        let first = dom.create_element(comp.element, "input");
        dom.set_attribute(first, "class", "field");
        let second = dom.create_element(comp.element, "input");
        dom.set_attribute(second, "class", "field");

        let spec = ChildSpec::from(".field");
        let el = manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();

        assert_eq!(el, first);
        assert_eq!(dom.active_element(), Some(first));
    }

    #[test]
    fn test_missing_selector_errors_without_focusing() {
        let (dom, manager, comp) = setup();
        let input = dom.create_element(comp.element, "input");
        dom.focus(input);

        let spec = ChildSpec::from("#missing");
        let err = manager.focus_component(comp.as_ref(), Some(&spec)).unwrap_err();

        assert_eq!(err, FocusError::NoMatch("#missing".to_string()));
        assert_eq!(err.to_string(), "no child element found for selector '#missing'");
        // The previously focused element keeps focus
        assert_eq!(dom.active_element(), Some(input));
    }

    #[test]
    fn test_collection_child_focuses_first_entry() {
        let (dom, manager, comp) = setup();
        let li1 = dom.create_element(comp.element, "li");
        let _li2 = dom.create_element(comp.element, "li");

        let spec = ChildSpec::from(dom.query_selector_all(comp.element, "li"));
        let el = manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();

        assert_eq!(el, li1);
    }

    #[test]
    fn test_empty_collection_errors() {
        let (_dom, manager, comp) = setup();

        let spec = ChildSpec::from(NodeList::new());
        assert_eq!(
            manager.focus_component(comp.as_ref(), Some(&spec)),
            Err(FocusError::EmptyCollection)
        );
    }

    #[test]
    fn test_native_focusable_tag_not_patched() {
        let (dom, manager, comp) = setup();
        let button = dom.create_element(comp.element, "button");

        let spec = ChildSpec::from(button);
        manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();

        assert!(!dom.has_attribute(button, "tabindex"));
        assert_eq!(dom.active_element(), Some(button));
    }

    #[test]
    fn test_patched_element_reverts_on_blur() {
        let (dom, manager, comp) = setup();
        let span = dom.create_element(comp.element, "span");
        dom.set_attribute(span, "id", "x");

        let spec = ChildSpec::from("#x");
        let el = manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();

        assert_eq!(el, span);
        assert_eq!(dom.get_attribute(span, "tabindex").as_deref(), Some("-1"));
        assert_eq!(dom.active_element(), Some(span));

        dom.blur(span);
        assert!(!dom.has_attribute(span, "tabindex"));
    }

    #[test]
    fn test_explicit_tabindex_left_alone() {
        let (dom, manager, comp) = setup();
        let div = dom.create_element(comp.element, "div");
        dom.set_attribute(div, "tabindex", "0");

        let spec = ChildSpec::from(div);
        manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();
        assert_eq!(dom.get_attribute(div, "tabindex").as_deref(), Some("0"));

        // Not tracked, so blur does not strip it either
        dom.blur(div);
        assert_eq!(dom.get_attribute(div, "tabindex").as_deref(), Some("0"));
    }

    #[test]
    fn test_quick_succession_leaves_stale_tabindex() {
        let (dom, manager, comp) = setup();
        let first = dom.create_element(comp.element, "span");
        let second = dom.create_element(comp.element, "span");

        let spec = ChildSpec::from(first);
        manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();
        let spec = ChildSpec::from(second);
        manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();

        // Single-slot tracking: the first element's patch is abandoned, and
        // its blur then strips the second element's fresh patch instead.
        assert_eq!(dom.get_attribute(first, "tabindex").as_deref(), Some("-1"));
        assert!(!dom.has_attribute(second, "tabindex"));
        assert_eq!(dom.active_element(), Some(second));
    }

    #[test]
    fn test_deferred_coalesces_to_last_request() {
        let (dom, manager, comp) = setup();
        let a = dom.create_element(comp.element, "span");
        dom.set_attribute(a, "id", "a");
        let b = dom.create_element(comp.element, "span");
        dom.set_attribute(b, "id", "b");
        let focus_count = focus_event_counter(&dom);

        let p1 = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from("#a")),
        );
        let p2 = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from("#b")),
        );

        // Same shared promise, nothing focused yet
        assert!(p1.ptr_eq(&p2));
        assert!(!p1.is_resolved());
        assert_eq!(focus_count.get(), 0);

        dom.complete_render();

        // Exactly one focus operation, targeting the second request
        assert_eq!(focus_count.get(), 1);
        assert_eq!(dom.active_element(), Some(b));
        assert_eq!(pollster::block_on(p1), Ok(b));
        assert_eq!(pollster::block_on(p2), Ok(b));
    }

    #[test]
    fn test_sequential_deferred_batches_are_independent() {
        let (dom, manager, comp) = setup();
        let a = dom.create_element(comp.element, "input");
        let b = dom.create_element(comp.element, "textarea");

        let p1 = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from(a)),
        );
        dom.complete_render();

        let p2 = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from(b)),
        );
        dom.complete_render();

        assert!(!p1.ptr_eq(&p2));
        assert_eq!(pollster::block_on(p1), Ok(a));
        assert_eq!(pollster::block_on(p2), Ok(b));
    }

    #[test]
    fn test_deferred_promise_pends_until_render_completes() {
        use std::future::Future;
        use std::pin::Pin;
        use std::task::{Context, Poll, Waker};

        let (dom, manager, comp) = setup();
        let span = dom.create_element(comp.element, "span");

        let promise = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from(span)),
        );
        let mut handle = promise.clone();
        let mut cx = Context::from_waker(Waker::noop());

        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());

        dom.complete_render();

        assert_eq!(Pin::new(&mut handle).poll(&mut cx), Poll::Ready(Ok(span)));
    }

    #[test]
    fn test_deferred_resolution_failure_resolves_err() {
        let (dom, manager, comp) = setup();

        let promise = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from("#missing")),
        );
        dom.complete_render();

        assert_eq!(
            pollster::block_on(promise),
            Err(FocusError::NoMatch("#missing".to_string()))
        );
    }

    #[test]
    fn test_render_completion_without_request_is_noop() {
        let (dom, _manager, _comp) = setup();
        let focus_count = focus_event_counter(&dom);

        dom.complete_render();

        assert_eq!(focus_count.get(), 0);
    }

    #[test]
    fn test_headless_manager_never_cleans_up() {
        let dom = Dom::headless();
        let root = dom.create_element(dom.body(), "div");
        let manager = FocusManager::new(dom.clone());
        let comp = Comp { element: root };

        let span = dom.create_element(root, "span");
        let spec = ChildSpec::from(span);
        manager.focus_component(&comp, Some(&spec)).unwrap();
        assert_eq!(dom.get_attribute(span, "tabindex").as_deref(), Some("-1"));

        dom.blur(span);
        // No listener was ever attached, so the patch stays
        assert_eq!(dom.get_attribute(span, "tabindex").as_deref(), Some("-1"));
    }

    #[test]
    fn test_drop_detaches_blur_listener() {
        let (dom, manager, comp) = setup();
        let span = dom.create_element(comp.element, "span");

        let spec = ChildSpec::from(span);
        manager.focus_component(comp.as_ref(), Some(&spec)).unwrap();
        drop(manager);

        dom.blur(span);
        assert_eq!(dom.get_attribute(span, "tabindex").as_deref(), Some("-1"));
    }

    #[test]
    fn test_dropped_manager_skips_scheduled_callback() {
        let (dom, manager, comp) = setup();
        let span = dom.create_element(comp.element, "span");
        let focus_count = focus_event_counter(&dom);

        let promise = manager.focus_component_after_render(
            Rc::clone(&comp) as Rc<dyn Component>,
            Some(ChildSpec::from(span)),
        );
        drop(manager);

        dom.complete_render();

        assert_eq!(focus_count.get(), 0);
        assert!(!promise.is_resolved());
    }
}
