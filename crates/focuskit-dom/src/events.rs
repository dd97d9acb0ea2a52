//! Focus Events
//!
//! Document-level listener registry. Focus and blur do not bubble, so
//! listeners that want to observe them from arbitrary targets must register
//! with the capture flag set.

use std::rc::Rc;

use crate::NodeId;

/// Event types the host dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEventType {
    Focus,
    Blur,
}

/// A dispatched focus/blur event
#[derive(Debug, Clone)]
pub struct UiEvent {
    pub event_type: UiEventType,
    pub target: NodeId,
    pub bubbles: bool,
}

impl UiEvent {
    /// Create a focus event
    pub fn focus(target: NodeId) -> Self {
        Self {
            event_type: UiEventType::Focus,
            target,
            bubbles: false,
        }
    }

    /// Create a blur event
    pub fn blur(target: NodeId) -> Self {
        Self {
            event_type: UiEventType::Blur,
            target,
            bubbles: false,
        }
    }
}

/// Listener handle, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub(crate) type Callback = Rc<dyn Fn(&UiEvent)>;

struct Listener {
    id: ListenerId,
    event_type: UiEventType,
    capture: bool,
    callback: Callback,
}

/// Document-level listener registry
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub(crate) fn add(
        &mut self,
        event_type: UiEventType,
        capture: bool,
        callback: Callback,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            event_type,
            capture,
            callback,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) {
        self.listeners.retain(|l| l.id != id);
    }

    /// Callbacks that should see `event`, capture-phase listeners first.
    ///
    /// Non-capturing listeners only see events that bubble up to the
    /// document, which focus events never do.
    pub(crate) fn matching(&self, event: &UiEvent) -> Vec<Callback> {
        let mut out: Vec<Callback> = self
            .listeners
            .iter()
            .filter(|l| l.event_type == event.event_type && l.capture)
            .map(|l| Rc::clone(&l.callback))
            .collect();
        if event.bubbles {
            out.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.event_type == event.event_type && !l.capture)
                    .map(|l| Rc::clone(&l.callback)),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_capture_listener_sees_non_bubbling_event() {
        let mut registry = ListenerRegistry::default();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        registry.add(UiEventType::Blur, true, Rc::new(move |_| h.set(h.get() + 1)));
        let h = Rc::clone(&hits);
        registry.add(UiEventType::Blur, false, Rc::new(move |_| h.set(h.get() + 10)));

        let event = UiEvent::blur(NodeId(3));
        for cb in registry.matching(&event) {
            cb(&event);
        }

        // Only the capturing listener fires for a non-bubbling event
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let mut registry = ListenerRegistry::default();
        let id = registry.add(UiEventType::Focus, true, Rc::new(|_| {}));
        assert_eq!(registry.matching(&UiEvent::focus(NodeId(1))).len(), 1);

        registry.remove(id);
        assert!(registry.matching(&UiEvent::focus(NodeId(1))).is_empty());
    }

    #[test]
    fn test_wrong_event_type_not_matched() {
        let mut registry = ListenerRegistry::default();
        registry.add(UiEventType::Focus, true, Rc::new(|_| {}));

        assert!(registry.matching(&UiEvent::blur(NodeId(1))).is_empty());
    }
}
