//! Component Traits
//!
//! `Component` is the opaque handle the core reads; `FocusableComponent` is
//! the thin convenience layer that forwards to a manager. It carries no state
//! and no logic of its own.

use std::rc::Rc;

use focuskit_dom::NodeId;

use crate::manager::FocusManager;
use crate::promise::FocusPromise;
use crate::resolver::ChildSpec;
use crate::FocusError;

/// Opaque component handle; the core only reads the root element
pub trait Component {
    /// The component's root DOM element
    fn element(&self) -> NodeId;
}

/// Convenience methods for components that move focus to themselves
pub trait FocusableComponent: Component {
    /// Element to focus when no explicit child is passed
    fn focus_node(&self) -> Option<ChildSpec> {
        None
    }

    /// Move focus to this component's focus node immediately
    fn focus(&self, manager: &FocusManager) -> Result<NodeId, FocusError>
    where
        Self: Sized,
    {
        let child = self.focus_node();
        manager.focus_component(self, child.as_ref())
    }

    /// Move focus to an explicit child, overriding the focus node
    fn focus_with(&self, manager: &FocusManager, child: ChildSpec) -> Result<NodeId, FocusError>
    where
        Self: Sized,
    {
        manager.focus_component(self, Some(&child))
    }

    /// Move focus to this component's focus node after the next render pass
    fn focus_after_render(self: Rc<Self>, manager: &FocusManager) -> FocusPromise
    where
        Self: Sized + 'static,
    {
        let child = self.focus_node();
        manager.focus_component_after_render(self, child)
    }

    /// Deferred variant of [`FocusableComponent::focus_with`]
    fn focus_after_render_with(
        self: Rc<Self>,
        manager: &FocusManager,
        child: ChildSpec,
    ) -> FocusPromise
    where
        Self: Sized + 'static,
    {
        manager.focus_component_after_render(self, Some(child))
    }
}
