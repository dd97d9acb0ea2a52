//! Focus Resolver
//!
//! Deterministically resolves a (component, child) pair to a single target
//! element. No side effects.

use focuskit_dom::{Dom, NodeId, NodeList};

use crate::component::Component;
use crate::FocusError;

/// Child specifier: which element of a component should receive focus
#[derive(Debug, Clone)]
pub enum ChildSpec {
    /// CSS selector, scoped to the component's root element
    Selector(String),
    /// A specific element, used as-is
    Element(NodeId),
    /// Collection-like value; the first entry is used, the rest ignored
    Collection(NodeList),
}

impl From<&str> for ChildSpec {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ChildSpec {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for ChildSpec {
    fn from(el: NodeId) -> Self {
        Self::Element(el)
    }
}

impl From<NodeList> for ChildSpec {
    fn from(list: NodeList) -> Self {
        Self::Collection(list)
    }
}

/// Resolve the element a focus operation should act on.
///
/// With no child spec the component's root element is returned as-is; the
/// caller is responsible for it being a valid, attached element.
pub fn resolve_target(
    dom: &Dom,
    component: &dyn Component,
    child: Option<&ChildSpec>,
) -> Result<NodeId, FocusError> {
    let Some(child) = child else {
        return Ok(component.element());
    };

    match child {
        ChildSpec::Collection(list) => list.item(0).ok_or(FocusError::EmptyCollection),
        ChildSpec::Selector(selector) => dom
            .query_selector(component.element(), selector)
            .ok_or_else(|| FocusError::NoMatch(selector.clone())),
        ChildSpec::Element(el) => Ok(*el),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Comp(NodeId);

    impl Component for Comp {
        fn element(&self) -> NodeId {
            self.0
        }
    }

    #[test]
    fn test_no_child_returns_component_element() {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "div");
        let comp = Comp(root);

        assert_eq!(resolve_target(&dom, &comp, None), Ok(root));
    }

    #[test]
    fn test_selector_scoped_to_component_root() {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "div");
        let inner = dom.create_element(root, "span");
        dom.set_attribute(inner, "id", "x");
        // Same id outside the component subtree is not a candidate
        let outside = dom.create_element(dom.body(), "span");
        dom.set_attribute(outside, "id", "x");
        let comp = Comp(root);

        let spec = ChildSpec::from("#x");
        assert_eq!(resolve_target(&dom, &comp, Some(&spec)), Ok(inner));
    }

    #[test]
    fn test_selector_without_match_fails() {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "div");
        let comp = Comp(root);

        let spec = ChildSpec::from("#missing");
        assert_eq!(
            resolve_target(&dom, &comp, Some(&spec)),
            Err(FocusError::NoMatch("#missing".to_string()))
        );
    }

    #[test]
    fn test_collection_uses_first_entry() {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "ul");
        let li1 = dom.create_element(root, "li");
        let li2 = dom.create_element(root, "li");
        let comp = Comp(root);

        let spec = ChildSpec::from(NodeList::from_vec(vec![li1, li2]));
        assert_eq!(resolve_target(&dom, &comp, Some(&spec)), Ok(li1));
    }

    #[test]
    fn test_empty_collection_fails() {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "div");
        let comp = Comp(root);

        let spec = ChildSpec::from(NodeList::new());
        assert_eq!(
            resolve_target(&dom, &comp, Some(&spec)),
            Err(FocusError::EmptyCollection)
        );
    }

    #[test]
    fn test_element_used_directly() {
        let dom = Dom::new();
        let root = dom.create_element(dom.body(), "div");
        let other = dom.create_element(dom.body(), "button");
        let comp = Comp(root);

        let spec = ChildSpec::from(other);
        assert_eq!(resolve_target(&dom, &comp, Some(&spec)), Ok(other));
    }
}
