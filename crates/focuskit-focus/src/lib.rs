//! focuskit Focus Core
//!
//! DOM focus management for UI components:
//! - Resolve a target element from a component plus an optional child spec
//! - Patch non-interactive elements with a synthetic tabindex
//! - Revert the patch when the element blurs
//! - Coalesce deferred focus requests into one operation per render pass

pub mod component;
pub mod manager;
pub mod promise;
pub mod resolver;

pub use component::{Component, FocusableComponent};
pub use manager::FocusManager;
pub use promise::FocusPromise;
pub use resolver::{resolve_target, ChildSpec};

/// Focus error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    #[error("no child element found for selector '{0}'")]
    NoMatch(String),

    #[error("child collection is empty")]
    EmptyCollection,
}
