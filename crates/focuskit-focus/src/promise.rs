//! Deferred Focus Promise
//!
//! A cloneable single-resolution future. One promise is created lazily per
//! deferred batch and handed to every caller in that batch; it resolves
//! exactly once, when the batch's after-render callback runs.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use focuskit_dom::NodeId;

use crate::FocusError;

/// Outcome a deferred focus operation resolves with
pub type FocusOutcome = Result<NodeId, FocusError>;

#[derive(Default)]
struct PromiseState {
    outcome: Option<FocusOutcome>,
    wakers: Vec<Waker>,
}

/// Shared handle to a pending deferred-focus result
#[derive(Clone, Default)]
pub struct FocusPromise {
    state: Rc<RefCell<PromiseState>>,
}

impl FocusPromise {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether two handles share the same underlying promise
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Whether the promise has resolved
    pub fn is_resolved(&self) -> bool {
        self.state.borrow().outcome.is_some()
    }

    /// Peek at the outcome without awaiting
    pub fn outcome(&self) -> Option<FocusOutcome> {
        self.state.borrow().outcome.clone()
    }

    /// Resolve once; later calls are ignored
    pub(crate) fn resolve(&self, outcome: FocusOutcome) {
        let wakers = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return;
            }
            state.outcome = Some(outcome);
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

impl Future for FocusPromise {
    type Output = FocusOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        if let Some(outcome) = &state.outcome {
            return Poll::Ready(outcome.clone());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
