//! Short-lived actions bound to a single message or flow.
//!
//! A [`ContextAction`] is registered at runtime, usually right after sending
//! the message whose components it owns. It leaves the registry on whichever
//! comes first: its expiry timer firing, or its deactivation predicate
//! returning `true` after a successful dispatch.

mod action;
mod ids;

pub use action::{ContextAction, ContextActionBuilder};
pub use ids::{ContextIds, ContextInput};
