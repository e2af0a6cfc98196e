//! The four input kinds an action can be triggered by.
//!
//! Each kind is an independent type implementing [`Identifiable`] and
//! [`Input`]; there is no shared base type. Inputs owned by context actions
//! are built with the `contextual` constructors, which draw a
//! context-prefixed id from the manager's [`ContextIds`].
//!
//! [`Identifiable`]: riposte_core::Identifiable
//! [`Input`]: riposte_core::Input
//! [`ContextIds`]: crate::context::ContextIds

mod button;
mod command;
mod modal;
mod selection;

use riposte_core::{ArgumentTree, BoxError, Interaction};
use std::sync::Arc;

pub use button::Button;
pub use command::Command;
pub use modal::Modal;
pub use selection::Selection;

/// A custom argument producer.
pub(crate) type ArgsFn<K> =
    Arc<dyn Fn(&Interaction) -> Result<ArgumentTree<K>, BoxError> + Send + Sync>;
