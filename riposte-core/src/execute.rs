//! # Action Handlers
//!
//! [`Execute`] is the terminal step of a dispatch: it runs once per
//! successful dispatch with the interaction and its extracted arguments.
//!
//! Implementations are expected to acknowledge the interaction themselves.
//! Returning `Err` reports a generic internal error to the user.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|interaction, args| async move { ... }`
//! 2. **Struct implementation**: `impl Execute<MyKey> for MyHandler`

use crate::{
    args::{ArgKey, ArgumentTree},
    error::BoxError,
    interaction::Interaction,
};
use futures::future::BoxFuture;
use std::future::Future;

/// The body of an action.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot execute actions with `{K}` argument keys",
    label = "missing `Execute<{K}>` implementation",
    note = "Handlers must implement `execute`, or be an async closure taking \
            `(Interaction, ArgumentTree<{K}>)`."
)]
pub trait Execute<K: ArgKey>: Send + Sync + 'static {
    /// Run the action.
    fn execute(
        &self,
        interaction: Interaction,
        args: ArgumentTree<K>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl<F, K, Fut> Execute<K> for F
where
    K: ArgKey,
    F: Fn(Interaction, ArgumentTree<K>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    fn execute(
        &self,
        interaction: Interaction,
        args: ArgumentTree<K>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        (self)(interaction, args)
    }
}

/// Object-safe version of [`Execute`].
pub trait DynExecute<K: ArgKey>: Send + Sync + 'static {
    /// Dynamic dispatch version of [`Execute::execute`].
    fn execute_dyn(
        &self,
        interaction: Interaction,
        args: ArgumentTree<K>,
    ) -> BoxFuture<'_, Result<(), BoxError>>;
}

impl<K: ArgKey, T: Execute<K>> DynExecute<K> for T {
    fn execute_dyn(
        &self,
        interaction: Interaction,
        args: ArgumentTree<K>,
    ) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.execute(interaction, args))
    }
}
