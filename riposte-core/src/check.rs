//! # Guards
//!
//! A [`Check`] inspects an interaction before its action runs and either lets
//! it through or rejects it with a user-facing [`CheckFailed`].
//!
//! Checks on an action run strictly in registration order and the first
//! rejection short-circuits, so a later check may rely on an earlier one
//! having passed. [`CheckAndReturn`] additionally hands back the fact it
//! established (for example the invoking guild member) so dependent checks
//! can reuse it instead of deriving it again.

use crate::{error::CheckFailed, interaction::Interaction};
use futures::future::BoxFuture;
use std::future::Future;

/// An admission guard.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Check`",
    label = "missing `Check` implementation",
    note = "Implement `Check` or `CheckAndReturn` to guard an action."
)]
pub trait Check: Send + Sync + 'static {
    /// Pass, or reject with a message for the user.
    fn check(
        &self,
        interaction: &Interaction,
    ) -> impl Future<Output = Result<(), CheckFailed>> + Send;
}

/// Object-safe version of [`Check`], used to store guard chains.
pub trait DynCheck: Send + Sync + 'static {
    /// Dynamic dispatch version of [`Check::check`].
    fn check_dyn<'a>(
        &'a self,
        interaction: &'a Interaction,
    ) -> BoxFuture<'a, Result<(), CheckFailed>>;
}

impl<T: Check> DynCheck for T {
    fn check_dyn<'a>(
        &'a self,
        interaction: &'a Interaction,
    ) -> BoxFuture<'a, Result<(), CheckFailed>> {
        Box::pin(self.check(interaction))
    }
}

/// A guard that also returns what it established.
///
/// Every `CheckAndReturn` is a [`Check`] that discards its output.
pub trait CheckAndReturn: Send + Sync + 'static {
    /// The derived value.
    type Output: Send;

    /// Pass with the derived value, or reject.
    fn check_and_return(
        &self,
        interaction: &Interaction,
    ) -> impl Future<Output = Result<Self::Output, CheckFailed>> + Send;
}

impl<T: CheckAndReturn> Check for T {
    async fn check(&self, interaction: &Interaction) -> Result<(), CheckFailed> {
        self.check_and_return(interaction).await.map(drop)
    }
}

/// Run `checks` in order, stopping at the first rejection.
pub async fn run_checks(
    checks: &[Box<dyn DynCheck>],
    interaction: &Interaction,
) -> Result<(), CheckFailed> {
    for check in checks {
        check.check_dyn(interaction).await?;
    }
    Ok(())
}
