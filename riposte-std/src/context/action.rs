use crate::{
    action::{Action, ActionBuilder, DispatchOutcome, DynAction},
    inputs::{Button, Modal, Selection},
    registry::{ActionManager, ContextHandle},
};
use futures::future::BoxFuture;
use riposte_core::{
    ArgKey, Check, CommandData, DispatchConfig, Execute, Interaction, InteractionKind,
    RegistryError,
};
use std::{
    any::Any,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

type DeactivateFn<K> = Box<dyn Fn(&Action<K>, u32) -> bool + Send + Sync>;

/// An action with an expiry and a deactivation rule.
///
/// Context actions never own commands; they are triggered by buttons,
/// modals and selections only.
pub struct ContextAction<K: ArgKey> {
    action: Action<K>,
    expires_after: Duration,
    deactivate: DeactivateFn<K>,
    uses: AtomicU32,
}

impl<K: ArgKey> ContextAction<K> {
    /// Start building a context action that expires `expires_after` after
    /// registration.
    pub fn builder(name: impl Into<String>, expires_after: Duration) -> ContextActionBuilder<K> {
        ContextActionBuilder {
            inner: ActionBuilder::new(name),
            expires_after,
            deactivate: Box::new(|_, _| false),
        }
    }

    /// The wrapped action, e.g. to attach more components.
    pub fn action(&self) -> &Action<K> {
        &self.action
    }

    /// Lifetime after registration.
    pub fn lifetime(&self) -> Duration {
        self.expires_after
    }

    /// Successful dispatches so far.
    pub fn uses(&self) -> u32 {
        self.uses.load(Ordering::Acquire)
    }
}

impl<K: ArgKey> DynAction for ContextAction<K> {
    fn name(&self) -> &str {
        self.action.name()
    }

    fn belongs_to(&self, kind: InteractionKind, token: &str) -> bool {
        self.action.owns(kind, token)
    }

    fn run<'a>(
        &'a self,
        interaction: &'a Interaction,
        config: &'a DispatchConfig,
    ) -> BoxFuture<'a, DispatchOutcome> {
        Box::pin(self.action.run(interaction, config))
    }

    fn command_data(&self) -> Vec<CommandData> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn expires_after(&self) -> Option<Duration> {
        Some(self.expires_after)
    }

    fn record_use(&self) -> bool {
        let uses = self.uses.fetch_add(1, Ordering::AcqRel) + 1;
        (self.deactivate)(&self.action, uses)
    }
}

impl<K: ArgKey> fmt::Debug for ContextAction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextAction")
            .field("action", &self.action)
            .field("expires_after", &self.expires_after)
            .field("uses", &self.uses())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ContextAction`].
///
/// Without a deactivation rule the action stays live until it expires.
pub struct ContextActionBuilder<K: ArgKey> {
    inner: ActionBuilder<K>,
    expires_after: Duration,
    deactivate: DeactivateFn<K>,
}

impl<K: ArgKey> ContextActionBuilder<K> {
    /// Trigger on a button.
    pub fn button(mut self, button: Button<K>) -> Self {
        self.inner = self.inner.button(button);
        self
    }

    /// Trigger on a modal.
    pub fn modal(mut self, modal: Modal<K>) -> Self {
        self.inner = self.inner.modal(modal);
        self
    }

    /// Trigger on a selection menu.
    pub fn selection(mut self, selection: Selection<K>) -> Self {
        self.inner = self.inner.selection(selection);
        self
    }

    /// Append a guard.
    pub fn check(mut self, check: impl Check) -> Self {
        self.inner = self.inner.check(check);
        self
    }

    /// Deactivate once `predicate(action, uses)` returns `true`.
    ///
    /// `uses` counts successful dispatches including the one just finished,
    /// so it is `1` on the first evaluation.
    pub fn deactivate_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Action<K>, u32) -> bool + Send + Sync + 'static,
    {
        self.deactivate = Box::new(predicate);
        self
    }

    /// Deactivate after the first successful use, or never.
    pub fn deactivate_after_use(self, deactivate: bool) -> Self {
        self.deactivate_when(move |_, _| deactivate)
    }

    /// Deactivate once the action has been used `limit` times.
    pub fn use_limit(self, limit: u32) -> Self {
        self.deactivate_when(move |_, uses| limit <= uses)
    }

    /// Finish with the handler.
    pub fn build(self, handler: impl Execute<K>) -> ContextAction<K> {
        debug_assert!(!self.inner.has_commands());
        ContextAction {
            action: self.inner.build(handler),
            expires_after: self.expires_after,
            deactivate: self.deactivate,
            uses: AtomicU32::new(0),
        }
    }

    /// Build and register with `manager` in one step.
    pub fn register(
        self,
        manager: &ActionManager,
        handler: impl Execute<K>,
    ) -> Result<ContextHandle<K>, RegistryError> {
        manager.add_context_action(Arc::new(self.build(handler)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riposte_core::{ArgumentTree, BoxError};

    type Args = ArgumentTree<&'static str>;

    fn noop(_: Interaction, _: Args) -> futures::future::Ready<Result<(), BoxError>> {
        futures::future::ready(Ok(()))
    }

    #[test]
    fn default_never_deactivates() {
        let ctx = ContextAction::builder("confirm", Duration::from_secs(60)).build(noop);
        assert!(!ctx.record_use());
        assert!(!ctx.record_use());
        assert_eq!(ctx.uses(), 2);
        assert_eq!(DynAction::expires_after(&ctx), Some(Duration::from_secs(60)));
    }

    #[test]
    fn use_limit_counts_successful_uses() {
        let ctx = ContextAction::builder("vote", Duration::from_secs(60))
            .use_limit(3)
            .build(noop);
        assert_eq!([ctx.record_use(), ctx.record_use(), ctx.record_use()], [false, false, true]);
    }

    #[test]
    fn predicate_sees_the_action_and_count() {
        let ctx = ContextAction::builder("pager", Duration::from_secs(60))
            .button(Button::new("next", "Next"))
            .deactivate_when(|action, uses| action.button_ids().len() < uses as usize)
            .build(noop);
        assert!(!ctx.record_use());
        ctx.action().add_button(Button::new("prev", "Prev"));
        assert!(!ctx.record_use());
        assert!(ctx.record_use());
    }

    #[test]
    fn deactivate_after_use_flag() {
        let once = ContextAction::builder("once", Duration::from_secs(1))
            .deactivate_after_use(true)
            .build(noop);
        assert!(once.record_use());
    }
}
