//! The action manager: the set of live actions and the dispatch entry point.
//!
//! Static actions are added once at startup and live until the manager is
//! dropped. Context actions are added at runtime and removed by their expiry
//! timer or their deactivation predicate, whichever fires first. Removal is
//! idempotent, so the two paths may race freely.
//!
//! The live set is guarded by a plain mutex that is never held across an
//! `.await`: lookup clones the matching action out and releases the lock
//! before the action runs.

use crate::{
    action::{Action, DispatchOutcome, DynAction, panic_message, report},
    context::{ContextAction, ContextIds},
    inputs::{Button, Command, Modal, Selection},
};
use riposte_core::{
    ArgKey, BoxError, CommandData, CommandRegistrar, DispatchConfig, Interaction, InteractionKind,
    RegistryError,
};
use std::{
    collections::HashMap,
    fmt,
    panic::AssertUnwindSafe,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::{runtime::Handle, task::AbortHandle};
use tracing::Instrument;

/// Identity of a registered action, unique for the manager's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

struct Entry {
    id: ActionId,
    action: Arc<dyn DynAction>,
}

#[derive(Default)]
struct LiveSet {
    entries: Vec<Entry>,
    timers: HashMap<ActionId, AbortHandle>,
}

impl LiveSet {
    fn remove(&mut self, id: ActionId) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }
}

struct Shared {
    live: Mutex<LiveSet>,
    config: DispatchConfig,
    context_ids: ContextIds,
    next_id: AtomicU64,
}

impl Shared {
    fn live(&self) -> MutexGuard<'_, LiveSet> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate(&self) -> ActionId {
        ActionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Remove a context action, cancelling its timer.
    fn retire(&self, id: ActionId) -> bool {
        let mut live = self.live();
        let Some(timer) = live.timers.remove(&id) else {
            return false;
        };
        timer.abort();
        live.remove(id).is_some()
    }

    /// Called by the expiry timer itself.
    fn expire(&self, id: ActionId) {
        let mut live = self.live();
        if live.timers.remove(&id).is_none() {
            return;
        }
        if let Some(entry) = live.remove(id) {
            tracing::debug!(%id, action = %entry.action.name(), "context action expired");
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let live = self.live.get_mut().unwrap_or_else(PoisonError::into_inner);
        for timer in live.timers.values() {
            timer.abort();
        }
    }
}

fn typed<K: ArgKey>(action: &dyn DynAction) -> Option<&Action<K>> {
    let any = action.as_any();
    any.downcast_ref::<Action<K>>()
        .or_else(|| any.downcast_ref::<ContextAction<K>>().map(ContextAction::action))
}

/// Count a successful use. A panicking deactivation predicate retires the
/// action.
fn should_deactivate(found: &FoundAction) -> bool {
    std::panic::catch_unwind(AssertUnwindSafe(|| found.action.record_use())).unwrap_or_else(
        |payload| {
            tracing::warn!(
                id = %found.id,
                action = %found.name(),
                panic = %panic_message(payload.as_ref()),
                "deactivation predicate panicked"
            );
            true
        },
    )
}

/// Registry and dispatcher of actions.
///
/// Cloning is cheap and every clone refers to the same live set.
#[derive(Clone)]
pub struct ActionManager {
    shared: Arc<Shared>,
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionManager {
    /// An empty manager with the default user-facing messages.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// An empty manager with custom user-facing messages.
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                live: Mutex::new(LiveSet::default()),
                config,
                context_ids: ContextIds::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// A manager populated by `initializer`.
    pub fn from_initializer(
        config: DispatchConfig,
        initializer: &impl ActionInitializer,
    ) -> Result<Self, RegistryError> {
        let manager = Self::with_config(config);
        initializer.create_actions(&manager)?;
        tracing::info!(actions = manager.len(), "action manager initialized");
        Ok(manager)
    }

    /// The user-facing messages.
    pub fn config(&self) -> &DispatchConfig {
        &self.shared.config
    }

    /// Allocator for context input ids.
    pub fn ids(&self) -> &ContextIds {
        &self.shared.context_ids
    }

    /// Add a static action.
    pub fn add_action<K: ArgKey>(&self, action: Action<K>) -> ActionHandle<K> {
        let action = Arc::new(action);
        let id = self.shared.allocate();
        self.shared.live().entries.push(Entry {
            id,
            action: action.clone(),
        });
        tracing::info!(
            %id,
            action = %action.name(),
            commands = action.commands().len(),
            "registered action"
        );
        ActionHandle { id, action }
    }

    /// Add a context action and start its expiry timer.
    ///
    /// The action is findable as soon as this returns. Fails if this exact
    /// instance is already live, or if no Tokio runtime is available to run
    /// the timer.
    pub fn add_context_action<K: ArgKey>(
        &self,
        action: Arc<ContextAction<K>>,
    ) -> Result<ContextHandle<K>, RegistryError> {
        let expires_after = action.lifetime();
        let runtime = Handle::try_current().map_err(|_| RegistryError::NoRuntime {
            action: action.action().name().to_string(),
            expires_after,
        })?;

        let mut live = self.shared.live();
        let instance = Arc::as_ptr(&action).cast::<()>();
        if live
            .entries
            .iter()
            .any(|entry| Arc::as_ptr(&entry.action).cast::<()>() == instance)
        {
            return Err(RegistryError::AlreadyRegistered(action.action().name().to_string()));
        }

        let id = self.shared.allocate();
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(expires_after).await;
            if let Some(shared) = shared.upgrade() {
                shared.expire(id);
            }
        });
        live.timers.insert(id, timer.abort_handle());
        live.entries.push(Entry {
            id,
            action: action.clone(),
        });
        drop(live);

        tracing::info!(
            %id,
            action = %action.action().name(),
            ?expires_after,
            "registered context action"
        );
        Ok(ContextHandle { id, action })
    }

    /// Remove a context action early, cancelling its timer.
    ///
    /// Returns `false` if it was already gone or `id` names a static action.
    pub fn remove_context_action(&self, id: ActionId) -> bool {
        let removed = self.shared.retire(id);
        if removed {
            tracing::debug!(%id, "context action removed");
        }
        removed
    }

    /// The first live action owning an input of `kind` identified by `token`.
    pub fn find_by_token(&self, kind: InteractionKind, token: &str) -> Option<FoundAction> {
        self.shared
            .live()
            .entries
            .iter()
            .find(|entry| entry.action.belongs_to(kind, token))
            .map(|entry| FoundAction {
                id: entry.id,
                action: entry.action.clone(),
            })
    }

    /// A copy of the command named `name`, searched among live actions with
    /// `K` argument keys.
    pub fn find_command<K: ArgKey>(&self, name: &str) -> Option<Command<K>> {
        self.find_input(|action: &Action<K>| action.find_command(name).cloned())
    }

    /// A copy of the live button with id `id`, e.g. to render it again.
    pub fn find_button<K: ArgKey>(&self, id: &str) -> Option<Button<K>> {
        self.find_input(|action: &Action<K>| action.find_button(id))
    }

    /// A copy of the live modal with id `id`.
    pub fn find_modal<K: ArgKey>(&self, id: &str) -> Option<Modal<K>> {
        self.find_input(|action: &Action<K>| action.find_modal(id))
    }

    /// A copy of the live selection menu with id `id`.
    pub fn find_selection<K: ArgKey>(&self, id: &str) -> Option<Selection<K>> {
        self.find_input(|action: &Action<K>| action.find_selection(id))
    }

    fn find_input<K, T, F>(&self, find: F) -> Option<T>
    where
        K: ArgKey,
        F: Fn(&Action<K>) -> Option<T>,
    {
        self.shared
            .live()
            .entries
            .iter()
            .filter_map(|entry| typed::<K>(entry.action.as_ref()))
            .find_map(find)
    }

    /// The live action responsible for `interaction`.
    pub fn find_action(&self, interaction: &Interaction) -> Option<FoundAction> {
        self.find_by_token(interaction.kind(), interaction.token())
    }

    /// Dispatch `interaction`.
    ///
    /// Never fails: rejections, faults and unknown tokens are all answered
    /// with an ephemeral reply and reported in the outcome.
    pub async fn run(&self, interaction: &Interaction) -> DispatchOutcome {
        let span = tracing::debug_span!(
            "dispatch",
            kind = %interaction.kind(),
            token = %interaction.token()
        );
        self.dispatch(interaction).instrument(span).await
    }

    async fn dispatch(&self, interaction: &Interaction) -> DispatchOutcome {
        let config = &self.shared.config;
        let Some(found) = self.find_action(interaction) else {
            let expired = config.is_context_token(interaction.token());
            tracing::debug!(expired, "no action claims interaction");
            report(interaction, config.not_found_message(interaction.token()).to_string()).await;
            return DispatchOutcome::NotFound { expired };
        };

        let outcome = found.action.run(interaction, config).await;
        if outcome.is_done() && should_deactivate(&found) && self.shared.retire(found.id) {
            tracing::debug!(id = %found.id, action = %found.name(), "context action deactivated");
        }
        outcome
    }

    /// Registration data for every command of every live action, nickname
    /// variants included.
    pub fn command_data(&self) -> Vec<CommandData> {
        self.shared
            .live()
            .entries
            .iter()
            .flat_map(|entry| entry.action.command_data())
            .collect()
    }

    /// Push [`command_data`](Self::command_data) to the platform.
    pub async fn sync_commands(&self, registrar: &dyn CommandRegistrar) -> Result<(), BoxError> {
        let commands = self.command_data();
        tracing::info!(commands = commands.len(), "registering commands");
        registrar.register_commands(commands).await
    }

    /// Ids of all live actions in registration order.
    pub fn action_ids(&self) -> Vec<ActionId> {
        self.shared.live().entries.iter().map(|entry| entry.id).collect()
    }

    /// Whether `id` is live.
    pub fn contains(&self, id: ActionId) -> bool {
        self.shared.live().entries.iter().any(|entry| entry.id == id)
    }

    /// Number of live actions.
    pub fn len(&self) -> usize {
        self.shared.live().entries.len()
    }

    /// Number of expiry timers still armed.
    pub fn pending_timers(&self) -> usize {
        self.shared.live().timers.len()
    }

    /// `true` if no action is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ActionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self.shared.live();
        f.debug_struct("ActionManager")
            .field("actions", &live.entries.len())
            .field("timers", &live.timers.len())
            .finish()
    }
}

/// A registered static action.
#[derive(Debug)]
pub struct ActionHandle<K: ArgKey> {
    id: ActionId,
    action: Arc<Action<K>>,
}

impl<K: ArgKey> ActionHandle<K> {
    /// Registry id.
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// The action, e.g. to attach more components.
    pub fn action(&self) -> &Action<K> {
        &self.action
    }
}

/// A registered context action.
#[derive(Debug)]
pub struct ContextHandle<K: ArgKey> {
    id: ActionId,
    action: Arc<ContextAction<K>>,
}

impl<K: ArgKey> ContextHandle<K> {
    /// Registry id, for [`ActionManager::remove_context_action`].
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// The context action.
    pub fn action(&self) -> &Arc<ContextAction<K>> {
        &self.action
    }
}

/// Result of a lookup.
#[derive(Clone)]
pub struct FoundAction {
    id: ActionId,
    action: Arc<dyn DynAction>,
}

impl FoundAction {
    /// Registry id.
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Action name.
    pub fn name(&self) -> &str {
        self.action.name()
    }

    /// Whether the found action is a context action.
    pub fn is_contextual(&self) -> bool {
        self.action.expires_after().is_some()
    }
}

impl fmt::Debug for FoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoundAction")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

/// Populates a manager with the bot's static actions at startup.
pub trait ActionInitializer {
    /// Register actions on `manager`.
    fn create_actions(&self, manager: &ActionManager) -> Result<(), RegistryError>;
}

impl<F> ActionInitializer for F
where
    F: Fn(&ActionManager) -> Result<(), RegistryError>,
{
    fn create_actions(&self, manager: &ActionManager) -> Result<(), RegistryError> {
        (self)(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockInteraction;
    use riposte_core::ArgumentTree;
    use std::time::Duration;

    type Args = ArgumentTree<&'static str>;

    fn noop(_: Interaction, _: Args) -> futures::future::Ready<Result<(), BoxError>> {
        futures::future::ready(Ok(()))
    }

    #[test]
    fn context_action_outside_runtime_is_refused() {
        let manager = ActionManager::new();
        let ctx = ContextAction::builder("late", Duration::from_secs(5))
            .button(Button::new("--ctxbtn0", "Late"))
            .build(noop);

        let err = manager.add_context_action(Arc::new(ctx)).unwrap_err();
        assert!(matches!(err, RegistryError::NoRuntime { .. }));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn same_instance_cannot_be_added_twice() {
        let manager = ActionManager::new();
        let ctx = Arc::new(
            ContextAction::builder("confirm", Duration::from_secs(5))
                .button(Button::new("--ctxbtn0", "Ok"))
                .build(noop),
        );

        manager.add_context_action(ctx.clone()).unwrap();
        let err = manager.add_context_action(ctx).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("confirm".into()));
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_ignores_static_actions() {
        let manager = ActionManager::new();
        let ping = manager.add_action(
            Action::builder("ping")
                .command(Command::new("ping", "Ping"))
                .build(noop),
        );
        let handle = ContextAction::builder("confirm", Duration::from_secs(5))
            .button(Button::contextual(manager.ids(), "Ok"))
            .register(&manager, noop)
            .unwrap();

        assert!(!manager.remove_context_action(ping.id()));
        assert!(manager.remove_context_action(handle.id()));
        assert!(!manager.remove_context_action(handle.id()));
        assert_eq!(manager.action_ids(), [ping.id()]);
    }

    #[tokio::test]
    async fn inputs_of_live_actions_can_be_looked_up() {
        let manager = ActionManager::new();
        manager.add_action(
            Action::builder("play")
                .command(Command::new("play", "Play").nickname("p"))
                .modal(Modal::new("feedback", "Feedback"))
                .build(noop),
        );
        let selection = Selection::contextual(manager.ids(), "next");
        let selection_id = selection.id().to_string();
        let handle = ContextAction::builder("pick", Duration::from_secs(5))
            .button(Button::new("--ctxbtn99", "Pick"))
            .selection(selection)
            .register(&manager, noop)
            .unwrap();

        let command = manager.find_command::<&str>("P").unwrap();
        assert_eq!(command.name(), "play");
        assert_eq!(manager.find_modal::<&str>("feedback").unwrap().title(), "Feedback");
        assert_eq!(manager.find_button::<&str>("--ctxbtn99").unwrap().label(), "Pick");
        assert_eq!(manager.find_selection::<&str>(&selection_id).unwrap().next_key(), &"next");
        assert!(manager.find_button::<u32>("--ctxbtn99").is_none());

        assert!(manager.remove_context_action(handle.id()));
        assert!(manager.find_button::<&str>("--ctxbtn99").is_none());
        assert!(manager.find_selection::<&str>(&selection_id).is_none());
    }

    #[tokio::test]
    async fn first_registered_owner_wins() {
        let manager = ActionManager::new();
        let first = manager.add_action(
            Action::builder("first")
                .button(Button::new("shared", "A"))
                .build(noop),
        );
        manager.add_action(
            Action::builder("second")
                .button(Button::new("shared", "B"))
                .build(noop),
        );

        let found = manager.find_by_token(InteractionKind::Button, "shared").unwrap();
        assert_eq!(found.id(), first.id());
        assert_eq!(found.name(), "first");
        assert!(!found.is_contextual());
    }

    #[tokio::test]
    async fn initializer_populates_manager() {
        let initializer = |manager: &ActionManager| -> Result<(), RegistryError> {
            manager.add_action(
                Action::builder("ping")
                    .command(Command::new("ping", "Ping"))
                    .build(noop),
            );
            Ok(())
        };
        let manager =
            ActionManager::from_initializer(DispatchConfig::default(), &initializer).unwrap();

        let (interaction, _) = MockInteraction::command("PING").build();
        assert_eq!(
            manager.find_action(&interaction).map(|found| found.id()),
            manager.action_ids().first().copied()
        );
    }
}
