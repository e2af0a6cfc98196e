//! Actions: inputs, guards and a handler bundled into one unit.
//!
//! An [`Action`] is triggered by any of its inputs. A dispatch runs the
//! guards in order, asks the matching input for arguments, then calls the
//! handler. Guard rejections and handler faults are reported to the user
//! here, so nothing escapes [`DynAction::run`].

use crate::inputs::{Button, Command, Modal, Selection};
use futures::{FutureExt, future::BoxFuture};
use riposte_core::{
    ArgKey, ArgumentTree, BoxError, Check, CommandData, DispatchConfig, DispatchError, DynCheck,
    DynExecute, Execute, Identifiable, Input, Interaction, InteractionKind, Reply, identify_first,
    run_checks,
};
use std::{
    any::Any,
    fmt,
    panic::AssertUnwindSafe,
    sync::{PoisonError, RwLock, RwLockReadGuard},
    time::Duration,
};

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Done,
    /// A guard rejected the interaction; `message` was sent to the user.
    Rejected {
        /// The rejection message.
        message: String,
    },
    /// Argument production or the handler failed; `message` was sent to the
    /// user.
    Failed {
        /// The apology that was sent.
        message: String,
    },
    /// No live action claimed the interaction.
    NotFound {
        /// Whether the token looked like it belonged to an expired context
        /// action.
        expired: bool,
    },
}

impl DispatchOutcome {
    /// `true` for [`DispatchOutcome::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, DispatchOutcome::Done)
    }
}

/// Object-safe view of an action, as stored by the manager.
pub trait DynAction: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether one of this action's inputs of `kind` identifies `token`.
    fn belongs_to(&self, kind: InteractionKind, token: &str) -> bool;

    /// Dispatch `interaction` to this action.
    fn run<'a>(
        &'a self,
        interaction: &'a Interaction,
        config: &'a DispatchConfig,
    ) -> BoxFuture<'a, DispatchOutcome>;

    /// Registration data for every command variant this action owns.
    fn command_data(&self) -> Vec<CommandData>;

    /// Access to the concrete action type, for typed input lookups.
    fn as_any(&self) -> &dyn Any;

    /// Lifetime after registration. `None` lives until shutdown.
    fn expires_after(&self) -> Option<Duration> {
        None
    }

    /// Count a successful dispatch and report whether the action should now
    /// be deactivated.
    fn record_use(&self) -> bool {
        false
    }
}

/// A unit of bot behavior.
///
/// Commands are fixed at build time. Buttons, modals and selections may be
/// added while the action is live, e.g. to attach a freshly sent component.
pub struct Action<K: ArgKey> {
    name: String,
    commands: Vec<Command<K>>,
    buttons: RwLock<Vec<Button<K>>>,
    modals: RwLock<Vec<Modal<K>>>,
    selections: RwLock<Vec<Selection<K>>>,
    checks: Vec<Box<dyn DynCheck>>,
    handler: Box<dyn DynExecute<K>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn produce_from<K, I>(inputs: &[I], interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError>
where
    K: ArgKey,
    I: Input<K>,
{
    match identify_first(inputs, interaction.token()) {
        Some(input) => input.produce_args(interaction),
        None => Ok(ArgumentTree::new()),
    }
}

impl<K: ArgKey> Action<K> {
    /// Start building an action.
    pub fn builder(name: impl Into<String>) -> ActionBuilder<K> {
        ActionBuilder::new(name)
    }

    /// Name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The commands triggering this action.
    pub fn commands(&self) -> &[Command<K>] {
        &self.commands
    }

    /// Attach another button.
    pub fn add_button(&self, button: Button<K>) {
        self.buttons.write().unwrap_or_else(PoisonError::into_inner).push(button);
    }

    /// Attach another modal.
    pub fn add_modal(&self, modal: Modal<K>) {
        self.modals.write().unwrap_or_else(PoisonError::into_inner).push(modal);
    }

    /// Attach another selection menu.
    pub fn add_selection(&self, selection: Selection<K>) {
        self.selections.write().unwrap_or_else(PoisonError::into_inner).push(selection);
    }

    /// Ids of the attached buttons.
    pub fn button_ids(&self) -> Vec<String> {
        read(&self.buttons).iter().map(|b| b.id().to_string()).collect()
    }

    /// The command identified by `token`.
    pub fn find_command(&self, token: &str) -> Option<&Command<K>> {
        identify_first(&self.commands, token)
    }

    /// A copy of the button identified by `token`.
    pub fn find_button(&self, token: &str) -> Option<Button<K>> {
        identify_first(read(&self.buttons).iter(), token).cloned()
    }

    /// A copy of the modal identified by `token`.
    pub fn find_modal(&self, token: &str) -> Option<Modal<K>> {
        identify_first(read(&self.modals).iter(), token).cloned()
    }

    /// A copy of the selection menu identified by `token`.
    pub fn find_selection(&self, token: &str) -> Option<Selection<K>> {
        identify_first(read(&self.selections).iter(), token).cloned()
    }

    /// Number of guards.
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Whether one of this action's inputs of `kind` identifies `token`.
    pub fn owns(&self, kind: InteractionKind, token: &str) -> bool {
        match kind {
            InteractionKind::Command => self.commands.iter().any(|c| c.identify(token)),
            InteractionKind::Button => read(&self.buttons).iter().any(|b| b.identify(token)),
            InteractionKind::Modal => read(&self.modals).iter().any(|m| m.identify(token)),
            InteractionKind::Selection => read(&self.selections).iter().any(|s| s.identify(token)),
        }
    }

    /// Arguments from whichever of this action's inputs matches.
    ///
    /// Only this action's own inputs are consulted. With no match the
    /// result is an empty tree.
    pub fn produce_args(&self, interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError> {
        match interaction.kind() {
            InteractionKind::Command => produce_from(self.commands.as_slice(), interaction),
            InteractionKind::Button => produce_from(read(&self.buttons).as_slice(), interaction),
            InteractionKind::Modal => produce_from(read(&self.modals).as_slice(), interaction),
            InteractionKind::Selection => {
                produce_from(read(&self.selections).as_slice(), interaction)
            }
        }
    }

    /// Run the guards, produce arguments and execute, reporting failures to
    /// the user.
    pub async fn run(&self, interaction: &Interaction, config: &DispatchConfig) -> DispatchOutcome {
        match self.dispatch(interaction).await {
            Ok(()) => DispatchOutcome::Done,
            Err(DispatchError::Rejected(rejection)) => {
                tracing::debug!(
                    action = %self.name,
                    reason = %rejection,
                    "interaction rejected by guard"
                );
                let message = rejection.message().to_string();
                report(interaction, message.clone()).await;
                DispatchOutcome::Rejected { message }
            }
            Err(error) => {
                tracing::warn!(action = %self.name, error = %error, "action failed");
                let message = config.internal_error_message(&error.user_detail());
                report(interaction, message.clone()).await;
                DispatchOutcome::Failed { message }
            }
        }
    }

    async fn dispatch(&self, interaction: &Interaction) -> Result<(), DispatchError> {
        AssertUnwindSafe(run_checks(&self.checks, interaction))
            .catch_unwind()
            .await
            .map_err(|payload| self.panicked(payload))??;

        let args = std::panic::catch_unwind(AssertUnwindSafe(|| self.produce_args(interaction)))
            .map_err(|payload| self.panicked(payload))?
            .map_err(|source| self.fault(source))?;

        AssertUnwindSafe(self.handler.execute_dyn(interaction.clone(), args))
            .catch_unwind()
            .await
            .map_err(|payload| self.panicked(payload))?
            .map_err(|source| self.fault(source))
    }

    fn fault(&self, source: BoxError) -> DispatchError {
        DispatchError::Fault {
            action: self.name.clone(),
            source,
        }
    }

    fn panicked(&self, payload: Box<dyn Any + Send>) -> DispatchError {
        DispatchError::Panicked {
            action: self.name.clone(),
            message: panic_message(payload.as_ref()),
        }
    }
}

/// The text of a panic payload, if it carried one.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}

/// Send an ephemeral reply, logging instead of failing if it can't be sent.
pub(crate) async fn report(interaction: &Interaction, message: String) {
    if let Err(error) = interaction.respond(Reply::ephemeral(message)).await {
        tracing::warn!(token = %interaction.token(), error = %error, "failed to send reply");
    }
}

impl<K: ArgKey> DynAction for Action<K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn belongs_to(&self, kind: InteractionKind, token: &str) -> bool {
        self.owns(kind, token)
    }

    fn run<'a>(
        &'a self,
        interaction: &'a Interaction,
        config: &'a DispatchConfig,
    ) -> BoxFuture<'a, DispatchOutcome> {
        Box::pin(Action::run(self, interaction, config))
    }

    fn command_data(&self) -> Vec<CommandData> {
        self.commands.iter().flat_map(Command::variants).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<K: ArgKey> fmt::Debug for Action<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("commands", &self.commands)
            .field("checks", &self.checks.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Action`].
pub struct ActionBuilder<K: ArgKey> {
    name: String,
    commands: Vec<Command<K>>,
    buttons: Vec<Button<K>>,
    modals: Vec<Modal<K>>,
    selections: Vec<Selection<K>>,
    checks: Vec<Box<dyn DynCheck>>,
}

impl<K: ArgKey> ActionBuilder<K> {
    /// An action with no inputs and no guards.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            buttons: Vec::new(),
            modals: Vec::new(),
            selections: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Trigger on a slash command.
    pub fn command(mut self, command: Command<K>) -> Self {
        self.commands.push(command);
        self
    }

    /// Trigger on a button.
    pub fn button(mut self, button: Button<K>) -> Self {
        self.buttons.push(button);
        self
    }

    /// Trigger on a modal.
    pub fn modal(mut self, modal: Modal<K>) -> Self {
        self.modals.push(modal);
        self
    }

    /// Trigger on a selection menu.
    pub fn selection(mut self, selection: Selection<K>) -> Self {
        self.selections.push(selection);
        self
    }

    /// Append a guard. Guards run in the order they are added.
    pub fn check(mut self, check: impl Check) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub(crate) fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Finish with the handler.
    pub fn build(self, handler: impl Execute<K>) -> Action<K> {
        Action {
            name: self.name,
            commands: self.commands,
            buttons: RwLock::new(self.buttons),
            modals: RwLock::new(self.modals),
            selections: RwLock::new(self.selections),
            checks: self.checks,
            handler: Box::new(handler),
        }
    }
}
