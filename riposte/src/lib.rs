//! # riposte - Interaction Dispatch for Chat Bots
//!
//! `riposte` routes user interactions (slash commands, button clicks, modal
//! submissions and selection-menu picks) to the bot action that owns them.
//!
//! An [`Action`] bundles its inputs, an ordered list of guards and a handler.
//! A [`ContextAction`] is an action registered at runtime for a single
//! message or flow; it disappears once its timer runs out or its
//! deactivation rule says so.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use riposte::prelude::*;
//!
//! let manager = ActionManager::new();
//! manager.add_action(
//!     Action::builder("ping")
//!         .command(Command::new("ping", "Check the bot is alive"))
//!         .build(|interaction: Interaction, _: ArgumentTree<&str>| async move {
//!             interaction.reply(Reply::public("pong")).await
//!         }),
//! );
//!
//! // In the platform's event loop:
//! manager.run(&interaction).await;
//! ```
//!
//! ## Context Actions
//!
//! ```rust,ignore
//! let confirm = Button::contextual(manager.ids(), "Confirm");
//! let id = confirm.id().to_string();
//! ContextAction::builder("confirm-ban", Duration::from_secs(60))
//!     .button(confirm)
//!     .deactivate_after_use(true)
//!     .register(&manager, ban_user)?;
//! // send a message carrying a button with `id`...
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use riposte_core::{
    // Arguments
    ArgKey,
    ArgValue,
    ArgumentTree,
    // Errors
    BoxError,
    Branch,
    // Guards
    Check,
    CheckAndReturn,
    CheckFailed,
    // Command registration
    CommandData,
    CommandOption,
    CommandRegistrar,
    // Configuration
    CONTEXT_PREFIX,
    DispatchConfig,
    DispatchError,
    DynCheck,
    DynExecute,
    // Handlers
    Execute,
    GuildContext,
    // Identity
    Identifiable,
    Input,
    // Interactions
    Interaction,
    InteractionData,
    InteractionKind,
    Invoker,
    Member,
    OptionKind,
    RegistryError,
    Reply,
    Responder,
};

pub use riposte_std::{
    Action, ActionBuilder, ActionHandle, ActionId, ActionInitializer, ActionManager,
    BotNotConnected, Button, Command, ContextAction, ContextActionBuilder, ContextHandle,
    ContextIds, ContextInput, DispatchOutcome, DynAction, FoundAction, InGuild, Modal, Require,
    Selection,
};

/// Test doubles for actions and managers.
pub use riposte_std::testing;

/// Everything a bot usually needs.
pub mod prelude {
    pub use crate::{
        Action, ActionManager, ArgValue, ArgumentTree, BoxError, Button, Check, CheckFailed,
        Command, CommandOption, ContextAction, DispatchOutcome, Interaction, Modal, OptionKind,
        Reply, Selection,
    };
}
