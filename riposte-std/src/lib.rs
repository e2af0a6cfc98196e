//! # riposte-std
//!
//! Standard implementations for the Riposte interaction dispatcher.
//!
//! This crate provides:
//! - **Inputs**: [`Command`], [`Button`], [`Modal`], [`Selection`]
//! - **Actions**: [`Action`] and its builder
//! - **Context actions**: [`ContextAction`] with expiry and deactivation
//! - **Dispatch**: [`ActionManager`]
//! - **Standard guards**: [`InGuild`], [`BotNotConnected`], [`Require`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use riposte_core;

pub mod action;
pub mod checks;
pub mod context;
pub mod inputs;
pub mod registry;
pub mod testing;

pub use action::{Action, ActionBuilder, DispatchOutcome, DynAction};
pub use checks::{BotNotConnected, InGuild, Require};
pub use context::{ContextAction, ContextActionBuilder, ContextIds, ContextInput};
pub use inputs::{Button, Command, Modal, Selection};
pub use registry::{
    ActionHandle, ActionId, ActionInitializer, ActionManager, ContextHandle, FoundAction,
};
