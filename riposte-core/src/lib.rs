//! # riposte-core
//!
//! Core types and traits for the Riposte interaction dispatch framework.
//!
//! This crate has minimal dependencies and is meant to be imported by platform
//! adapters that only need to describe interactions and reply to them,
//! without pulling in the registry and its timers from `riposte-std`.
//!
//! # Building Blocks
//!
//! - [`Interaction`] - one inbound event: a command, button, modal or
//!   selection, who triggered it, and a [`Responder`] to answer it.
//! - [`Identifiable`] - claims a string token; implemented by every input.
//! - [`Input`] - an identifiable that turns its interaction into an
//!   [`ArgumentTree`].
//! - [`Check`] / [`CheckAndReturn`] - ordered admission guards.
//! - [`Execute`] - the body of an action.
//!
//! # Error Types
//!
//! - [`CheckFailed`] - a guard rejection shown to the user
//! - [`DispatchError`] - faults contained at the dispatch boundary
//! - [`RegistryError`] - registration misuse

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod args;
mod check;
mod command;
mod config;
mod error;
mod execute;
mod identify;
mod input;
mod interaction;

// Re-exports
pub use args::{ArgKey, ArgValue, ArgumentTree, Branch};
pub use check::{Check, CheckAndReturn, DynCheck, run_checks};
pub use command::{CommandData, CommandOption, CommandRegistrar, OptionKind};
pub use config::{CONTEXT_PREFIX, DispatchConfig, ERROR_PLACEHOLDER};
pub use error::{BoxError, CheckFailed, DispatchError, RegistryError};
pub use execute::{DynExecute, Execute};
pub use identify::{Identifiable, eq_ignore_case, identify_first};
pub use input::Input;
pub use interaction::{
    GuildContext, Interaction, InteractionData, InteractionKind, Invoker, Member, Reply, Responder,
};
