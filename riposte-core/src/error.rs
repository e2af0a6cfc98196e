//! Error types for Riposte.
//!
//! Failures fall into three families:
//!
//! - [`CheckFailed`] - a guard rejected the interaction. Expected, user-caused,
//!   reported privately to the invoking user and never logged as an error.
//! - [`DispatchError`] - anything escaping argument production or an action's
//!   handler. Contained at the dispatch boundary, logged, and reported with a
//!   generic apology.
//! - [`RegistryError`] - misuse of the registry by the bot author. Returned
//!   from the registration call so startup code fails loudly.

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A guard rejected the interaction.
///
/// The message is shown verbatim to the invoking user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CheckFailed {
    message: String,
}

impl CheckFailed {
    /// Create a rejection carrying a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that end a dispatch before the action completed.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A guard rejected the interaction.
    #[error(transparent)]
    Rejected(#[from] CheckFailed),

    /// Argument production or the handler returned an error.
    #[error("action `{action}` failed: {source}")]
    Fault {
        /// Name of the action that failed.
        action: String,
        /// The raw error.
        #[source]
        source: BoxError,
    },

    /// Argument production or the handler panicked.
    #[error("action `{action}` panicked: {message}")]
    Panicked {
        /// Name of the action that panicked.
        action: String,
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl DispatchError {
    /// The description embedded in the message shown to the user.
    ///
    /// For faults this is the raw error's own text, without the action name.
    pub fn user_detail(&self) -> String {
        match self {
            DispatchError::Rejected(check) => check.message().to_string(),
            DispatchError::Fault { source, .. } => source.to_string(),
            DispatchError::Panicked { message, .. } => message.clone(),
        }
    }
}

/// Errors from registering actions with the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The same context action instance is already live.
    #[error("context action `{0}` is already registered")]
    AlreadyRegistered(String),

    /// Expiry timers need a Tokio runtime and none was running.
    #[error(
        "context action `{action}` (expires after {expires_after:?}) \
         registered outside a Tokio runtime"
    )]
    NoRuntime {
        /// Name of the action being registered.
        action: String,
        /// The requested expiry.
        expires_after: Duration,
    },
}
