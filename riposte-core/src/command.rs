//! Slash-command definitions handed to the platform's bulk registration.
//!
//! Commands are registered once at startup and cannot change afterwards, so
//! only static actions carry them.

use crate::error::BoxError;
use async_trait::async_trait;

/// Type of a slash-command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Free text.
    String,
    /// Whole number.
    Integer,
    /// Decimal number.
    Number,
    /// True/false.
    Boolean,
    /// A user mention.
    User,
    /// A channel mention.
    Channel,
    /// A role mention.
    Role,
}

/// One option of a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    /// Option name, as the user sees it.
    pub name: String,
    /// Option help text.
    pub description: String,
    /// Value type.
    pub kind: OptionKind,
    /// Whether the user must fill it in.
    pub required: bool,
}

impl CommandOption {
    /// An optional option.
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A slash command as submitted to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandData {
    /// Invocable name.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Options, in display order.
    pub options: Vec<CommandOption>,
    /// Only usable inside guilds.
    pub guild_only: bool,
    /// Only usable in age-restricted channels.
    pub nsfw: bool,
    /// Permission bits required by default, `None` for everyone.
    pub default_permissions: Option<u64>,
}

impl CommandData {
    /// A command with no options and default flags.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            guild_only: false,
            nsfw: false,
            default_permissions: None,
        }
    }

    /// A copy of this command under another name.
    ///
    /// The copy keeps options and flags; its description points back at the
    /// original.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: format!("Shortcut for /{}", self.name),
            ..self.clone()
        }
    }
}

/// The platform's bulk command registration call.
#[async_trait]
pub trait CommandRegistrar: Send + Sync {
    /// Replace the bot's registered commands with `commands`.
    async fn register_commands(&self, commands: Vec<CommandData>) -> Result<(), BoxError>;
}
