//! Testing utilities for Riposte.
//!
//! These doubles let actions and managers be exercised without a chat
//! platform.
//!
//! # Features
//!
//! - [`MockInteraction`]: builds interactions of every kind
//! - [`RecordingResponder`]: a responder that records every reply it is asked to send
//! - [`CountingCheck`]: a guard with a fixed verdict that counts its calls
//! - [`RecordingRegistrar`]: a command registrar that records each sync

use async_trait::async_trait;
use riposte_core::{
    ArgValue, BoxError, CheckFailed, CommandData, CommandRegistrar, GuildContext, Interaction,
    InteractionData, Invoker, Member, Reply, Responder,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Responder
// ============================================================================

/// Which path a reply took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentVia {
    /// The initial reply.
    Reply,
    /// A follow-up to an acknowledged interaction.
    FollowUp,
}

/// A reply captured by [`RecordingResponder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    /// Which path was used.
    pub via: SentVia,
    /// What was sent.
    pub reply: Reply,
}

/// A responder that records replies instead of sending them.
///
/// The first successful [`Responder::reply`] acknowledges the interaction,
/// like a real platform would.
#[derive(Debug, Default)]
pub struct RecordingResponder {
    acknowledged: AtomicBool,
    fail: bool,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingResponder {
    /// A responder for a fresh, unacknowledged interaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// A responder whose interaction was already acknowledged.
    pub fn acknowledged() -> Self {
        Self {
            acknowledged: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// A responder whose every send fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<Sent> {
        lock(&self.sent).clone()
    }

    /// Contents of everything sent so far.
    pub fn contents(&self) -> Vec<String> {
        lock(&self.sent).iter().map(|sent| sent.reply.content.clone()).collect()
    }

    /// The most recent send.
    pub fn last(&self) -> Option<Sent> {
        lock(&self.sent).last().cloned()
    }

    fn record(&self, via: SentVia, reply: Reply) -> Result<(), BoxError> {
        if self.fail {
            return Err("platform unavailable".into());
        }
        lock(&self.sent).push(Sent { via, reply });
        Ok(())
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::Acquire)
    }

    async fn reply(&self, reply: Reply) -> Result<(), BoxError> {
        if self.fail {
            return Err("platform unavailable".into());
        }
        if self.acknowledged.swap(true, Ordering::AcqRel) {
            return Err("interaction already acknowledged".into());
        }
        self.record(SentVia::Reply, reply)
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), BoxError> {
        if !self.is_acknowledged() {
            return Err("follow-up before acknowledgement".into());
        }
        self.record(SentVia::FollowUp, reply)
    }
}

// ============================================================================
// Mock Interaction
// ============================================================================

/// Builder for test interactions.
///
/// ```rust,ignore
/// let (interaction, responder) = MockInteraction::command("play")
///     .option("query", "lofi")
///     .in_guild(1, 42)
///     .build();
/// manager.run(&interaction).await;
/// assert_eq!(responder.sent().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockInteraction {
    data: InteractionData,
    invoker: Invoker,
    acknowledged: bool,
    failing: bool,
}

impl MockInteraction {
    fn with_data(data: InteractionData) -> Self {
        Self {
            data,
            invoker: Invoker::direct(1),
            acknowledged: false,
            failing: false,
        }
    }

    /// A slash command invocation.
    pub fn command(name: impl Into<String>) -> Self {
        Self::with_data(InteractionData::Command {
            name: name.into(),
            options: HashMap::new(),
        })
    }

    /// A button click.
    pub fn button(custom_id: impl Into<String>) -> Self {
        Self::with_data(InteractionData::Button {
            custom_id: custom_id.into(),
        })
    }

    /// A modal submission.
    pub fn modal(modal_id: impl Into<String>) -> Self {
        Self::with_data(InteractionData::Modal {
            modal_id: modal_id.into(),
            fields: HashMap::new(),
        })
    }

    /// A selection-menu pick.
    pub fn selection<I, S>(custom_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_data(InteractionData::Selection {
            custom_id: custom_id.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Set a command option. Ignored for other kinds.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        if let InteractionData::Command { options, .. } = &mut self.data {
            options.insert(name.into(), value.into());
        }
        self
    }

    /// Set a modal field. Ignored for other kinds.
    pub fn field(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        if let InteractionData::Modal { fields, .. } = &mut self.data {
            fields.insert(id.into(), text.into());
        }
        self
    }

    /// Invoke from a guild as `user_id`, with the bot not in voice.
    pub fn in_guild(self, guild_id: u64, user_id: u64) -> Self {
        self.in_guild_with(GuildContext {
            guild_id,
            member: Member {
                user_id,
                display_name: format!("user{user_id}"),
                roles: Vec::new(),
                voice_channel: None,
            },
            bot_voice_channel: None,
        })
    }

    /// Invoke from a fully specified guild context.
    pub fn in_guild_with(mut self, guild: GuildContext) -> Self {
        self.invoker = Invoker::in_guild(guild);
        self
    }

    /// Mark the interaction as already acknowledged.
    pub fn acknowledged(mut self) -> Self {
        self.acknowledged = true;
        self
    }

    /// Make every reply fail.
    pub fn failing_replies(mut self) -> Self {
        self.failing = true;
        self
    }

    /// The interaction plus a handle on its responder.
    pub fn build(self) -> (Interaction, Arc<RecordingResponder>) {
        let responder = Arc::new(RecordingResponder {
            acknowledged: AtomicBool::new(self.acknowledged),
            fail: self.failing,
            sent: Mutex::default(),
        });
        let interaction = Interaction::new(self.data, self.invoker, responder.clone());
        (interaction, responder)
    }
}

// ============================================================================
// Counting Check
// ============================================================================

/// A guard with a fixed verdict that counts how often it ran.
#[derive(Debug, Clone)]
pub struct CountingCheck {
    calls: Arc<AtomicUsize>,
    rejection: Option<String>,
}

impl CountingCheck {
    /// A guard that always passes.
    pub fn pass() -> Self {
        Self {
            calls: Arc::default(),
            rejection: None,
        }
    }

    /// A guard that always rejects with `message`.
    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            calls: Arc::default(),
            rejection: Some(message.into()),
        }
    }

    /// How many times the guard ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl riposte_core::Check for CountingCheck {
    async fn check(&self, _interaction: &Interaction) -> Result<(), CheckFailed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.rejection {
            Some(message) => Err(CheckFailed::new(message.clone())),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Recording Registrar
// ============================================================================

/// A command registrar that records each batch it receives.
#[derive(Debug, Default)]
pub struct RecordingRegistrar {
    batches: Mutex<Vec<Vec<CommandData>>>,
}

impl RecordingRegistrar {
    /// An empty registrar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch received, oldest first.
    pub fn batches(&self) -> Vec<Vec<CommandData>> {
        lock(&self.batches).clone()
    }

    /// Names in the most recent batch.
    pub fn last_names(&self) -> Vec<String> {
        lock(&self.batches)
            .last()
            .map(|batch| batch.iter().map(|data| data.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandRegistrar for RecordingRegistrar {
    async fn register_commands(&self, commands: Vec<CommandData>) -> Result<(), BoxError> {
        lock(&self.batches).push(commands);
        Ok(())
    }
}
