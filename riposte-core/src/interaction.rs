//! Inbound interactions and the reply path back to the platform.
//!
//! An [`Interaction`] is a closed sum over the four kinds of user input the
//! dispatcher understands, plus who triggered it and a [`Responder`] that
//! talks back to the platform.

use crate::{args::ArgValue, error::BoxError};
use async_trait::async_trait;
use std::{collections::HashMap, fmt, sync::Arc};

/// The four kinds of interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// A slash command invocation.
    Command,
    /// A button click.
    Button,
    /// A modal submission.
    Modal,
    /// A selection-menu pick.
    Selection,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionKind::Command => "command",
            InteractionKind::Button => "button",
            InteractionKind::Modal => "modal",
            InteractionKind::Selection => "selection",
        };
        f.write_str(name)
    }
}

/// Kind-specific payload of an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionData {
    /// A slash command with its option values keyed by option name.
    Command {
        /// The invoked name (canonical name or a nickname).
        name: String,
        /// Option values supplied by the user.
        options: HashMap<String, ArgValue>,
    },
    /// A button click.
    Button {
        /// The clicked button's id.
        custom_id: String,
    },
    /// A submitted modal with its field values keyed by field id.
    Modal {
        /// The modal's id.
        modal_id: String,
        /// Submitted text per field id.
        fields: HashMap<String, String>,
    },
    /// A selection-menu pick with the chosen values in selection order.
    Selection {
        /// The menu's id.
        custom_id: String,
        /// Selected values.
        values: Vec<String>,
    },
}

impl InteractionData {
    /// The discriminant.
    pub fn kind(&self) -> InteractionKind {
        match self {
            InteractionData::Command { .. } => InteractionKind::Command,
            InteractionData::Button { .. } => InteractionKind::Button,
            InteractionData::Modal { .. } => InteractionKind::Modal,
            InteractionData::Selection { .. } => InteractionKind::Selection,
        }
    }

    /// The identity token: command name, component id or modal id.
    pub fn token(&self) -> &str {
        match self {
            InteractionData::Command { name, .. } => name,
            InteractionData::Button { custom_id } => custom_id,
            InteractionData::Modal { modal_id, .. } => modal_id,
            InteractionData::Selection { custom_id, .. } => custom_id,
        }
    }
}

/// A guild member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The member's user id.
    pub user_id: u64,
    /// Nickname or user name.
    pub display_name: String,
    /// Role ids held in the guild.
    pub roles: Vec<u64>,
    /// Voice channel the member is connected to.
    pub voice_channel: Option<u64>,
}

/// Guild-specific context of an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildContext {
    /// The guild the interaction came from.
    pub guild_id: u64,
    /// The invoking member.
    pub member: Member,
    /// Voice channel the bot itself is connected to in this guild.
    pub bot_voice_channel: Option<u64>,
}

/// Who triggered an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// The invoking user.
    pub user_id: u64,
    /// Present when the interaction came from a guild rather than a DM.
    pub guild: Option<GuildContext>,
}

impl Invoker {
    /// An invoker outside of any guild.
    pub fn direct(user_id: u64) -> Self {
        Self {
            user_id,
            guild: None,
        }
    }

    /// An invoker inside a guild.
    pub fn in_guild(guild: GuildContext) -> Self {
        Self {
            user_id: guild.member.user_id,
            guild: Some(guild),
        }
    }
}

/// An outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text.
    pub content: String,
    /// Visible only to the invoking user.
    pub ephemeral: bool,
}

impl Reply {
    /// A reply only the invoking user can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }

    /// A reply visible to everyone in the channel.
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }
}

/// The platform's reply channel for one interaction.
///
/// A platform accepts exactly one initial reply per interaction; every later
/// message has to go through [`Responder::follow_up`].
#[async_trait]
pub trait Responder: Send + Sync + 'static {
    /// Whether the interaction has already been replied to or deferred.
    fn is_acknowledged(&self) -> bool;

    /// Send the initial reply.
    async fn reply(&self, reply: Reply) -> Result<(), BoxError>;

    /// Send a message after the interaction was acknowledged.
    async fn follow_up(&self, reply: Reply) -> Result<(), BoxError>;
}

/// An inbound interaction.
#[derive(Clone)]
pub struct Interaction {
    data: InteractionData,
    invoker: Invoker,
    responder: Arc<dyn Responder>,
}

impl Interaction {
    /// Wrap platform data.
    pub fn new(data: InteractionData, invoker: Invoker, responder: Arc<dyn Responder>) -> Self {
        Self {
            data,
            invoker,
            responder,
        }
    }

    /// Kind-specific payload.
    pub fn data(&self) -> &InteractionData {
        &self.data
    }

    /// The discriminant.
    pub fn kind(&self) -> InteractionKind {
        self.data.kind()
    }

    /// The identity token.
    pub fn token(&self) -> &str {
        self.data.token()
    }

    /// Who triggered the interaction.
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Whether the interaction came from a guild.
    pub fn is_from_guild(&self) -> bool {
        self.invoker.guild.is_some()
    }

    /// A slash-command option value.
    pub fn option(&self, name: &str) -> Option<&ArgValue> {
        match &self.data {
            InteractionData::Command { options, .. } => options.get(name),
            _ => None,
        }
    }

    /// A submitted modal field.
    pub fn field(&self, id: &str) -> Option<&str> {
        match &self.data {
            InteractionData::Modal { fields, .. } => fields.get(id).map(String::as_str),
            _ => None,
        }
    }

    /// Selected values, empty for anything but selections.
    pub fn selected_values(&self) -> &[String] {
        match &self.data {
            InteractionData::Selection { values, .. } => values,
            _ => &[],
        }
    }

    /// Whether the interaction was already acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        self.responder.is_acknowledged()
    }

    /// Send the initial reply.
    pub async fn reply(&self, reply: Reply) -> Result<(), BoxError> {
        self.responder.reply(reply).await
    }

    /// Send a follow-up message.
    pub async fn follow_up(&self, reply: Reply) -> Result<(), BoxError> {
        self.responder.follow_up(reply).await
    }

    /// Send `reply` through whichever path is still open.
    pub async fn respond(&self, reply: Reply) -> Result<(), BoxError> {
        if self.is_acknowledged() {
            self.follow_up(reply).await
        } else {
            self.reply(reply).await
        }
    }
}

impl fmt::Debug for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("data", &self.data)
            .field("invoker", &self.invoker)
            .field("acknowledged", &self.is_acknowledged())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Log {
        acknowledged: Mutex<bool>,
        sent: Mutex<Vec<(&'static str, Reply)>>,
    }

    #[async_trait]
    impl Responder for Log {
        fn is_acknowledged(&self) -> bool {
            *self.acknowledged.lock().unwrap()
        }

        async fn reply(&self, reply: Reply) -> Result<(), BoxError> {
            *self.acknowledged.lock().unwrap() = true;
            self.sent.lock().unwrap().push(("reply", reply));
            Ok(())
        }

        async fn follow_up(&self, reply: Reply) -> Result<(), BoxError> {
            self.sent.lock().unwrap().push(("follow_up", reply));
            Ok(())
        }
    }

    fn button(id: &str, log: Arc<Log>) -> Interaction {
        Interaction::new(
            InteractionData::Button {
                custom_id: id.into(),
            },
            Invoker::direct(1),
            log,
        )
    }

    #[test]
    fn token_and_kind() {
        let data = InteractionData::Selection {
            custom_id: "pick".into(),
            values: vec!["a".into()],
        };
        assert_eq!(data.kind(), InteractionKind::Selection);
        assert_eq!(data.token(), "pick");
        assert_eq!(InteractionKind::Modal.to_string(), "modal");
    }

    #[test]
    fn payload_accessors_are_kind_specific() {
        let log = Arc::new(Log::default());
        let interaction = button("b", log);
        assert!(interaction.option("x").is_none());
        assert!(interaction.field("x").is_none());
        assert!(interaction.selected_values().is_empty());
        assert!(!interaction.is_from_guild());
    }

    #[tokio::test]
    async fn respond_uses_follow_up_once_acknowledged() {
        let log = Arc::new(Log::default());
        let interaction = button("b", log.clone());

        interaction.respond(Reply::ephemeral("first")).await.unwrap();
        interaction.respond(Reply::ephemeral("second")).await.unwrap();

        let sent = log.sent.lock().unwrap();
        assert_eq!(sent[0].0, "reply");
        assert_eq!(sent[1].0, "follow_up");
        assert_eq!(sent[1].1.content, "second");
    }
}
