//! Standard guards.

use riposte_core::{Check, CheckAndReturn, CheckFailed, GuildContext, Interaction};
use std::fmt;

/// Passes only for interactions from a guild, returning the guild context
/// with the invoking member.
#[derive(Debug, Clone, Copy, Default)]
pub struct InGuild;

impl CheckAndReturn for InGuild {
    type Output = GuildContext;

    async fn check_and_return(
        &self,
        interaction: &Interaction,
    ) -> Result<GuildContext, CheckFailed> {
        interaction
            .invoker()
            .guild
            .clone()
            .ok_or_else(|| CheckFailed::new("You're not in a server"))
    }
}

/// Passes only if the bot is not connected to a voice channel in the
/// invoking guild. Implies [`InGuild`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BotNotConnected;

impl Check for BotNotConnected {
    async fn check(&self, interaction: &Interaction) -> Result<(), CheckFailed> {
        let guild = InGuild.check_and_return(interaction).await?;
        match guild.bot_voice_channel {
            Some(_) => Err(CheckFailed::new(
                "The bot is already connected to another voice channel",
            )),
            None => Ok(()),
        }
    }
}

/// A guard from a predicate and a rejection message.
pub struct Require<F> {
    predicate: F,
    message: String,
}

impl<F> Require<F>
where
    F: Fn(&Interaction) -> bool + Send + Sync + 'static,
{
    /// Reject with `message` whenever `predicate` returns `false`.
    pub fn new(message: impl Into<String>, predicate: F) -> Self {
        Self {
            predicate,
            message: message.into(),
        }
    }
}

impl<F> Check for Require<F>
where
    F: Fn(&Interaction) -> bool + Send + Sync + 'static,
{
    async fn check(&self, interaction: &Interaction) -> Result<(), CheckFailed> {
        if (self.predicate)(interaction) {
            Ok(())
        } else {
            Err(CheckFailed::new(self.message.clone()))
        }
    }
}

impl<F> fmt::Debug for Require<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Require").field("message", &self.message).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockInteraction;
    use riposte_core::{GuildContext, Member};

    fn guild(bot_voice_channel: Option<u64>) -> GuildContext {
        GuildContext {
            guild_id: 7,
            member: Member {
                user_id: 42,
                display_name: "ferris".into(),
                roles: vec![1],
                voice_channel: Some(99),
            },
            bot_voice_channel,
        }
    }

    #[tokio::test]
    async fn in_guild_returns_the_member() {
        let (interaction, _) = MockInteraction::command("play").in_guild_with(guild(None)).build();
        let context = InGuild.check_and_return(&interaction).await.unwrap();
        assert_eq!(context.member.display_name, "ferris");

        let (direct, _) = MockInteraction::command("play").build();
        let err = InGuild.check(&direct).await.unwrap_err();
        assert_eq!(err.message(), "You're not in a server");
    }

    #[tokio::test]
    async fn bot_not_connected_implies_in_guild() {
        let (direct, _) = MockInteraction::command("join").build();
        assert_eq!(
            BotNotConnected.check(&direct).await.unwrap_err().message(),
            "You're not in a server"
        );

        let (busy, _) = MockInteraction::command("join").in_guild_with(guild(Some(3))).build();
        assert_eq!(
            BotNotConnected.check(&busy).await.unwrap_err().message(),
            "The bot is already connected to another voice channel"
        );

        let (idle, _) = MockInteraction::command("join").in_guild_with(guild(None)).build();
        assert!(BotNotConnected.check(&idle).await.is_ok());
    }

    #[tokio::test]
    async fn require_uses_predicate() {
        let admins_only = Require::new("Admins only", |i: &Interaction| {
            i.invoker().guild.as_ref().is_some_and(|g| g.member.roles.contains(&1))
        });
        let (admin, _) = MockInteraction::command("ban").in_guild_with(guild(None)).build();
        let (stranger, _) = MockInteraction::command("ban").in_guild(7, 5).build();
        assert!(admins_only.check(&admin).await.is_ok());
        assert_eq!(admins_only.check(&stranger).await.unwrap_err().message(), "Admins only");
    }
}
