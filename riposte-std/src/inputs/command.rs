use super::ArgsFn;
use riposte_core::{
    ArgKey, ArgumentTree, BoxError, CommandData, CommandOption, Identifiable, Input, Interaction,
    eq_ignore_case,
};
use std::{collections::BTreeSet, fmt, sync::Arc};

/// A slash command that triggers an action.
///
/// Nicknames register as structurally identical commands under another
/// name and route to the same action.
///
/// By default the produced arguments hold every option mapped with
/// [`Command::option_arg`]; [`Command::args_with`] replaces that with a
/// custom producer.
#[derive(Clone)]
pub struct Command<K> {
    data: CommandData,
    nicknames: BTreeSet<String>,
    option_keys: Vec<(String, K)>,
    producer: Option<ArgsFn<K>>,
}

impl<K: ArgKey> Command<K> {
    /// A command with no options.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::from_data(CommandData::new(name, description))
    }

    /// Wrap existing command data.
    pub fn from_data(data: CommandData) -> Self {
        Self {
            data,
            nicknames: BTreeSet::new(),
            option_keys: Vec::new(),
            producer: None,
        }
    }

    /// Add an option.
    pub fn option(mut self, option: CommandOption) -> Self {
        self.data.options.push(option);
        self
    }

    /// Restrict the command to guilds.
    pub fn guild_only(mut self) -> Self {
        self.data.guild_only = true;
        self
    }

    /// Restrict the command to age-restricted channels.
    pub fn nsfw(mut self) -> Self {
        self.data.nsfw = true;
        self
    }

    /// Require `permissions` by default.
    pub fn default_permissions(mut self, permissions: u64) -> Self {
        self.data.default_permissions = Some(permissions);
        self
    }

    /// Add an alternative name. Stored lower-cased.
    pub fn nickname(mut self, nickname: impl AsRef<str>) -> Self {
        self.nicknames.insert(nickname.as_ref().to_lowercase());
        self
    }

    /// Add several alternative names.
    pub fn nicknames<I, S>(self, nicknames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        nicknames
            .into_iter()
            .fold(self, |command, nickname| command.nickname(nickname))
    }

    /// Place the value of option `option` under `key`.
    pub fn option_arg(mut self, option: impl Into<String>, key: K) -> Self {
        self.option_keys.push((option.into(), key));
        self
    }

    /// Produce arguments with `producer` instead of the option mapping.
    pub fn args_with<F>(mut self, producer: F) -> Self
    where
        F: Fn(&Interaction) -> Result<ArgumentTree<K>, BoxError> + Send + Sync + 'static,
    {
        self.producer = Some(Arc::new(producer));
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Registration data of the canonical command.
    pub fn data(&self) -> &CommandData {
        &self.data
    }

    /// Lower-cased nicknames.
    pub fn nickname_set(&self) -> impl Iterator<Item = &str> {
        self.nicknames.iter().map(String::as_str)
    }

    /// The command itself followed by one copy per nickname.
    pub fn variants(&self) -> Vec<CommandData> {
        std::iter::once(self.data.clone())
            .chain(self.nicknames.iter().map(|nickname| self.data.renamed(nickname)))
            .collect()
    }
}

impl<K> Identifiable for Command<K> {
    fn identify(&self, token: &str) -> bool {
        eq_ignore_case(&self.data.name, token) || self.nicknames.contains(&token.to_lowercase())
    }
}

impl<K: ArgKey> Input<K> for Command<K> {
    fn produce_args(&self, interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError> {
        if let Some(producer) = &self.producer {
            return producer(interaction);
        }
        let mut args = ArgumentTree::new();
        for (option, key) in &self.option_keys {
            if let Some(value) = interaction.option(option) {
                args.insert_value(key.clone(), value.clone());
            }
        }
        Ok(args)
    }
}

impl<K> fmt::Debug for Command<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.data.name)
            .field("nicknames", &self.nicknames)
            .finish_non_exhaustive()
    }
}
