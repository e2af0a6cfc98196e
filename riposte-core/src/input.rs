//! The contract shared by commands, buttons, modals and selections.

use crate::{
    args::{ArgKey, ArgumentTree},
    error::BoxError,
    identify::Identifiable,
    interaction::Interaction,
};

/// A named, identifiable unit of user input that can trigger an action.
///
/// Besides claiming its token, an input turns the interaction that triggered
/// it into the [`ArgumentTree`] handed to the action's handler.
pub trait Input<K: ArgKey>: Identifiable + Send + Sync + 'static {
    /// Build the handler's arguments. Empty by default.
    fn produce_args(&self, interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError> {
        let _ = interaction;
        Ok(ArgumentTree::new())
    }
}
