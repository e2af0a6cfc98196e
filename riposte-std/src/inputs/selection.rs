use crate::context::ContextIds;
use riposte_core::{
    ArgKey, ArgValue, ArgumentTree, BoxError, Identifiable, Input, Interaction, eq_ignore_case,
};
use std::{fmt, sync::Arc};

type RootFn = Arc<dyn Fn(&Interaction) -> Option<ArgValue> + Send + Sync>;
type ExtraFn<K> = Arc<dyn Fn(&Interaction, &mut ArgumentTree<K>) + Send + Sync>;

/// A selection menu.
///
/// The selected values become a chain hanging off the root: the first value
/// is the root's `next_key` child, the second is that child's `next_key`
/// child, and so on in selection order. Walk it with
/// [`ArgumentTree::chain`].
#[derive(Clone)]
pub struct Selection<K> {
    id: String,
    next_key: K,
    root_value: Option<RootFn>,
    extra_args: Option<ExtraFn<K>>,
}

impl<K: ArgKey> Selection<K> {
    /// A selection with a fixed id that chains values under `next_key`.
    pub fn new(id: impl Into<String>, next_key: K) -> Self {
        Self {
            id: id.into(),
            next_key,
            root_value: None,
            extra_args: None,
        }
    }

    /// A selection with a freshly allocated context id.
    pub fn contextual(ids: &ContextIds, next_key: K) -> Self {
        Self::new(ids.selection(), next_key)
    }

    /// Compute the root node's value. The root has no value by default.
    pub fn root_value<F>(mut self, root: F) -> Self
    where
        F: Fn(&Interaction) -> Option<ArgValue> + Send + Sync + 'static,
    {
        self.root_value = Some(Arc::new(root));
        self
    }

    /// Add arguments to the root before the chain is attached.
    pub fn extra_args<F>(mut self, extra: F) -> Self
    where
        F: Fn(&Interaction, &mut ArgumentTree<K>) + Send + Sync + 'static,
    {
        self.extra_args = Some(Arc::new(extra));
        self
    }

    /// The menu id sent back on pick.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The key each chained value hangs under.
    pub fn next_key(&self) -> &K {
        &self.next_key
    }
}

impl<K> Identifiable for Selection<K> {
    fn identify(&self, token: &str) -> bool {
        eq_ignore_case(&self.id, token)
    }
}

impl<K: ArgKey> Input<K> for Selection<K> {
    fn produce_args(&self, interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError> {
        let root = self.root_value.as_ref().and_then(|root| root(interaction));
        let mut args = ArgumentTree::from_option(root);
        if let Some(extra) = &self.extra_args {
            extra(interaction, &mut args);
        }

        let mut parent = &mut args;
        for value in interaction.selected_values() {
            let node = parent.get_or_insert_child(self.next_key.clone());
            *node = ArgumentTree::with_value(value.as_str());
            parent = node;
        }
        Ok(args)
    }
}

impl<K: fmt::Debug> fmt::Debug for Selection<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("id", &self.id)
            .field("next_key", &self.next_key)
            .finish_non_exhaustive()
    }
}
