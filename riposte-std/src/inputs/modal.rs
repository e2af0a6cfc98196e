use super::ArgsFn;
use crate::context::ContextIds;
use riposte_core::{
    ArgKey, ArgumentTree, BoxError, Identifiable, Input, Interaction, eq_ignore_case,
};
use std::{fmt, sync::Arc};

/// A text-entry form.
///
/// Submitted fields are placed under the keys given with
/// [`Modal::field_arg`]; fields the user left out are skipped.
#[derive(Clone)]
pub struct Modal<K> {
    id: String,
    title: String,
    field_keys: Vec<(String, K)>,
    producer: Option<ArgsFn<K>>,
}

impl<K: ArgKey> Modal<K> {
    /// A modal with a fixed id.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            field_keys: Vec::new(),
            producer: None,
        }
    }

    /// A modal with a freshly allocated context id.
    pub fn contextual(ids: &ContextIds, title: impl Into<String>) -> Self {
        Self::new(ids.modal(), title)
    }

    /// Place the text of field `field` under `key`.
    pub fn field_arg(mut self, field: impl Into<String>, key: K) -> Self {
        self.field_keys.push((field.into(), key));
        self
    }

    /// Produce arguments with `producer` instead of the field mapping.
    pub fn args_with<F>(mut self, producer: F) -> Self
    where
        F: Fn(&Interaction) -> Result<ArgumentTree<K>, BoxError> + Send + Sync + 'static,
    {
        self.producer = Some(Arc::new(producer));
        self
    }

    /// The modal id sent back on submit.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The dialog title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl<K> Identifiable for Modal<K> {
    fn identify(&self, token: &str) -> bool {
        eq_ignore_case(&self.id, token)
    }
}

impl<K: ArgKey> Input<K> for Modal<K> {
    fn produce_args(&self, interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError> {
        if let Some(producer) = &self.producer {
            return producer(interaction);
        }
        let mut args = ArgumentTree::new();
        for (field, key) in &self.field_keys {
            if let Some(text) = interaction.field(field) {
                args.insert_value(key.clone(), text);
            }
        }
        Ok(args)
    }
}

impl<K> fmt::Debug for Modal<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
