use crate::context::ContextIds;
use riposte_core::{
    ArgKey, ArgValue, ArgumentTree, BoxError, Identifiable, Input, Interaction, eq_ignore_case,
};

/// A clickable button.
///
/// Clicking carries no payload, so the produced arguments are a copy of the
/// button's preset arguments.
#[derive(Debug, Clone)]
pub struct Button<K: ArgKey> {
    id: String,
    label: String,
    args: ArgumentTree<K>,
}

impl<K: ArgKey> Button<K> {
    /// A button with a fixed id.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            args: ArgumentTree::new(),
        }
    }

    /// A button with a freshly allocated context id.
    pub fn contextual(ids: &ContextIds, label: impl Into<String>) -> Self {
        Self::new(ids.button(), label)
    }

    /// Replace the preset arguments.
    pub fn with_args(mut self, args: ArgumentTree<K>) -> Self {
        self.args = args;
        self
    }

    /// Preset a single argument.
    pub fn arg(mut self, key: K, value: impl Into<ArgValue>) -> Self {
        self.args.insert_value(key, value);
        self
    }

    /// The custom id sent back on click.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The visible label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<K: ArgKey> Identifiable for Button<K> {
    fn identify(&self, token: &str) -> bool {
        eq_ignore_case(&self.id, token)
    }
}

impl<K: ArgKey> Input<K> for Button<K> {
    fn produce_args(&self, _interaction: &Interaction) -> Result<ArgumentTree<K>, BoxError> {
        Ok(self.args.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockInteraction;

    #[test]
    fn contextual_buttons_get_distinct_ids() {
        let ids = ContextIds::new();
        let a: Button<&str> = Button::contextual(&ids, "Yes");
        let b: Button<&str> = Button::contextual(&ids, "No");
        assert!(a.id().starts_with("--ctxbtn"));
        assert_ne!(a.id(), b.id());
        assert!(a.identify(&a.id().to_uppercase()));
        assert!(!a.identify(b.id()));
    }

    #[test]
    fn click_yields_preset_args() {
        let button = Button::new("vote", "Vote").arg("choice", 2_i64);
        let (interaction, _) = MockInteraction::button("vote").build();
        let args = button.produce_args(&interaction).unwrap();
        assert_eq!(args.get(&"choice").value(), Some(&ArgValue::Int(2)));
    }
}
