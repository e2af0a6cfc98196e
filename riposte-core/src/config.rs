//! Dispatch configuration.

/// Prefix reserved for ids of inputs owned by context actions.
///
/// An unresolved token carrying it can only belong to a context action that
/// has already expired.
pub const CONTEXT_PREFIX: &str = "--ctx";

/// Placeholder replaced by the error description in
/// [`DispatchConfig::internal_error_message`].
pub const ERROR_PLACEHOLDER: &str = "{error}";

/// User-facing messages used by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    not_found: String,
    expired: String,
    internal_error: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchConfig {
    /// The default messages.
    pub fn new() -> Self {
        Self {
            not_found: "Oops, the bot doesn't know how to respond to whatever you just did. \
                        Please contact the bot owner"
                .to_string(),
            expired: "This action has expired".to_string(),
            internal_error: "The bot ran into an internal error, please report this issue \
                             to the bot owner ({error})"
                .to_string(),
        }
    }

    /// Set the reply for interactions no action claims.
    pub fn with_not_found_message(mut self, message: impl Into<String>) -> Self {
        self.not_found = message.into();
        self
    }

    /// Set the reply for context-prefixed interactions no action claims.
    pub fn with_expired_message(mut self, message: impl Into<String>) -> Self {
        self.expired = message.into();
        self
    }

    /// Set the internal error template. `{error}` is replaced by the error text.
    pub fn with_internal_error_template(mut self, template: impl Into<String>) -> Self {
        self.internal_error = template.into();
        self
    }

    /// Whether `token` was issued for a context action.
    pub fn is_context_token(&self, token: &str) -> bool {
        token
            .get(..CONTEXT_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(CONTEXT_PREFIX))
    }

    /// Reply for an unclaimed token.
    pub fn not_found_message(&self, token: &str) -> &str {
        if self.is_context_token(token) {
            &self.expired
        } else {
            &self.not_found
        }
    }

    /// Reply for a failed dispatch.
    pub fn internal_error_message(&self, error: &str) -> String {
        self.internal_error.replace(ERROR_PLACEHOLDER, error)
    }
}
