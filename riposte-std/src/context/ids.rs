//! Id allocation for inputs owned by context actions.

use riposte_core::CONTEXT_PREFIX;
use std::sync::atomic::{AtomicU64, Ordering};

/// The kind of context input an id is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextInput {
    /// A context button.
    Button,
    /// A context modal.
    Modal,
    /// A context selection menu.
    Selection,
}

impl ContextInput {
    fn tag(self) -> &'static str {
        match self {
            ContextInput::Button => "btn",
            ContextInput::Modal => "mdl",
            ContextInput::Selection => "sct",
        }
    }
}

/// Hands out context-prefixed ids that are never reused.
///
/// Uniqueness is what makes a late expiry timer harmless: it can only ever
/// name the action it was scheduled for.
#[derive(Debug, Default)]
pub struct ContextIds {
    next: AtomicU64,
}

impl ContextIds {
    /// A fresh allocator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The next id for `kind`, e.g. `--ctxbtn7`.
    pub fn next(&self, kind: ContextInput) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{CONTEXT_PREFIX}{}{n}", kind.tag())
    }

    /// Shortcut for `next(ContextInput::Button)`.
    pub fn button(&self) -> String {
        self.next(ContextInput::Button)
    }

    /// Shortcut for `next(ContextInput::Modal)`.
    pub fn modal(&self) -> String {
        self.next(ContextInput::Modal)
    }

    /// Shortcut for `next(ContextInput::Selection)`.
    pub fn selection(&self) -> String {
        self.next(ContextInput::Selection)
    }
}
