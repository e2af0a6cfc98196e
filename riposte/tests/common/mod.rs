#![allow(dead_code)]

use riposte::{ArgumentTree, BoxError, Execute, Interaction};
use std::sync::{Arc, Mutex};

// ============================================================================
// Argument Keys
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Query,
    Loop,
    Next,
    Choice,
    Reason,
}

pub type Args = ArgumentTree<Key>;

// ============================================================================
// Handlers
// ============================================================================

/// Records the token and arguments of every call.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(String, Args)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Execute<Key> {
        let calls = self.calls.clone();
        move |interaction: Interaction, args: Args| {
            let calls = calls.clone();
            async move {
                calls.lock().unwrap().push((interaction.token().to_string(), args));
                Ok::<(), BoxError>(())
            }
        }
    }

    pub fn calls(&self) -> Vec<(String, Args)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.calls().into_iter().map(|(token, _)| token).collect()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn failing_handler(message: &'static str) -> impl Execute<Key> {
    move |_: Interaction, _: Args| async move { Err::<(), BoxError>(message.into()) }
}
