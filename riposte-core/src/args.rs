//! # Argument Trees
//!
//! Every action handler receives its parameters as an [`ArgumentTree`],
//! regardless of whether a command, button, modal or selection triggered it.
//!
//! A tree node holds an optional value and a map from key to child node.
//! Lookups are total: asking for a key that is not there yields an empty
//! [`Branch`] rather than `None`, so handlers can write
//! `args.get(&Key::User).get(&Key::Id).value()` without intermediate checks.
//!
//! Selections produce a linked-list-shaped tree where every selected value
//! hangs under the same "next value" key; [`ArgumentTree::chain`] walks it.

use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// Marker for types usable as argument keys.
///
/// Usually an application-defined enum:
///
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum PlayKey { Query, Position, Next }
/// ```
pub trait ArgKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> ArgKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// A value extracted from an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Free text, selected option values, modal fields.
    Str(String),
    /// Whole numbers.
    Int(i64),
    /// Decimal numbers.
    Float(f64),
    /// Yes/no options.
    Bool(bool),
    /// Platform snowflake (user, channel, role ...).
    Id(u64),
}

impl ArgValue {
    /// The value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a platform id, if it is one.
    pub fn as_id(&self) -> Option<u64> {
        match self {
            ArgValue::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        ArgValue::Id(value)
    }
}

/// A keyed tree of arguments.
///
/// Created fresh for every dispatch and handed to the action's handler by
/// value.
#[derive(Debug, Clone)]
pub struct ArgumentTree<K, V = ArgValue> {
    value: Option<V>,
    children: HashMap<K, ArgumentTree<K, V>>,
}

impl<K: ArgKey, V: PartialEq> PartialEq for ArgumentTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.children == other.children
    }
}

impl<K: ArgKey, V> ArgumentTree<K, V> {
    /// An empty node: no value, no children.
    pub fn new() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }

    /// A leaf holding `value`.
    pub fn with_value(value: impl Into<V>) -> Self {
        Self {
            value: Some(value.into()),
            children: HashMap::new(),
        }
    }

    /// A node holding `value` if present.
    pub fn from_option(value: Option<V>) -> Self {
        Self {
            value,
            children: HashMap::new(),
        }
    }

    /// This node's value.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Replace this node's value.
    pub fn set_value(&mut self, value: impl Into<V>) {
        self.value = Some(value.into());
    }

    /// Remove and return this node's value.
    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }

    /// Total lookup of a child. Absent keys yield an empty branch.
    pub fn get(&self, key: &K) -> Branch<'_, K, V> {
        Branch(self.children.get(key))
    }

    /// Mutable access to an existing child.
    pub fn child_mut(&mut self, key: &K) -> Option<&mut ArgumentTree<K, V>> {
        self.children.get_mut(key)
    }

    /// Whether `key` has a child node.
    pub fn has_child(&self, key: &K) -> bool {
        self.children.contains_key(key)
    }

    /// Attach `child` under `key`, returning any node it replaced.
    pub fn insert_child(
        &mut self,
        key: K,
        child: ArgumentTree<K, V>,
    ) -> Option<ArgumentTree<K, V>> {
        self.children.insert(key, child)
    }

    /// Attach a leaf holding `value` under `key`.
    pub fn insert_value(&mut self, key: K, value: impl Into<V>) -> Option<ArgumentTree<K, V>> {
        self.insert_child(key, ArgumentTree::with_value(value))
    }

    /// The child under `key`, created empty if missing.
    pub fn get_or_insert_child(&mut self, key: K) -> &mut ArgumentTree<K, V> {
        self.children.entry(key).or_default()
    }

    /// Attach every `(key, child)` pair, overwriting existing keys.
    pub fn extend_children(&mut self, children: impl IntoIterator<Item = (K, ArgumentTree<K, V>)>) {
        self.children.extend(children);
    }

    /// Iterate over `(key, child)` pairs in no particular order.
    pub fn children(&self) -> impl Iterator<Item = (&K, &ArgumentTree<K, V>)> {
        self.children.iter()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the node has neither a value nor children.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Walk a linked-list-shaped tree along `next`, yielding each value.
    ///
    /// The root's own value is not included. Nodes without a value end the
    /// walk.
    pub fn chain<'a>(&'a self, next: &'a K) -> impl Iterator<Item = &'a V> + 'a {
        let mut current = self.children.get(next);
        std::iter::from_fn(move || {
            let node = current?;
            current = node.children.get(next);
            node.value.as_ref()
        })
    }
}

impl<K: ArgKey, V> Default for ArgumentTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed view of a possibly-absent subtree.
///
/// Returned by [`ArgumentTree::get`]; behaves like an empty node when the key
/// was missing.
#[derive(Debug)]
pub struct Branch<'a, K, V = ArgValue>(Option<&'a ArgumentTree<K, V>>);

impl<K, V> Clone for Branch<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Branch<'_, K, V> {}

impl<'a, K: ArgKey, V> Branch<'a, K, V> {
    /// The node's value, `None` for absent nodes.
    pub fn value(self) -> Option<&'a V> {
        self.0.and_then(|node| node.value.as_ref())
    }

    /// Total lookup one level deeper.
    pub fn get(self, key: &K) -> Branch<'a, K, V> {
        Branch(self.0.and_then(|node| node.children.get(key)))
    }

    /// Whether the node exists in the tree.
    pub fn exists(self) -> bool {
        self.0.is_some()
    }

    /// True when the node is absent or holds nothing.
    pub fn is_empty(self) -> bool {
        self.0.is_none_or(ArgumentTree::is_empty)
    }

    /// Whether the node has a child under `key`.
    pub fn has_child(self, key: &K) -> bool {
        self.0.is_some_and(|node| node.has_child(key))
    }

    /// The underlying node, if present.
    pub fn node(self) -> Option<&'a ArgumentTree<K, V>> {
        self.0
    }

    /// Walk a linked list hanging off this node.
    pub fn chain(self, next: &'a K) -> impl Iterator<Item = &'a V> + 'a {
        self.0.into_iter().flat_map(move |node| node.chain(next))
    }
}

impl<'a, K: ArgKey> Branch<'a, K, ArgValue> {
    /// Shortcut for `value().and_then(ArgValue::as_str)`.
    pub fn as_str(self) -> Option<&'a str> {
        self.value().and_then(ArgValue::as_str)
    }
}

impl<'a, K: ArgKey + 'a, V: Clone + 'a> Branch<'a, K, V> {
    /// Clone the subtree out, or an empty tree for absent nodes.
    pub fn to_tree(self) -> ArgumentTree<K, V> {
        self.0.cloned().unwrap_or_default()
    }
}
