use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::entry::Entry;
use crate::iter::{Decisions, Iter};

/// An immutable batch of entries written by one call.
///
/// Layers are linked to their parent through an `Arc` and are never mutated
/// after construction, so any number of chains (and threads) may share them.
pub(crate) struct Layer {
    pub(crate) entries: Box<[Entry]>,
    pub(crate) parent: Option<Arc<Layer>>,
}

impl Drop for Layer {
    // Unlink iteratively so dropping a long, uniquely owned chain does not
    // recurse once per layer.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(layer) = next {
            match Arc::try_unwrap(layer) {
                Ok(mut inner) => next = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Handle to the head of a singly linked list of [`Layer`]s.
///
/// The empty chain (no head) is the root sentinel. Every write returns a new
/// chain whose head points at the old one; the receiver is left untouched.
/// Cloning a chain copies one pointer.
#[derive(Clone, Default)]
pub struct Chain {
    head: Option<Arc<Layer>>,
}

impl Chain {
    /// The empty chain.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Returns `true` if both chains share the same head layer.
    pub fn ptr_eq(a: &Chain, b: &Chain) -> bool {
        match (&a.head, &b.head) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    fn push(&self, entries: Vec<Entry>) -> Chain {
        if entries.is_empty() {
            return self.clone();
        }
        Chain {
            head: Some(Arc::new(Layer {
                entries: entries.into_boxed_slice(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Bind `key` to `value` in a new layer.
    ///
    /// An empty key or value leaves the chain as it is.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Chain {
        match Entry::new(key, value) {
            Some(entry) => self.push(vec![entry]),
            None => self.clone(),
        }
    }

    /// Bind every pair in a single layer, so the batch becomes visible as one
    /// unit. Pairs with an empty key or value are skipped.
    pub fn put_batch<I, K, V>(&self, pairs: I) -> Chain
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: Vec<Entry> = pairs
            .into_iter()
            .filter_map(|(k, v)| Entry::new(k, v))
            .collect();
        self.push(entries)
    }

    /// Record a tombstone for `key`. An empty key returns the identical chain.
    pub fn delete(&self, key: impl Into<String>) -> Chain {
        match Entry::tombstone(key) {
            Some(entry) => self.push(vec![entry]),
            None => self.clone(),
        }
    }

    /// The nearest decision for `key`, tombstones included.
    pub fn lookup(&self, key: &str) -> Option<&Entry> {
        let mut layer = self.head.as_deref();
        while let Some(l) = layer {
            if let Some(entry) = l.entries.iter().rev().find(|e| e.key() == key) {
                return Some(entry);
            }
            layer = l.parent.as_deref();
        }
        None
    }

    /// The visible value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(Entry::value)
    }

    /// Returns `true` if `key` currently has a visible value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Lazily walk visible `(key, value)` pairs, newest decision per key.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(Decisions::new(self, None))
    }

    /// Walk the visible pairs of `top` laid over `base`.
    ///
    /// Decisions in `top`, tombstones included, win over `base` on key
    /// conflicts.
    pub fn overlay<'a>(top: &'a Chain, base: &'a Chain) -> Iter<'a> {
        Iter::new(Decisions::new(top, Some(base)))
    }

    /// Every newest decision, including tombstones.
    pub fn decisions(&self) -> Decisions<'_> {
        Decisions::new(self, None)
    }

    /// Visit visible pairs until `visit` returns `false`.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        for (k, v) in self.iter() {
            if !visit(k, v) {
                break;
            }
        }
    }

    /// Snapshot of every visible pair.
    pub fn aggregate_all(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    /// Number of keys with a visible value.
    pub fn len_visible(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no key has a visible value.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Number of layers between the head and the root sentinel.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = self.head.as_deref();
        while let Some(l) = layer {
            depth += 1;
            layer = l.parent.as_deref();
        }
        depth
    }

    pub(crate) fn head(&self) -> Option<&Layer> {
        self.head.as_deref()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
