use std::collections::HashMap;

use hopmeta_chain::{Chain, Iter};

use crate::context::Context;

/// One-hop forward metadata.
///
/// Two generations of the same layered chain: `current` receives every
/// write, `aged` holds what `current` was before the most recent
/// [`transfer_forward`](Self::transfer_forward). A value therefore stays
/// visible for the hop it was written in and the one after, then drops out.
#[derive(Clone, Debug, Default)]
pub struct TransitStore {
    current: Chain,
    aged: Chain,
}

impl TransitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if both generations of `a` and `b` share their heads.
    pub fn ptr_eq(a: &TransitStore, b: &TransitStore) -> bool {
        Chain::ptr_eq(&a.current, &b.current) && Chain::ptr_eq(&a.aged, &b.aged)
    }

    /// The generation written since the last transfer.
    pub fn current(&self) -> &Chain {
        &self.current
    }

    /// The generation written before the last transfer.
    pub fn aged(&self) -> &Chain {
        &self.aged
    }

    pub fn with_value(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            current: self.current.put(key, value),
            aged: self.aged.clone(),
        }
    }

    pub fn with_values<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            current: self.current.put_batch(pairs),
            aged: self.aged.clone(),
        }
    }

    /// Bind pairs directly in the aged generation, as one layer.
    ///
    /// Used by transports restoring values that already crossed a hop
    /// upstream; they stay visible until the next transfer.
    pub fn with_upstream_values<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            current: self.current.clone(),
            aged: self.aged.put_batch(pairs),
        }
    }

    /// Visible pairs that come from the aged generation.
    pub fn iter_upstream(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aged
            .iter()
            .filter(move |(k, _)| self.current.lookup(k).is_none())
    }

    /// Lookup in `current` first. A tombstone there hides the key even if
    /// `aged` still binds it.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        match self.current.lookup(key) {
            Some(entry) => entry.value(),
            None => self.aged.get(key),
        }
    }

    /// Tombstone `key` in the current generation.
    pub fn del_value(&self, key: impl Into<String>) -> Self {
        Self {
            current: self.current.delete(key),
            aged: self.aged.clone(),
        }
    }

    /// Visible pairs: `aged` overlaid by `current`.
    pub fn iter(&self) -> Iter<'_> {
        Chain::overlay(&self.current, &self.aged)
    }

    pub fn get_all_values(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    pub fn range_values<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        for (k, v) in self.iter() {
            if !visit(k, v) {
                break;
            }
        }
    }

    pub fn count_values(&self) -> usize {
        self.iter().count()
    }

    /// Shift generations: `aged := current`, `current := empty`.
    pub fn transfer_forward(&self) -> Self {
        Self {
            current: Chain::new(),
            aged: self.current.clone(),
        }
    }
}

impl Context {
    /// Set a transit value. An empty key or value returns the identical
    /// context.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<String>) -> Context {
        self.with_transit(self.frame().transit.with_value(key, value))
    }

    /// Set several transit values as one atomic layer.
    pub fn with_values<I, K, V>(&self, pairs: I) -> Context
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_transit(self.frame().transit.with_values(pairs))
    }

    /// Set transit values that arrived from an upstream hop. They are
    /// visible now and dropped by the next [`transfer_forward`](Self::transfer_forward).
    pub fn with_upstream_values<I, K, V>(&self, pairs: I) -> Context
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_transit(self.frame().transit.with_upstream_values(pairs))
    }

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.frame().transit.get_value(key)
    }

    /// Delete a transit value. An empty key returns the identical context.
    pub fn del_value(&self, key: impl Into<String>) -> Context {
        self.with_transit(self.frame().transit.del_value(key))
    }

    pub fn get_all_values(&self) -> HashMap<String, String> {
        self.frame().transit.get_all_values()
    }

    /// Visit transit values until `visit` returns `false`.
    pub fn range_values<F>(&self, visit: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.frame().transit.range_values(visit)
    }

    /// Lazily iterate visible transit values.
    pub fn iter_values(&self) -> Iter<'_> {
        self.frame().transit.iter()
    }

    pub fn count_values(&self) -> usize {
        self.frame().transit.count_values()
    }

    /// Age the transit values for an outbound hop.
    ///
    /// Values written since the previous transfer stay visible for one more
    /// hop; values that were already aged are dropped. Persistent values and
    /// backward containers are carried over untouched.
    pub fn transfer_forward(&self) -> Context {
        self.with_transit(self.frame().transit.transfer_forward())
    }

    /// The transit store of this context.
    pub fn transit(&self) -> &TransitStore {
        &self.frame().transit
    }
}
