use std::collections::HashMap;

use hopmeta_chain::{Chain, Iter};

use crate::context::Context;

// Persistent values live in a single chain that `transfer_forward` never
// touches; the transport re-attaches them at every hop.
impl Context {
    pub fn with_persistent_value(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Context {
        self.with_persistent(self.frame().persistent.put(key, value))
    }

    /// Set several persistent values as one atomic layer.
    pub fn with_persistent_values<I, K, V>(&self, pairs: I) -> Context
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_persistent(self.frame().persistent.put_batch(pairs))
    }

    pub fn get_persistent_value(&self, key: &str) -> Option<&str> {
        self.frame().persistent.get(key)
    }

    pub fn del_persistent_value(&self, key: impl Into<String>) -> Context {
        self.with_persistent(self.frame().persistent.delete(key))
    }

    pub fn get_all_persistent_values(&self) -> HashMap<String, String> {
        self.frame().persistent.aggregate_all()
    }

    pub fn range_persistent_values<F>(&self, visit: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.frame().persistent.range(visit)
    }

    pub fn iter_persistent_values(&self) -> Iter<'_> {
        self.frame().persistent.iter()
    }

    pub fn count_persistent_values(&self) -> usize {
        self.frame().persistent.len_visible()
    }

    /// The persistent chain of this context.
    pub fn persistent(&self) -> &Chain {
        &self.frame().persistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_persistent_value_then_get() {
        let ctx = Context::background().with_persistent_value("Key", "Value");
        assert_eq!(ctx.get_persistent_value("Key"), Some("Value"));
    }

    #[test]
    fn empty_persistent_writes_are_noops() {
        let bg = Context::background();
        let ctx = bg.with_persistent_value("Key", "");
        assert_eq!(ctx.get_persistent_value("Key"), None);
        let ctx = ctx.with_persistent_value("", "Value");
        assert_eq!(ctx.get_persistent_value(""), None);
        assert!(Context::ptr_eq(&bg, &ctx));
    }

    #[test]
    fn del_persistent_value() {
        let ctx = Context::background().with_persistent_value("Key", "Value");
        let ctx = ctx.del_persistent_value("Key");
        assert_eq!(ctx.get_persistent_value("Key"), None);
        assert!(Context::ptr_eq(&ctx.del_persistent_value(""), &ctx));
    }

    #[test]
    fn get_all_range_and_count() {
        let mut ctx = Context::background();
        for k in ["1", "2", "3"] {
            ctx = ctx.with_persistent_value(format!("key{k}"), format!("val{k}"));
        }
        let ctx = ctx.del_persistent_value("key2");

        let all = ctx.get_all_persistent_values();
        assert_eq!(all.len(), 2);
        assert_eq!(all["key1"], "val1");
        assert_eq!(all["key3"], "val3");

        let mut ranged = HashMap::new();
        ctx.range_persistent_values(|k, v| {
            ranged.insert(k.to_owned(), v.to_owned());
            true
        });
        assert_eq!(ranged, all);
        assert_eq!(ctx.count_persistent_values(), 2);
        assert_eq!(ctx.iter_persistent_values().count(), 2);
    }

    #[test]
    fn survives_any_number_of_transfers() {
        let mut ctx = Context::background()
            .with_persistent_value("p", "v")
            .with_persistent_values([("q", "w")]);
        for _ in 0..10 {
            ctx = ctx.transfer_forward();
            assert_eq!(ctx.get_persistent_value("p"), Some("v"));
            assert_eq!(ctx.get_persistent_value("q"), Some("w"));
        }
    }

    #[test]
    fn transit_and_persistent_are_independent() {
        let ctx = Context::background()
            .with_value("A", "a")
            .with_persistent_value("A", "b");
        assert_eq!(ctx.get_value("A"), Some("a"));
        assert_eq!(ctx.get_persistent_value("A"), Some("b"));
        assert_eq!(ctx.get_value("B"), None);
        assert_eq!(ctx.get_persistent_value("B"), None);

        let ctx = ctx.del_value("A");
        assert_eq!(ctx.get_value("A"), None);
        assert_eq!(ctx.get_persistent_value("A"), Some("b"));

        let ctx = ctx.with_value("A", "a").del_persistent_value("A");
        assert_eq!(ctx.get_value("A"), Some("a"));
        assert_eq!(ctx.get_persistent_value("A"), None);
    }
}
