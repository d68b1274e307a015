//! Operations on a context that may be absent.
//!
//! Transports often hold an `Option<Context>` (no metadata arrived, or the
//! call was made outside any request). [`MaybeContext`] lets such code use
//! the same operations without branching: every read on `None` yields its
//! zero value and every write returns `None`.

use std::collections::HashMap;

use crate::context::Context;

/// Nil-tolerant view over `Option<Context>`.
pub trait MaybeContext: Sized {
    fn transfer_forward(&self) -> Self;

    fn with_value(&self, key: &str, value: &str) -> Self;
    fn with_values<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
    fn get_value(&self, key: &str) -> Option<&str>;
    fn del_value(&self, key: &str) -> Self;
    fn get_all_values(&self) -> HashMap<String, String>;
    fn range_values<F>(&self, visit: F)
    where
        F: FnMut(&str, &str) -> bool;
    fn count_values(&self) -> usize;

    fn with_persistent_value(&self, key: &str, value: &str) -> Self;
    fn with_persistent_values<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
    fn get_persistent_value(&self, key: &str) -> Option<&str>;
    fn del_persistent_value(&self, key: &str) -> Self;
    fn get_all_persistent_values(&self) -> HashMap<String, String>;
    fn range_persistent_values<F>(&self, visit: F)
    where
        F: FnMut(&str, &str) -> bool;
    fn count_persistent_values(&self) -> usize;

    fn with_backward_values(&self) -> Self;
    fn with_backward_values_to_send(&self) -> Self;
    fn set_backward_value(&self, key: &str, value: &str) -> bool;
    fn set_backward_values<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
    fn set_backward_values_from_map(&self, map: &HashMap<String, String>) -> bool;
    fn get_backward_value(&self, key: &str) -> Option<String>;
    fn get_all_backward_values(&self) -> HashMap<String, String>;
    fn recv_backward_value(&self, key: &str) -> Option<String>;
    fn recv_all_backward_values(&self) -> HashMap<String, String>;
    fn send_backward_value(&self, key: &str, value: &str) -> bool;
    fn send_backward_values<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>;
    fn send_backward_values_from_map(&self, map: &HashMap<String, String>) -> bool;
    fn all_backward_values_to_send(&self) -> HashMap<String, String>;
}

impl MaybeContext for Option<Context> {
    fn transfer_forward(&self) -> Self {
        self.as_ref().map(Context::transfer_forward)
    }

    fn with_value(&self, key: &str, value: &str) -> Self {
        self.as_ref().map(|ctx| ctx.with_value(key, value))
    }

    fn with_values<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.as_ref().map(|ctx| ctx.with_values(pairs))
    }

    fn get_value(&self, key: &str) -> Option<&str> {
        self.as_ref()?.get_value(key)
    }

    fn del_value(&self, key: &str) -> Self {
        self.as_ref().map(|ctx| ctx.del_value(key))
    }

    fn get_all_values(&self) -> HashMap<String, String> {
        self.as_ref()
            .map(Context::get_all_values)
            .unwrap_or_default()
    }

    fn range_values<F>(&self, visit: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        if let Some(ctx) = self {
            ctx.range_values(visit);
        }
    }

    fn count_values(&self) -> usize {
        self.as_ref().map_or(0, Context::count_values)
    }

    fn with_persistent_value(&self, key: &str, value: &str) -> Self {
        self.as_ref()
            .map(|ctx| ctx.with_persistent_value(key, value))
    }

    fn with_persistent_values<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.as_ref().map(|ctx| ctx.with_persistent_values(pairs))
    }

    fn get_persistent_value(&self, key: &str) -> Option<&str> {
        self.as_ref()?.get_persistent_value(key)
    }

    fn del_persistent_value(&self, key: &str) -> Self {
        self.as_ref().map(|ctx| ctx.del_persistent_value(key))
    }

    fn get_all_persistent_values(&self) -> HashMap<String, String> {
        self.as_ref()
            .map(Context::get_all_persistent_values)
            .unwrap_or_default()
    }

    fn range_persistent_values<F>(&self, visit: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        if let Some(ctx) = self {
            ctx.range_persistent_values(visit);
        }
    }

    fn count_persistent_values(&self) -> usize {
        self.as_ref().map_or(0, Context::count_persistent_values)
    }

    fn with_backward_values(&self) -> Self {
        self.as_ref().map(Context::with_backward_values)
    }

    fn with_backward_values_to_send(&self) -> Self {
        self.as_ref().map(Context::with_backward_values_to_send)
    }

    fn set_backward_value(&self, key: &str, value: &str) -> bool {
        self.as_ref()
            .is_some_and(|ctx| ctx.set_backward_value(key, value))
    }

    fn set_backward_values<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.as_ref()
            .is_some_and(|ctx| ctx.set_backward_values(pairs))
    }

    fn set_backward_values_from_map(&self, map: &HashMap<String, String>) -> bool {
        self.as_ref()
            .is_some_and(|ctx| ctx.set_backward_values_from_map(map))
    }

    fn get_backward_value(&self, key: &str) -> Option<String> {
        self.as_ref()?.get_backward_value(key)
    }

    fn get_all_backward_values(&self) -> HashMap<String, String> {
        self.as_ref()
            .map(Context::get_all_backward_values)
            .unwrap_or_default()
    }

    fn recv_backward_value(&self, key: &str) -> Option<String> {
        self.as_ref()?.recv_backward_value(key)
    }

    fn recv_all_backward_values(&self) -> HashMap<String, String> {
        self.as_ref()
            .map(Context::recv_all_backward_values)
            .unwrap_or_default()
    }

    fn send_backward_value(&self, key: &str, value: &str) -> bool {
        self.as_ref()
            .is_some_and(|ctx| ctx.send_backward_value(key, value))
    }

    fn send_backward_values<I, K, V>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.as_ref()
            .is_some_and(|ctx| ctx.send_backward_values(pairs))
    }

    fn send_backward_values_from_map(&self, map: &HashMap<String, String>) -> bool {
        self.as_ref()
            .is_some_and(|ctx| ctx.send_backward_values_from_map(map))
    }

    fn all_backward_values_to_send(&self) -> HashMap<String, String> {
        self.as_ref()
            .map(Context::all_backward_values_to_send)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_context_degrades_to_zero_values() {
        let none: Option<Context> = None;

        assert!(none.transfer_forward().is_none());

        assert_eq!(none.get_value("any"), None);
        assert!(none.get_all_values().is_empty());
        assert!(none.with_value("any", "any").is_none());
        assert!(none.with_values([("a", "1"), ("b", "2")]).is_none());
        assert!(none.del_value("any").is_none());
        assert_eq!(none.count_values(), 0);
        let mut visited = false;
        none.range_values(|_, _| {
            visited = true;
            true
        });
        assert!(!visited);

        assert_eq!(none.get_persistent_value("any"), None);
        assert!(none.get_all_persistent_values().is_empty());
        assert!(none.with_persistent_value("any", "any").is_none());
        assert!(none.with_persistent_values([("a", "1")]).is_none());
        assert_eq!(none.count_persistent_values(), 0);
        assert!(none.del_persistent_value("any").is_none());
        none.range_persistent_values(|_, _| {
            visited = true;
            true
        });
        assert!(!visited);

        assert!(none.with_backward_values().is_none());
        assert!(none.with_backward_values_to_send().is_none());
        assert!(!none.set_backward_value("any", "any"));
        assert!(!none.send_backward_value("any", "any"));
        let pairs = HashMap::from([("any".to_owned(), "any".to_owned())]);
        assert!(!none.set_backward_values([("a", "1")]));
        assert!(!none.set_backward_values_from_map(&pairs));
        assert!(!none.send_backward_values([("a", "1")]));
        assert!(!none.send_backward_values_from_map(&pairs));
        assert_eq!(none.get_backward_value("any"), None);
        assert_eq!(none.recv_backward_value("any"), None);
        assert!(none.get_all_backward_values().is_empty());
        assert!(none.recv_all_backward_values().is_empty());
        assert!(none.all_backward_values_to_send().is_empty());
    }

    #[test]
    fn present_context_delegates() {
        let ctx = Some(Context::background())
            .with_value("t", "1")
            .with_persistent_value("p", "2")
            .with_backward_values()
            .with_backward_values_to_send();
        assert_eq!(ctx.get_value("t"), Some("1"));
        assert_eq!(ctx.get_persistent_value("p"), Some("2"));
        assert!(ctx.set_backward_value("b", "3"));
        assert!(ctx.send_backward_value("s", "4"));
        assert_eq!(ctx.get_backward_value("b"), Some("3".to_owned()));
        assert_eq!(ctx.all_backward_values_to_send()["s"], "4");

        let ctx = ctx
            .with_values([("u", "5"), ("v", "6")])
            .with_persistent_values([("q", "7")]);
        assert_eq!(ctx.count_values(), 3);
        assert_eq!(ctx.count_persistent_values(), 2);
        assert!(ctx.set_backward_values([("c", "8")]));
        assert!(ctx.set_backward_values_from_map(&HashMap::from([(
            "d".to_owned(),
            "9".to_owned()
        )])));
        assert_eq!(ctx.recv_backward_value("c"), Some("8".to_owned()));
        assert_eq!(ctx.recv_all_backward_values().len(), 3);
        assert!(ctx.send_backward_values([("t", "10")]));
        assert!(ctx.send_backward_values_from_map(&HashMap::from([(
            "w".to_owned(),
            "11".to_owned()
        )])));
        assert_eq!(ctx.all_backward_values_to_send().len(), 3);

        let ctx = ctx.del_value("t").transfer_forward();
        assert_eq!(ctx.get_value("t"), None);
        assert_eq!(ctx.get_all_persistent_values().len(), 1);
    }
}
