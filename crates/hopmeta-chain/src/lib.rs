//! Layered value chain for hopmeta.
//!
//! A [`Chain`] is an immutable, append-only key/value store. Every write
//! pushes a new layer that points at its parent, so older chains keep seeing
//! exactly what they saw when they were created. Deletion writes a tombstone
//! instead of removing anything.
//!
//! # Rules
//!
//! 1. Layers are never mutated after construction; reads need no locking.
//! 2. Keys and values are non-empty; writes with an empty side are no-ops.
//! 3. The newest decision for a key wins, whether it binds or deletes.
//! 4. Chains are never compacted; memory is reclaimed when the last chain
//!    referencing a layer is dropped.
//!
//! # Modules
//!
//! - [`entry`] — [`Entry`]: one binding or tombstone
//! - [`chain`] — [`Chain`]: writes, point lookups, snapshots
//! - [`iter`] — lazy [`Iter`] and [`Decisions`] walks

pub mod chain;
pub mod entry;
pub mod iter;

pub use chain::Chain;
pub use entry::Entry;
pub use iter::{Decisions, Iter};

#[cfg(test)]
mod proptests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::Chain;

    #[derive(Clone, Debug)]
    enum Op {
        Put(String, String),
        Batch(Vec<(String, String)>),
        Delete(String),
    }

    fn key() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-e]"]
    }

    fn value() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[0-9]{1,3}"]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (key(), value()).prop_map(|(k, v)| Op::Put(k, v)),
            prop::collection::vec((key(), value()), 0..4).prop_map(Op::Batch),
            key().prop_map(Op::Delete),
        ]
    }

    fn apply(model: &mut HashMap<String, String>, k: &str, v: &str) {
        if !k.is_empty() && !v.is_empty() {
            model.insert(k.to_owned(), v.to_owned());
        }
    }

    proptest! {
        #[test]
        fn chain_matches_map_model(ops in prop::collection::vec(op(), 0..40)) {
            let mut chain = Chain::new();
            let mut model = HashMap::new();
            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        apply(&mut model, &k, &v);
                        chain = chain.put(k, v);
                    }
                    Op::Batch(pairs) => {
                        for (k, v) in &pairs {
                            apply(&mut model, k, v);
                        }
                        chain = chain.put_batch(pairs);
                    }
                    Op::Delete(k) => {
                        model.remove(&k);
                        chain = chain.delete(k);
                    }
                }
            }
            prop_assert_eq!(chain.aggregate_all(), model.clone());
            prop_assert_eq!(chain.len_visible(), model.len());
            for k in ["a", "b", "c", "d", "e", ""] {
                prop_assert_eq!(chain.get(k), model.get(k).map(String::as_str));
            }
        }
    }
}
