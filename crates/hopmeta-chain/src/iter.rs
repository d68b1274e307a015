use std::collections::HashSet;

use crate::chain::{Chain, Layer};

/// Newest decision per key, walking head to root.
///
/// Yields `(key, Some(value))` for bindings and `(key, None)` for
/// tombstones. Each key is produced at most once. When built with a `base`
/// chain, the walk continues into it after the top chain is exhausted and
/// keys already decided above are skipped.
pub struct Decisions<'a> {
    layer: Option<&'a Layer>,
    // Entries of `layer` not yet visited, consumed from the back.
    remaining: usize,
    base: Option<&'a Chain>,
    seen: HashSet<&'a str>,
}

impl<'a> Decisions<'a> {
    pub(crate) fn new(top: &'a Chain, base: Option<&'a Chain>) -> Self {
        let layer = top.head();
        Self {
            layer,
            remaining: layer.map_or(0, |l| l.entries.len()),
            base,
            seen: HashSet::new(),
        }
    }

    fn enter(&mut self, layer: Option<&'a Layer>) {
        self.layer = layer;
        self.remaining = layer.map_or(0, |l| l.entries.len());
    }
}

impl<'a> Iterator for Decisions<'a> {
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let layer = match self.layer {
                Some(layer) => layer,
                None => {
                    let base = self.base.take()?;
                    self.enter(base.head());
                    continue;
                }
            };
            if self.remaining == 0 {
                self.enter(layer.parent.as_deref());
                continue;
            }
            self.remaining -= 1;
            let entry = &layer.entries[self.remaining];
            if self.seen.insert(entry.key()) {
                return Some((entry.key(), entry.value()));
            }
        }
    }
}

/// Visible `(key, value)` pairs of a chain, tombstoned keys skipped.
pub struct Iter<'a> {
    decisions: Decisions<'a>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(decisions: Decisions<'a>) -> Self {
        Self { decisions }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.decisions
            .by_ref()
            .find_map(|(k, v)| v.map(|v| (k, v)))
    }
}
