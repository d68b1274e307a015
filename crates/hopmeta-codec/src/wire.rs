use std::collections::HashMap;

use hopmeta_context::Context;
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::error::CodecResult;

/// Kind of a tagged wire entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// Transit values written since the last hop.
    Transit,
    /// Transit values that already crossed one hop.
    Upstream,
    Persistent,
    Backward,
}

/// Converts context metadata to and from flat tagged maps.
///
/// Each entry's key is the kind's tag followed by the metadata key, so a
/// single map can carry every kind and decoding never has to guess. Entries
/// without a known tag are left for other layers of the transport.
#[derive(Clone, Debug, Default)]
pub struct MetaCodec {
    config: CodecConfig,
}

impl WireKind {
    pub const ALL: [WireKind; 4] = [
        WireKind::Transit,
        WireKind::Upstream,
        WireKind::Persistent,
        WireKind::Backward,
    ];
}

impl MetaCodec {
    /// Create a codec after validating `config`.
    pub fn new(config: CodecConfig) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn prefix(&self, kind: WireKind) -> &str {
        match kind {
            WireKind::Transit => &self.config.transit_prefix,
            WireKind::Upstream => &self.config.upstream_prefix,
            WireKind::Persistent => &self.config.persistent_prefix,
            WireKind::Backward => &self.config.backward_prefix,
        }
    }

    /// The wire key for `key` of the given kind.
    pub fn tag(&self, kind: WireKind, key: &str) -> String {
        let prefix = self.prefix(kind);
        let mut tagged = String::with_capacity(prefix.len() + key.len());
        tagged.push_str(prefix);
        tagged.push_str(key);
        tagged
    }

    /// Split a wire key into its kind and metadata key.
    ///
    /// Returns `None` for untagged keys and for keys that consist of a tag
    /// alone.
    pub fn classify<'k>(&self, wire_key: &'k str) -> Option<(WireKind, &'k str)> {
        WireKind::ALL
            .into_iter()
            .find_map(|kind| {
                wire_key
                    .strip_prefix(self.prefix(kind))
                    .filter(|key| !key.is_empty())
                    .map(|key| (kind, key))
            })
    }

    /// Write the visible transit and persistent values of `ctx` into `map`.
    ///
    /// Transit values keep their generation: those from the aged generation
    /// are tagged as upstream so the receiver drops them at its next hop.
    pub fn save_meta_info_to_map(&self, ctx: &Context, map: &mut HashMap<String, String>) {
        let transit = ctx.transit();
        for (k, v) in transit.current().iter() {
            map.insert(self.tag(WireKind::Transit, k), v.to_owned());
        }
        for (k, v) in transit.iter_upstream() {
            map.insert(self.tag(WireKind::Upstream, k), v.to_owned());
        }
        for (k, v) in ctx.iter_persistent_values() {
            map.insert(self.tag(WireKind::Persistent, k), v.to_owned());
        }
    }

    /// Derive a context from `ctx` carrying every tagged forward entry of
    /// `map`.
    ///
    /// Each forward kind is applied as one batch. Backward, untagged and
    /// unrecognized entries are ignored.
    pub fn set_meta_info_from_map(&self, ctx: &Context, map: &HashMap<String, String>) -> Context {
        let mut transit = Vec::new();
        let mut upstream = Vec::new();
        let mut persistent = Vec::new();
        let mut ignored = 0usize;
        for (wire_key, value) in map {
            match self.classify(wire_key) {
                Some((WireKind::Transit, key)) => transit.push((key, value.as_str())),
                Some((WireKind::Upstream, key)) => upstream.push((key, value.as_str())),
                Some((WireKind::Persistent, key)) => persistent.push((key, value.as_str())),
                Some((WireKind::Backward, _)) | None => ignored += 1,
            }
        }
        if ignored > 0 {
            trace!(ignored, "wire entries without a forward tag skipped");
        }
        debug!(
            transit = transit.len(),
            upstream = upstream.len(),
            persistent = persistent.len(),
            "decoded metadata from wire map"
        );
        ctx.with_upstream_values(upstream)
            .with_values(transit)
            .with_persistent_values(persistent)
    }

    /// Drain a snapshot of the values `ctx` queued for its caller into `map`.
    pub fn save_backward_values_to_map(&self, ctx: &Context, map: &mut HashMap<String, String>) {
        for (k, v) in ctx.all_backward_values_to_send() {
            map.insert(self.tag(WireKind::Backward, &k), v);
        }
    }

    /// Record the backward entries of an inbound `map` in the receive
    /// container of `ctx`.
    ///
    /// Returns `false` when `ctx` has no receive container.
    pub fn recv_backward_values_from_map(
        &self,
        ctx: &Context,
        map: &HashMap<String, String>,
    ) -> bool {
        let pairs = map.iter().filter_map(|(wire_key, value)| {
            match self.classify(wire_key) {
                Some((WireKind::Backward, key)) => Some((key, value.as_str())),
                _ => None,
            }
        });
        ctx.set_backward_values(pairs)
    }
}
