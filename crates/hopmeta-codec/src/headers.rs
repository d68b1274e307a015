//! HTTP header carrier.
//!
//! HTTP transports cannot use the wire map directly: header names are
//! case-insensitive and conventionally use `-`. Metadata keys are therefore
//! written as header names in lowercase with `_` turned into `-`, and read
//! back in the CGI variable style (`rpc-transit-abc-def` yields `ABC_DEF`).
//! Only keys already in that style survive a round trip unchanged.

use std::collections::HashMap;

use hopmeta_context::Context;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::wire::{MetaCodec, WireKind};

/// `abc-def` becomes `ABC_DEF`.
pub fn http_header_to_cgi_variable(key: &str) -> String {
    key.replace('-', "_").to_ascii_uppercase()
}

/// `ABC_DEF` becomes `abc-def`.
pub fn cgi_variable_to_http_header(key: &str) -> String {
    key.replace('_', "-").to_ascii_lowercase()
}

impl MetaCodec {
    fn header_prefix(&self, kind: WireKind) -> &str {
        let config = self.config();
        match kind {
            WireKind::Transit => &config.http_transit_prefix,
            WireKind::Upstream => &config.http_upstream_prefix,
            WireKind::Persistent => &config.http_persistent_prefix,
            WireKind::Backward => &config.http_backward_prefix,
        }
    }

    fn insert_header<'a, I>(&self, kind: WireKind, pairs: I, headers: &mut HeaderMap)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let prefix = self.header_prefix(kind);
        for (key, value) in pairs {
            let name = format!("{prefix}{}", cgi_variable_to_http_header(key));
            let name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    debug!(?kind, %key, "key is not a valid header name; skipped");
                    continue;
                }
            };
            let value = match HeaderValue::from_str(value) {
                Ok(value) => value,
                Err(_) => {
                    debug!(?kind, %key, "value is not a valid header value; skipped");
                    continue;
                }
            };
            headers.insert(name, value);
        }
    }

    fn extract_headers<'h>(&self, kind: WireKind, headers: &'h HeaderMap) -> Vec<(String, &'h str)> {
        let prefix = self.header_prefix(kind);
        headers
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix(prefix)?;
                if key.is_empty() {
                    return None;
                }
                match value.to_str() {
                    Ok(value) => Some((http_header_to_cgi_variable(key), value)),
                    Err(_) => {
                        debug!(?kind, header = %name, "non-visible ASCII header value; skipped");
                        None
                    }
                }
            })
            .collect()
    }

    /// Write the visible transit and persistent values of `ctx` as headers.
    pub fn to_http_header(&self, ctx: &Context, headers: &mut HeaderMap) {
        let transit = ctx.transit();
        self.insert_header(WireKind::Transit, transit.current().iter(), headers);
        self.insert_header(WireKind::Upstream, transit.iter_upstream(), headers);
        self.insert_header(WireKind::Persistent, ctx.iter_persistent_values(), headers);
    }

    /// Derive a context from `ctx` carrying the metadata headers of an
    /// inbound request.
    pub fn from_http_header(&self, ctx: &Context, headers: &HeaderMap) -> Context {
        let transit = self.extract_headers(WireKind::Transit, headers);
        let upstream = self.extract_headers(WireKind::Upstream, headers);
        let persistent = self.extract_headers(WireKind::Persistent, headers);
        ctx.with_upstream_values(upstream)
            .with_values(transit)
            .with_persistent_values(persistent)
    }

    /// Write the values `ctx` queued for its caller as response headers.
    pub fn backward_values_to_http_header(&self, ctx: &Context, headers: &mut HeaderMap) {
        let values: HashMap<String, String> = ctx.all_backward_values_to_send();
        self.insert_header(
            WireKind::Backward,
            values.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            headers,
        );
    }

    /// Record the backward headers of a response in the receive container
    /// of `ctx`. Returns `false` when `ctx` has no receive container.
    pub fn recv_backward_values_from_http_header(&self, ctx: &Context, headers: &HeaderMap) -> bool {
        ctx.set_backward_values(self.extract_headers(WireKind::Backward, headers))
    }
}
