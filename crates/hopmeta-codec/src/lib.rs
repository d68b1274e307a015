//! Wire codecs for hopmeta request contexts.
//!
//! The transport calls into this crate at process boundaries:
//!
//! - before sending a request, [`save_meta_info_to_map`] flattens the forward
//!   metadata of a context into tagged string pairs;
//! - on receiving one, [`set_meta_info_from_map`] rebuilds a context from
//!   them;
//! - on the way back, [`save_backward_values_to_map`] and
//!   [`recv_backward_values_from_map`] carry backward values from the
//!   callee's send container into the caller's receive container.
//!
//! The [`headers`] module offers the same operations over an
//! [`http::HeaderMap`]. Tags are configurable through [`CodecConfig`]; the
//! free functions use the defaults.
//!
//! # Modules
//!
//! - [`config`] — [`CodecConfig`] and the default tags
//! - [`error`] — [`CodecError`] for invalid configurations
//! - [`wire`] — [`MetaCodec`] over flat maps
//! - [`headers`] — [`MetaCodec`] over HTTP headers

pub mod config;
pub mod error;
pub mod headers;
pub mod wire;

use std::collections::HashMap;
use std::sync::LazyLock;

use hopmeta_context::Context;

pub use config::CodecConfig;
pub use error::{CodecError, CodecResult};
pub use headers::{cgi_variable_to_http_header, http_header_to_cgi_variable};
pub use wire::{MetaCodec, WireKind};

static DEFAULT_CODEC: LazyLock<MetaCodec> = LazyLock::new(MetaCodec::default);

/// The codec with the default tags.
pub fn default_codec() -> &'static MetaCodec {
    &DEFAULT_CODEC
}

/// See [`MetaCodec::save_meta_info_to_map`].
pub fn save_meta_info_to_map(ctx: &Context, map: &mut HashMap<String, String>) {
    DEFAULT_CODEC.save_meta_info_to_map(ctx, map)
}

/// See [`MetaCodec::set_meta_info_from_map`].
pub fn set_meta_info_from_map(ctx: &Context, map: &HashMap<String, String>) -> Context {
    DEFAULT_CODEC.set_meta_info_from_map(ctx, map)
}

/// See [`MetaCodec::save_backward_values_to_map`].
pub fn save_backward_values_to_map(ctx: &Context, map: &mut HashMap<String, String>) {
    DEFAULT_CODEC.save_backward_values_to_map(ctx, map)
}

/// See [`MetaCodec::recv_backward_values_from_map`].
pub fn recv_backward_values_from_map(ctx: &Context, map: &HashMap<String, String>) -> bool {
    DEFAULT_CODEC.recv_backward_values_from_map(ctx, map)
}

/// See [`MetaCodec::to_http_header`].
pub fn to_http_header(ctx: &Context, headers: &mut http::HeaderMap) {
    DEFAULT_CODEC.to_http_header(ctx, headers)
}

/// See [`MetaCodec::from_http_header`].
pub fn from_http_header(ctx: &Context, headers: &http::HeaderMap) -> Context {
    DEFAULT_CODEC.from_http_header(ctx, headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codec_uses_default_tags() {
        assert_eq!(default_codec().config(), &CodecConfig::default());
        assert!(std::ptr::eq(default_codec(), default_codec()));

        let ctx = Context::background().with_value("k", "v");
        let mut map = HashMap::new();
        save_meta_info_to_map(&ctx, &mut map);
        assert_eq!(map[&default_codec().tag(WireKind::Transit, "k")], "v");
    }
}
