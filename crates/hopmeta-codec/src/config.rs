use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Wire tag for transit entries.
pub const TRANSIT_PREFIX: &str = "RPC_TRANSIT_";
/// Wire tag for transit entries that already crossed one hop.
pub const UPSTREAM_PREFIX: &str = "RPC_UPSTREAM_";
/// Wire tag for persistent entries.
pub const PERSISTENT_PREFIX: &str = "RPC_PERSIST_";
/// Wire tag for backward entries.
pub const BACKWARD_PREFIX: &str = "RPC_BACKWARD_";

/// Header name prefix for transit entries.
pub const HTTP_TRANSIT_PREFIX: &str = "rpc-transit-";
/// Header name prefix for transit entries that already crossed one hop.
pub const HTTP_UPSTREAM_PREFIX: &str = "rpc-upstream-";
/// Header name prefix for persistent entries.
pub const HTTP_PERSISTENT_PREFIX: &str = "rpc-persist-";
/// Header name prefix for backward entries.
pub const HTTP_BACKWARD_PREFIX: &str = "rpc-backward-";

/// Tags used to mark the kind of each entry on the wire.
///
/// Every field may be omitted from a TOML source; missing fields take the
/// default tags.
///
/// ```
/// use hopmeta_codec::CodecConfig;
///
/// let config = CodecConfig::from_toml_str(r#"transit_prefix = "X_HOP_""#).unwrap();
/// assert_eq!(config.transit_prefix, "X_HOP_");
/// assert_eq!(config.persistent_prefix, "RPC_PERSIST_");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub transit_prefix: String,
    pub upstream_prefix: String,
    pub persistent_prefix: String,
    pub backward_prefix: String,
    pub http_transit_prefix: String,
    pub http_upstream_prefix: String,
    pub http_persistent_prefix: String,
    pub http_backward_prefix: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            transit_prefix: TRANSIT_PREFIX.to_owned(),
            upstream_prefix: UPSTREAM_PREFIX.to_owned(),
            persistent_prefix: PERSISTENT_PREFIX.to_owned(),
            backward_prefix: BACKWARD_PREFIX.to_owned(),
            http_transit_prefix: HTTP_TRANSIT_PREFIX.to_owned(),
            http_upstream_prefix: HTTP_UPSTREAM_PREFIX.to_owned(),
            http_persistent_prefix: HTTP_PERSISTENT_PREFIX.to_owned(),
            http_backward_prefix: HTTP_BACKWARD_PREFIX.to_owned(),
        }
    }
}

impl CodecConfig {
    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(source: &str) -> CodecResult<Self> {
        let config: CodecConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tag is non-empty and that no tag of a family is a
    /// prefix of another tag in the same family.
    pub fn validate(&self) -> CodecResult<()> {
        let wire = [
            ("transit_prefix", &self.transit_prefix),
            ("upstream_prefix", &self.upstream_prefix),
            ("persistent_prefix", &self.persistent_prefix),
            ("backward_prefix", &self.backward_prefix),
        ];
        let headers = [
            ("http_transit_prefix", &self.http_transit_prefix),
            ("http_upstream_prefix", &self.http_upstream_prefix),
            ("http_persistent_prefix", &self.http_persistent_prefix),
            ("http_backward_prefix", &self.http_backward_prefix),
        ];
        check_family(&wire)?;
        check_family(&headers)?;

        for (_, prefix) in headers {
            let lowercase = !prefix.bytes().any(|b| b.is_ascii_uppercase());
            if !lowercase || http::HeaderName::from_bytes(prefix.as_bytes()).is_err() {
                return Err(CodecError::InvalidHeaderPrefix {
                    prefix: prefix.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_family(tags: &[(&'static str, &String)]) -> CodecResult<()> {
    for &(field, tag) in tags {
        if tag.is_empty() {
            return Err(CodecError::EmptyTag { field });
        }
    }
    for (i, (_, first)) in tags.iter().enumerate() {
        for (_, second) in &tags[i + 1..] {
            if first.starts_with(second.as_str()) || second.starts_with(first.as_str()) {
                return Err(CodecError::AmbiguousTags {
                    first: (*first).clone(),
                    second: (*second).clone(),
                });
            }
        }
    }
    Ok(())
}
