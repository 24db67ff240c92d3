//! Per-location and per-server policy value objects.
//!
//! # Responsibilities
//! - Define the nested policy settings referenced from snapshot entities
//! - Expose each policy's own equivalence check for the entity comparators
//!
//! # Design Decisions
//! - Policies are plain value objects; the entity comparators treat them as
//!   opaque delegates and never inspect individual fields
//! - Most policies compare field-for-field; the source-IP allow list is the
//!   one policy whose collection is order-insensitive

use serde::{Deserialize, Serialize};

use crate::model::equality::{unordered_eq, Equivalence};

/// Basic or digest authentication applied to a location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BasicDigestAuth {
    /// Scheme, `basic` or `digest`; empty when disabled.
    pub auth_type: String,
    pub realm: String,

    /// Path of the rendered credential file.
    pub file: String,

    /// Checksum of the credential file content.
    pub file_sha: String,

    /// Whether the credential secret resolved successfully.
    pub secured: bool,
}

/// Cross-origin resource sharing settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsPolicy {
    pub enabled: bool,
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub allow_credentials: bool,
    pub max_age: i32,
}

/// Authentication delegated to an external endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExternalAuth {
    pub url: String,
    pub host: String,
    pub signin_url: String,
    pub method: String,
    pub send_body: bool,

    /// Headers copied from the auth response onto the proxied request.
    pub response_headers: Vec<String>,
}

/// One shared-memory rate-limit zone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitZone {
    pub name: String,
    pub limit: i32,
    pub burst: i32,

    /// Zone size in megabytes.
    pub shared_size: i32,
}

/// Request and connection rate limiting for a location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimit {
    pub connections: RateLimitZone,
    pub rps: RateLimitZone,
    pub rpm: RateLimitZone,

    /// Bandwidth cap in kilobytes per second, zero when unlimited.
    pub limit_rate: i32,

    /// Bytes served before the bandwidth cap applies.
    pub limit_rate_after: i32,
}

/// Permanent or temporary redirect applied to a location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Redirect {
    pub target: String,
    pub code: i32,
    pub from_to_www: bool,
}

/// Path rewriting applied before the request reaches the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Rewrite {
    pub target: String,
    pub add_base_url: bool,
    pub base_url_scheme: String,
    pub ssl_redirect: bool,
    pub force_ssl_redirect: bool,
    pub app_root: String,
}

/// Source-IP access restriction for a location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IpAllowList {
    /// Permitted source ranges in CIDR notation.
    pub cidrs: Vec<String>,
}

/// Upstream proxying behavior tuning.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    pub body_size: String,
    pub connect_timeout: i32,
    pub send_timeout: i32,
    pub read_timeout: i32,
    pub buffers_number: i32,
    pub buffer_size: String,
    pub cookie_domain: String,
    pub cookie_path: String,

    /// Conditions under which a request moves to the next upstream.
    pub next_upstream: String,
    pub request_buffering: String,
}

/// Client connection header handling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub enabled: bool,
    pub header: String,
}

/// Certificate-authority policy used for client or upstream verification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CertificateAuth {
    /// Namespaced name of the secret the CA bundle came from.
    pub secret: String,

    /// Path of the rendered CA file.
    pub ca_file_name: String,

    /// Checksum of the CA file content.
    pub pem_sha: String,

    /// Certificate chain verification depth.
    pub validation_depth: i32,

    /// Page served on verification failure, empty for the bare status.
    pub error_page: String,

    /// Forward the verified client certificate to the upstream.
    pub pass_cert_to_upstream: bool,
}

impl Equivalence for BasicDigestAuth {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for CorsPolicy {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for ExternalAuth {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for RateLimit {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for Redirect {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for Rewrite {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for IpAllowList {
    /// CIDR order is a product of annotation parsing, not semantics.
    fn equivalent(&self, other: &Self) -> bool {
        unordered_eq(&self.cidrs, &other.cidrs)
    }
}

impl Equivalence for ProxySettings {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for ConnectionSettings {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for CertificateAuth {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}
