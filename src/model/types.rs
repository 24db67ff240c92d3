//! Snapshot entity definitions.
//!
//! This module defines the complete structure of one rendered proxy
//! configuration. All types derive Serde traits because snapshots arrive as
//! rendered JSON documents produced by the configuration builder.

use serde::{Deserialize, Serialize};

use crate::model::policies::{
    BasicDigestAuth, CertificateAuth, ConnectionSettings, CorsPolicy, ExternalAuth, IpAllowList,
    ProxySettings, RateLimit, Redirect, Rewrite,
};

/// Root snapshot of one generated proxy configuration.
///
/// `backends` is an unordered collection; `servers` is sorted by hostname by
/// the builder before the snapshot is handed over.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    /// Routing targets referenced by name from server locations.
    pub backends: Vec<Backend>,

    /// Virtual hosts, in builder-defined canonical order.
    pub servers: Vec<Server>,
}

/// Identity tuple of a namespaced upstream resource captured at build time.
///
/// A changed `resource_version` is the only reliable signal that the
/// referenced object's content changed; the object itself is never consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceRef {
    pub namespace: String,
    pub name: String,
    pub resource_version: String,
}

/// Identity tuple of an ephemeral per-connection target object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetRef {
    pub uid: String,
    pub resource_version: String,
}

/// A named routing target plus the set of network destinations behind it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Backend {
    /// Unique backend identifier.
    pub name: String,

    /// Weak reference to the backing service, if any.
    pub service: Option<ServiceRef>,

    /// Upstream service port.
    pub port: i32,

    /// Whether traffic to the endpoints uses TLS.
    pub secure: bool,

    /// CA-certificate policy for secure upstream connections.
    pub secure_ca_cert: CertificateAuth,

    /// Pass TLS through to the endpoints without termination.
    pub ssl_passthrough: bool,

    /// Session affinity policy for this backend.
    pub session_affinity: SessionAffinityConfig,

    /// Consistent-hash key for upstream selection, empty when unused.
    pub upstream_hash_by: String,

    /// Concrete destinations; construction order carries no meaning.
    pub endpoints: Vec<Endpoint>,
}

/// One concrete network destination of a backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoint {
    /// Destination address.
    pub address: String,

    /// Destination port, captured verbatim as rendered.
    pub port: String,

    /// Failures tolerated before the destination is marked down.
    pub max_fails: i32,

    /// Seconds a marked-down destination stays excluded.
    pub fail_timeout: i32,

    /// Weak reference to the backing target object, if any.
    pub target: Option<TargetRef>,
}

/// Session affinity policy of a backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionAffinityConfig {
    /// Affinity mode, empty when affinity is disabled.
    pub affinity_type: String,

    /// Cookie settings used when the mode is cookie-based.
    pub cookie_session_affinity: CookieSessionAffinity,
}

/// Cookie settings for cookie-based session affinity.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieSessionAffinity {
    pub name: String,
    pub hash: String,
}

/// One virtual host of the generated configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Server {
    /// Primary hostname served by this virtual host.
    pub hostname: String,

    /// Additional hostname alias, empty when unused.
    pub alias: String,

    /// Pass TLS through without termination.
    pub ssl_passthrough: bool,

    /// Path of the certificate file presented for this host.
    pub ssl_certificate: String,

    /// Checksum of the certificate PEM content.
    pub ssl_pem_checksum: String,

    /// Path of the full-chain certificate file, empty when unused.
    pub ssl_full_chain_certificate: String,

    /// Cipher policy string, empty for the proxy default.
    pub ssl_ciphers: String,

    /// Client-certificate authentication policy.
    pub certificate_auth: CertificateAuth,

    /// Redirect between the bare and www form of the hostname.
    pub redirect_from_to_www: bool,

    /// Path rules, in builder-defined canonical order.
    pub locations: Vec<Location>,
}

/// One path-routing rule within a server.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Location {
    /// Request path this rule matches.
    pub path: String,

    /// Whether this rule routes to the catch-all default backend.
    pub is_default_backend: bool,

    /// Name of the backend receiving matched traffic.
    pub backend: String,

    /// Weak reference to the backing service, if any.
    pub service: Option<ServiceRef>,

    /// Service port selector, captured verbatim as rendered.
    pub port: String,

    /// Reason access is denied, when the rule is blocked.
    pub denied: Option<String>,

    pub basic_digest_auth: BasicDigestAuth,
    pub cors: CorsPolicy,
    pub external_auth: ExternalAuth,
    pub rate_limit: RateLimit,
    pub redirect: Redirect,
    pub rewrite: Rewrite,
    pub allow_list: IpAllowList,
    pub proxy: ProxySettings,
    pub connection: ConnectionSettings,

    /// Keep the port in redirect Location headers.
    pub use_port_in_redirects: bool,

    /// Free-form configuration snippet appended to the rendered rule.
    pub configuration_snippet: String,

    /// Client body buffer size override, empty for the proxy default.
    pub client_body_buffer_size: String,

    /// Host header override for upstream requests, empty when unused.
    pub upstream_vhost: String,

    /// Add an X-Forwarded-Prefix header on upstream requests.
    pub x_forwarded_prefix: bool,
}

/// A certificate file together with its captured identity.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CertificateBundle {
    /// Path of the PEM file on disk.
    pub pem_file_name: String,

    /// Checksum of the PEM content.
    pub pem_sha: String,

    /// Expiry instant as Unix seconds, captured at build time.
    pub expires: i64,

    /// Subject common names; construction order carries no meaning.
    pub common_names: Vec<String>,
}
