//! Configuration → snapshot projection.
//!
//! # Data Flow
//! ```text
//! ServiceConfig
//!     → service flags (TLS, debug, legacy fields folded into shared bits)
//!     → async agents  → backends → components.rs
//!     → endpoints     → backends → components.rs
//!     → extra_config  → components.rs
//!     → Service snapshot
//! ```
//!
//! # Design Decisions
//! - Pure function, no I/O, never fails
//! - Mistyped or unknown extension settings degrade to empty/zero values
//! - Deprecated and current forms of the same setting set the same bit

pub mod components;
pub mod duration;

use crate::config::schema::{
    AsyncAgentConfig, BackendConfig, EndpointConfig, ServiceConfig, DEFAULT_ENCODING,
    DEFAULT_METHOD,
};
use crate::snapshot::bits::{
    with_bit, AgentIndex, BackendFlag, Encoding, ServiceFlag, WildcardFlag,
};
use crate::snapshot::namespaces as ns;
use crate::snapshot::{Agent, Backend, Endpoint, Service};

pub use components::parse_components;
pub use duration::parse_duration_ms;

/// Path literal the gateway reserves for its catch-all endpoint.
pub const CATCH_ALL_PATH: &str = "/__catchall";

/// Build the snapshot of a configuration.
///
/// # Preconditions
/// `cfg` should come from [`load_config`](crate::config::load_config),
/// [`from_json_str`](crate::config::from_json_str) or have had
/// [`normalize`](ServiceConfig::normalize) applied, so inherited defaults are
/// filled in. A backend with no method is still read as `GET`.
pub fn parse(cfg: &ServiceConfig) -> Service {
    let service = Service {
        flags: vec![service_flags(cfg)],
        agents: cfg.async_agent.iter().map(parse_agent).collect(),
        endpoints: cfg.endpoints.iter().map(parse_endpoint).collect(),
        components: parse_components(&cfg.extra_config),
    };

    tracing::debug!(
        endpoints = service.endpoints.len(),
        agents = service.agents.len(),
        components = service.components.len(),
        "Configuration projected"
    );
    service
}

fn service_flags(cfg: &ServiceConfig) -> i64 {
    let mut flags = 0;
    let mut set = |condition: bool, flag: ServiceFlag| {
        if condition {
            flags = with_bit(flags, flag as u32);
        }
    };

    set(cfg.plugin.is_some(), ServiceFlag::Plugin);
    set(cfg.sequential_start, ServiceFlag::SequentialStart);
    set(cfg.debug_endpoint, ServiceFlag::Debug);
    // the global flag is the deprecated form of client_tls.allow_insecure_connections
    set(
        cfg.allow_insecure_connections
            || cfg
                .client_tls
                .as_ref()
                .is_some_and(|tls| tls.allow_insecure_connections),
        ServiceFlag::AllowInsecureConnections,
    );
    set(cfg.disable_rest, ServiceFlag::DisableStrictRest);

    if let Some(tls) = &cfg.tls {
        set(true, ServiceFlag::HasTls);
        set(!tls.disabled, ServiceFlag::TlsEnabled);
        set(tls.enable_mtls, ServiceFlag::TlsMutualAuth);
        set(tls.disable_system_ca_pool, ServiceFlag::TlsDisableSystemCaPool);
        set(!tls.ca_certs.is_empty(), ServiceFlag::TlsCaCerts);
        set(
            !tls.public_key.is_empty() || !tls.private_key.is_empty(),
            ServiceFlag::TlsRawKeyFiles,
        );
    }

    set(cfg.echo_endpoint, ServiceFlag::Echo);
    set(cfg.use_h2c, ServiceFlag::UseH2c);
    flags
}

fn timeout_ms(timeout: Option<&str>) -> i64 {
    timeout.and_then(parse_duration_ms).unwrap_or(0)
}

fn parse_agent(agent: &AsyncAgentConfig) -> Agent {
    let mut flags = [0; AgentIndex::LEN];
    flags[AgentIndex::Encoding as usize] = Encoding::from_name(&agent.encoding).bits();
    flags[AgentIndex::Workers as usize] = agent.consumer.workers;
    flags[AgentIndex::MaxRetries as usize] = agent.connection.max_retries;
    flags[AgentIndex::TimeoutMs as usize] = timeout_ms(agent.consumer.timeout.as_deref());

    Agent {
        flags: flags.to_vec(),
        backends: agent.backend.iter().map(parse_backend).collect(),
        components: parse_components(&agent.extra_config),
    }
}

fn wildcards(endpoint: &EndpointConfig) -> i64 {
    let mut bits = 0;
    if endpoint.endpoint.ends_with('*') {
        bits = with_bit(bits, WildcardFlag::Path as u32);
    }
    if endpoint.input_query_strings.iter().any(|q| q == "*") {
        bits = with_bit(bits, WildcardFlag::QueryString as u32);
    }
    if endpoint.input_headers.iter().any(|h| h == "*") {
        bits = with_bit(bits, WildcardFlag::Headers as u32);
    }
    if endpoint.endpoint == CATCH_ALL_PATH {
        bits = with_bit(bits, WildcardFlag::CatchAll as u32);
    }
    bits
}

/// A backend call that is not a plain idempotent read.
///
/// gRPC backends count as unsafe even behind GET/HEAD since the call may
/// stream in both directions. An empty method is the `GET` default.
fn is_unsafe_call(backend: &BackendConfig) -> bool {
    let method = match backend.method.trim() {
        "" => DEFAULT_METHOD,
        method => method,
    };
    let safe_method = ["GET", "HEAD"]
        .iter()
        .any(|m| method.eq_ignore_ascii_case(m));
    !safe_method || backend.extra_config.contains_key(ns::BACKEND_GRPC)
}

fn parse_endpoint(endpoint: &EndpointConfig) -> Endpoint {
    let unsafe_methods = endpoint.backend.iter().filter(|b| is_unsafe_call(b)).count() as i64;
    let encoding = endpoint.output_encoding.as_deref().unwrap_or(DEFAULT_ENCODING);

    Endpoint {
        flags: vec![
            Encoding::from_name(encoding).bits(),
            endpoint.input_query_strings.len() as i64,
            endpoint.input_headers.len() as i64,
            timeout_ms(endpoint.timeout.as_deref()),
            wildcards(endpoint),
            unsafe_methods,
        ],
        backends: endpoint.backend.iter().map(parse_backend).collect(),
        components: parse_components(&endpoint.extra_config),
    }
}

fn parse_backend(backend: &BackendConfig) -> Backend {
    let mut flags = Encoding::from_name(&backend.encoding).bits();
    for (condition, flag) in [
        (!backend.allow.is_empty(), BackendFlag::Allow),
        (!backend.deny.is_empty(), BackendFlag::Deny),
        (!backend.mapping.is_empty(), BackendFlag::Mapping),
        (!backend.group.is_empty(), BackendFlag::Group),
        (!backend.target.is_empty(), BackendFlag::Target),
        (backend.is_collection, BackendFlag::IsCollection),
    ] {
        if condition {
            flags = with_bit(flags, flag as u32);
        }
    }

    Backend {
        flags: vec![flags],
        components: parse_components(&backend.extra_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ClientTlsConfig, PluginConfig, TlsConfig};
    use crate::snapshot::bits::has_bit;
    use serde_json::json;

    #[test]
    fn test_empty_config() {
        let service = parse(&ServiceConfig::default());
        assert_eq!(service.flags, vec![0]);
        assert!(service.endpoints.is_empty());
        assert!(service.agents.is_empty());
        assert!(service.components.is_empty());
    }

    #[test]
    fn test_service_flags() {
        let cfg = ServiceConfig {
            plugin: Some(PluginConfig::default()),
            sequential_start: true,
            debug_endpoint: true,
            disable_rest: true,
            echo_endpoint: true,
            use_h2c: true,
            tls: Some(TlsConfig {
                enable_mtls: true,
                disable_system_ca_pool: true,
                ca_certs: vec!["ca.pem".into()],
                private_key: "key.pem".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let flags = parse(&cfg).service_flags();
        for flag in [
            ServiceFlag::Plugin,
            ServiceFlag::SequentialStart,
            ServiceFlag::Debug,
            ServiceFlag::DisableStrictRest,
            ServiceFlag::HasTls,
            ServiceFlag::TlsEnabled,
            ServiceFlag::TlsMutualAuth,
            ServiceFlag::TlsDisableSystemCaPool,
            ServiceFlag::TlsCaCerts,
            ServiceFlag::Echo,
            ServiceFlag::UseH2c,
            ServiceFlag::TlsRawKeyFiles,
        ] {
            assert!(has_bit(flags, flag as u32), "{flag:?} not set");
        }
        assert!(!has_bit(flags, ServiceFlag::AllowInsecureConnections as u32));
    }

    #[test]
    fn test_tls_disabled_clears_enabled_bit() {
        let cfg = ServiceConfig {
            tls: Some(TlsConfig {
                disabled: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(parse(&cfg).service_flags(), 1 << 5);
    }

    #[test]
    fn test_insecure_connections_both_forms() {
        let legacy = ServiceConfig {
            allow_insecure_connections: true,
            ..Default::default()
        };
        let current = ServiceConfig {
            client_tls: Some(ClientTlsConfig {
                allow_insecure_connections: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(parse(&legacy).service_flags(), 1 << 3);
        assert_eq!(parse(&current).service_flags(), 1 << 3);
    }

    #[test]
    fn test_endpoint_flags() {
        let endpoint = EndpointConfig {
            endpoint: "/foo/*".into(),
            output_encoding: Some("no-op".into()),
            timeout: Some("1500ms".into()),
            input_query_strings: vec!["a".into(), "*".into()],
            input_headers: vec!["*".into()],
            backend: vec![
                BackendConfig {
                    method: "POST".into(),
                    ..Default::default()
                },
                BackendConfig {
                    method: "GET".into(),
                    extra_config: [(ns::BACKEND_GRPC.to_string(), json!({}))].into(),
                    ..Default::default()
                },
                BackendConfig {
                    method: "GET".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let snapshot = parse_endpoint(&endpoint);
        assert_eq!(snapshot.flags, vec![1, 2, 1, 1500, 0b0111, 2]);
        assert_eq!(snapshot.backends.len(), 3);
    }

    #[test]
    fn test_unnormalized_backend_method_is_get() {
        let endpoint = EndpointConfig {
            endpoint: "/raw".into(),
            backend: vec![
                BackendConfig::default(),
                BackendConfig {
                    method: "head".into(),
                    ..Default::default()
                },
                BackendConfig {
                    method: "DELETE".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(parse_endpoint(&endpoint).flag(5), 1);
    }

    #[test]
    fn test_catch_all_endpoint() {
        let endpoint = EndpointConfig {
            endpoint: CATCH_ALL_PATH.into(),
            ..Default::default()
        };
        assert_eq!(parse_endpoint(&endpoint).flag(4), 1 << 3);
    }

    #[test]
    fn test_backend_shape() {
        let backend = BackendConfig {
            encoding: "safejson".into(),
            allow: vec!["a".into()],
            target: "data".into(),
            is_collection: true,
            ..Default::default()
        };
        let expected = (1 << 2) | (1 << 7) | (1 << 11) | (1 << 12);
        assert_eq!(parse_backend(&backend).flags, vec![expected]);
    }

    #[test]
    fn test_agent_flags() {
        let agent: AsyncAgentConfig = serde_json::from_value(json!({
            "name": "a",
            "encoding": "json",
            "consumer": {"topic": "t", "workers": 4, "timeout": "3s"},
            "connection": {"max_retries": 10},
            "backend": [{"url_pattern": "/x"}],
            "extra_config": {"async/amqp": {"name": "q"}}
        }))
        .unwrap();
        let snapshot = parse_agent(&agent);
        assert_eq!(snapshot.flags, vec![2, 4, 10, 3000]);
        assert_eq!(snapshot.flag(AgentIndex::Workers as usize), 4);
        assert_eq!(snapshot.flag(AgentIndex::TimeoutMs as usize), 3000);
        assert_eq!(snapshot.backends.len(), 1);
        assert_eq!(snapshot.components.get("async/amqp"), Some(&vec![]));
    }

    #[test]
    fn test_components_at_every_scope() {
        let cfg: ServiceConfig = serde_json::from_value(json!({
            "version": 3,
            "extra_config": {"security/cors": {}},
            "endpoints": [{
                "endpoint": "/a",
                "extra_config": {"qos/ratelimit/router": {"max_rate": 5}},
                "backend": [{"extra_config": {"qos/http-cache": {"max_size": 10}}}]
            }]
        }))
        .unwrap();
        let service = parse(&cfg);
        assert_eq!(service.components.get(ns::CORS), Some(&vec![]));
        assert_eq!(service.endpoints[0].components.get(ns::RATELIMIT_ROUTER), Some(&vec![1]));
        assert_eq!(service.endpoints[0].backends[0].components.get(ns::HTTP_CACHE), Some(&vec![4]));
    }
}
