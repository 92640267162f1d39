//! Rule registry.
//!
//! Rule IDs are public identifiers: callers exclude rules by ID, so an ID is
//! never reused for a different check. Every predicate reads the snapshot
//! through bounds-checked accessors and treats missing values as zero.

use crate::snapshot::bits::{
    has_bit, ClientPlugin, Encoding, HttpCacheFlag, HttpClientFlag, ModifierPlugin,
    OpenTelemetryIndex, ProxyFlag, RouterFlag, ServerPlugin, ServiceFlag, WildcardFlag,
};
use crate::snapshot::model::value_at;
use crate::snapshot::namespaces as ns;
use crate::snapshot::{Components, EndpointIndex, Service};

use super::Severity;

/// A named, severity-tagged check over a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Dotted hierarchical ID, e.g. "2.1.3".
    pub id: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    check: fn(&Service) -> bool,
}

impl Rule {
    /// Whether the rule fires for this snapshot.
    pub fn fires(&self, service: &Service) -> bool {
        (self.check)(service)
    }
}

/// Every registered rule, in no particular order.
pub fn rules() -> &'static [Rule] {
    RULES
}

/// Look a rule up by ID.
pub fn find_rule(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.id == id)
}

macro_rules! rule {
    ($id:literal, $severity:ident, $message:literal, $check:expr) => {
        Rule {
            id: $id,
            severity: Severity::$severity,
            message: $message,
            check: $check,
        }
    };
}

static RULES: &[Rule] = &[
    rule!("1.1.1", Medium, "Implement more secure alternatives than Basic Auth to protect your data.", has_basic_auth),
    rule!("1.1.2", Medium, "Implement more secure alternatives than API Keys to protect your data.", |s| {
        s.components.contains_key(ns::API_KEYS)
    }),
    rule!("1.2.1", High, "Prioritize using JWT for endpoint authorization to ensure security.", has_no_jwt),
    rule!("2.1.1", High, "Only allow secure connections (avoid insecure_connections).", |s| {
        service_flag(s, ServiceFlag::AllowInsecureConnections)
    }),
    rule!("2.1.2", High, "Enable TLS or use a TLS terminator in front of the gateway.", |s| {
        !service_flag(s, ServiceFlag::HasTls)
    }),
    rule!("2.1.3", Critical, "Ensure your TLS is enabled.", |s| {
        service_flag(s, ServiceFlag::HasTls) && !service_flag(s, ServiceFlag::TlsEnabled)
    }),
    rule!("2.1.7", High, "Ensure you enable HTTP security header checks (security/http).", |s| {
        !s.components.contains_key(ns::HTTP_SECURE)
    }),
    rule!("2.1.8", High, "Avoid clear text communication (h2c).", has_h2c),
    rule!("2.1.9", High, "Establish secure connections in internal traffic (avoid insecure_connections internally).", |s| {
        s.all_backends()
            .any(|b| first_has_bit(&b.components, ns::BACKEND_HTTP_CLIENT, HttpClientFlag::AllowInsecureConnections as u32))
    }),
    rule!("2.2.1", Medium, "Ensure that the version banner is hidden in runtime.", |s| {
        !first_has_bit(&s.components, ns::ROUTER, RouterFlag::HideVersionHeader as u32)
    }),
    rule!("2.2.2", High, "Ensure that CORS is enabled.", |s| !s.components.contains_key(ns::CORS)),
    rule!("2.2.3", High, "Avoid passing all input headers to the backend.", |s| {
        any_wildcard(s, WildcardFlag::Headers)
    }),
    rule!("2.2.4", High, "Avoid passing all input query strings to the backend.", |s| {
        any_wildcard(s, WildcardFlag::QueryString)
    }),
    rule!("2.2.5", High, "Avoid exposing gRPC server without services declared.", |s| {
        matches!(s.components.get(ns::GRPC).and_then(|v| v.first()), Some(&0))
    }),
    rule!("2.3.1", Low, "Avoid using wildcards in endpoint paths.", |s| any_wildcard(s, WildcardFlag::Path)),
    rule!("3.1.1", Medium, "Ensure that the Bot detector is enabled.", |s| {
        !s.components.contains_key(ns::BOT_DETECTOR)
    }),
    rule!(
        "3.1.2",
        Medium,
        "Ensure you enable some rate-limiting strategy and avoid having an All-You-Can-Eat API.",
        has_no_ratelimit
    ),
    rule!("3.1.3", Medium, "Ensure you protect your backends with a circuit breaker.", |s| {
        !s.endpoints.iter().any(|e| {
            e.components.contains_key(ns::CIRCUIT_BREAKER)
                || e.backends.iter().any(|b| b.components.contains_key(ns::CIRCUIT_BREAKER))
        })
    }),
    rule!("3.2.1", High, "Ensure all your backend caches have a size limit.", has_unlimited_cache),
    rule!("3.3.1", Low, "Ensure that your timeouts are below 3 seconds.", |s| timeout_above(s, 3_000)),
    rule!("3.3.2", Medium, "Ensure that your timeouts are below 5 seconds.", |s| timeout_above(s, 5_000)),
    rule!("3.3.3", High, "Ensure that your timeouts are below 30 seconds.", |s| timeout_above(s, 30_000)),
    rule!("3.3.4", Critical, "Ensure that your timeouts are below 60 seconds.", |s| timeout_above(s, 60_000)),
    rule!("4.1.1", Medium, "Ensure that you have some telemetry system for metrics.", |s| {
        metrics_components(s) == 0
    }),
    rule!("4.1.3", Medium, "Avoid duplicating telemetry options to prevent system overload.", |s| {
        telemetry_components(s) > 1
    }),
    rule!("4.2.1", Medium, "Ensure that you have some telemetry system for tracing.", has_no_tracing),
    rule!(
        "4.3.1",
        Medium,
        "Ensure that you have the improved logging component, which improves log parsing.",
        |s| ![ns::LOGGING, ns::GELF, ns::LOGSTASH].iter().any(|n| s.components.contains_key(*n))
    ),
    rule!("5.1.1", Low, "Enable strict REST for endpoint paths.", |s| {
        service_flag(s, ServiceFlag::DisableStrictRest)
    }),
    rule!("5.1.2", Low, "Avoid exposing the debug endpoint in production.", |s| {
        service_flag(s, ServiceFlag::Debug)
    }),
    rule!("5.1.3", Low, "Avoid exposing the echo endpoint in production.", |s| {
        service_flag(s, ServiceFlag::Echo)
    }),
    rule!("5.1.4", Low, "Declare at least one backend for every endpoint.", |s| {
        s.endpoints.iter().any(|e| e.backends.is_empty())
    }),
    rule!("5.1.5", Low, "Benefit from the backend aggregation capabilities of the gateway.", |s| {
        s.endpoints.iter().all(|e| e.backends.len() <= 1)
    }),
    rule!("5.1.6", Low, "Benefit from the data manipulation capabilities of the gateway (avoid no-op everywhere).", |s| {
        s.endpoints
            .iter()
            .all(|e| has_bit(e.flag(EndpointIndex::Encoding as usize), Encoding::NoOp as u32))
    }),
    rule!("5.1.7", Low, "Avoid sequential start with many async agents.", |s| {
        service_flag(s, ServiceFlag::SequentialStart) && s.agents.len() >= 10
    }),
    rule!("5.2.1", Medium, "Avoid more than one unsafe method in the same endpoint.", |s| {
        s.endpoints.iter().any(|e| e.flag(EndpointIndex::UnsafeMethods as usize) > 1)
    }),
    rule!("5.2.2", Medium, "Avoid sequential proxy; chained backend calls add latency.", |s| {
        s.endpoints
            .iter()
            .any(|e| first_has_bit(&e.components, ns::PROXY, ProxyFlag::Sequential as u32))
    }),
    rule!("5.2.3", High, "Avoid using the catch-all endpoint.", |s| any_wildcard(s, WildcardFlag::CatchAll)),
    rule!("7.1.1", Low, "Avoid using deprecated Instana telemetry.", |s| {
        s.components.contains_key(ns::INSTANA)
    }),
    rule!("7.1.2", Low, "Avoid using deprecated Google Analytics telemetry.", |s| {
        s.components.contains_key(ns::GANALYTICS)
    }),
    rule!("7.1.3", Low, "Avoid using the deprecated basic-auth server plugin; use auth/basic instead.", |s| {
        has_server_plugin(s, ServerPlugin::BasicAuth)
    }),
    rule!("7.1.4", Low, "Avoid using the deprecated static-filesystem server plugin; use server/static-filesystem instead.", |s| {
        has_server_plugin(s, ServerPlugin::StaticFilesystem)
    }),
    rule!("7.1.5", Low, "Avoid using the deprecated virtualhost server plugin; use server/virtualhost instead.", |s| {
        has_server_plugin(s, ServerPlugin::VirtualHost)
    }),
    rule!("7.1.6", Low, "Avoid using the deprecated static-filesystem client plugin; use backend/static-filesystem instead.", |s| {
        has_client_plugin(s, ClientPlugin::StaticFilesystem)
    }),
    rule!("7.1.7", Low, "Avoid using the deprecated no-redirect client plugin; use backend/http/client instead.", |s| {
        has_client_plugin(s, ClientPlugin::NoRedirect)
    }),
    rule!("7.1.8", Low, "Avoid using the deprecated response-schema-validator plugin; use validation/response-json-schema instead.", |s| {
        has_modifier_plugin(s, ModifierPlugin::ResponseSchemaValidator)
    }),
    rule!("7.1.9", Low, "Avoid using the deprecated content-replacer plugin; use modifier/response-body instead.", |s| {
        has_modifier_plugin(s, ModifierPlugin::ContentReplacer)
    }),
    rule!("7.2.1", Low, "Avoid using deprecated OpenCensus telemetry; use OpenTelemetry instead.", |s| {
        s.components.contains_key(ns::OPENCENSUS)
    }),
    rule!("7.3.1", Low, "Avoid using deprecated TLS public_key and private_key; declare keys instead.", |s| {
        service_flag(s, ServiceFlag::TlsRawKeyFiles)
    }),
];

fn service_flag(s: &Service, flag: ServiceFlag) -> bool {
    has_bit(s.service_flags(), flag as u32)
}

/// Bit `bit` of the first value stored under `namespace`.
fn first_has_bit(components: &Components, namespace: &str, bit: u32) -> bool {
    components
        .get(namespace)
        .is_some_and(|values| has_bit(value_at(values, 0), bit))
}

fn any_wildcard(s: &Service, flag: WildcardFlag) -> bool {
    s.endpoints
        .iter()
        .any(|e| has_bit(e.flag(EndpointIndex::Wildcards as usize), flag as u32))
}

fn timeout_above(s: &Service, limit_ms: i64) -> bool {
    s.endpoints
        .iter()
        .any(|e| e.flag(EndpointIndex::TimeoutMs as usize) > limit_ms)
}

fn has_server_plugin(s: &Service, plugin: ServerPlugin) -> bool {
    first_has_bit(&s.components, ns::SERVER_PLUGIN, plugin as u32)
}

fn has_client_plugin(s: &Service, plugin: ClientPlugin) -> bool {
    s.endpoints.iter().any(|e| {
        matches!(e.components.get(ns::CLIENT_PLUGIN).and_then(|v| v.first()), Some(&id) if id == plugin as i64)
    })
}

fn has_modifier_plugin(s: &Service, plugin: ModifierPlugin) -> bool {
    let bit = plugin as u32;
    s.endpoints.iter().any(|e| {
        first_has_bit(&e.components, ns::MODIFIER_PLUGIN, bit)
            || e.backends
                .iter()
                .any(|b| first_has_bit(&b.components, ns::MODIFIER_PLUGIN, bit))
    })
}

fn has_basic_auth(s: &Service) -> bool {
    has_server_plugin(s, ServerPlugin::BasicAuth)
        || first_has_bit(&s.components, ns::BASIC_AUTH, 0)
        || s.endpoints
            .iter()
            .any(|e| first_has_bit(&e.components, ns::BASIC_AUTH, 0))
}

fn has_no_jwt(s: &Service) -> bool {
    !s.endpoints
        .iter()
        .any(|e| e.components.contains_key(ns::JWT_VALIDATOR))
}

fn has_h2c(s: &Service) -> bool {
    service_flag(s, ServiceFlag::UseH2c)
        || first_has_bit(&s.components, ns::ROUTER, RouterFlag::UseH2c as u32)
}

fn has_no_ratelimit(s: &Service) -> bool {
    if s.components.contains_key(ns::RATELIMIT_ROUTER)
        || s.components.contains_key(ns::RATELIMIT_SERVICE)
        || has_server_plugin(s, ServerPlugin::RedisRateLimit)
    {
        return false;
    }
    !s.endpoints.iter().any(|e| {
        e.components.contains_key(ns::RATELIMIT_ROUTER)
            || e.components.contains_key(ns::RATELIMIT_PROXY)
            || e.backends
                .iter()
                .any(|b| b.components.contains_key(ns::RATELIMIT_PROXY))
    })
}

fn has_unlimited_cache(s: &Service) -> bool {
    s.all_backends().any(|b| match b.components.get(ns::HTTP_CACHE) {
        Some(values) => {
            let bits = value_at(values, 0);
            !has_bit(bits, HttpCacheFlag::MaxItems as u32) || !has_bit(bits, HttpCacheFlag::MaxSize as u32)
        }
        None => false,
    })
}

/// Service-level telemetry extensions that report metrics.
const METRICS_NAMESPACES: [&str; 5] = [
    ns::OPENCENSUS,
    ns::METRICS,
    ns::NEWRELIC,
    ns::GANALYTICS,
    ns::INSTANA,
];

fn metrics_components(s: &Service) -> usize {
    METRICS_NAMESPACES
        .iter()
        .filter(|n| s.components.contains_key(**n))
        .count()
}

/// Metrics extensions plus the metric exporters enabled inside OpenTelemetry.
fn telemetry_components(s: &Service) -> i64 {
    let mut total = metrics_components(s) as i64;
    if let Some(otel) = s.components.get(ns::OPENTELEMETRY) {
        if otel.len() > OpenTelemetryIndex::Prometheus as usize {
            total += otel[OpenTelemetryIndex::OtlpMetrics as usize] + otel[OpenTelemetryIndex::Prometheus as usize];
        }
    }
    total
}

fn has_no_tracing(s: &Service) -> bool {
    let otel_traces = s
        .components
        .get(ns::OPENTELEMETRY)
        .is_some_and(|otel| value_at(otel, OpenTelemetryIndex::OtlpTraces as usize) >= 1);

    !otel_traces
        && ![ns::OPENCENSUS, ns::NEWRELIC, ns::INSTANA]
            .iter()
            .any(|n| s.components.contains_key(*n))
}
