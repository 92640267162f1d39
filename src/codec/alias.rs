//! Namespace ↔ short code dictionary.
//!
//! Append-only. A code, once assigned, keeps its namespace forever; new
//! namespaces go at the end with a fresh code.

use crate::snapshot::namespaces as ns;
use crate::snapshot::Components;

/// (namespace, code) pairs in assignment order.
pub const ALIASES: &[(&str, &str)] = &[
    (ns::SERVER_PLUGIN, "a"),
    (ns::CLIENT_PLUGIN, "b"),
    (ns::MODIFIER_PLUGIN, "c"),
    (ns::PROXY, "d"),
    (ns::ROUTER, "e"),
    (ns::REVOKER, "f"),
    (ns::BOT_DETECTOR, "g"),
    (ns::OPENCENSUS, "h"),
    (ns::RATELIMIT_ROUTER, "i"),
    (ns::RATELIMIT_PROXY, "j"),
    (ns::NEWRELIC, "k"),
    (ns::GANALYTICS, "l"),
    (ns::INSTANA, "m"),
    (ns::JWT_VALIDATOR, "n"),
    (ns::JWT_SIGNER, "o"),
    (ns::API_KEYS, "p"),
    (ns::HTTP_SECURE, "q"),
    (ns::LOGGING, "r"),
    (ns::GELF, "s"),
    (ns::LOGSTASH, "t"),
    (ns::BACKEND_GRPC, "u"),
    (ns::BASIC_AUTH, "v"),
    (ns::VIRTUAL_HOST, "w"),
    (ns::SERVER_STATIC_FILESYSTEM, "x"),
    (ns::BACKEND_STATIC_FILESYSTEM, "y"),
    (ns::BACKEND_HTTP_CLIENT, "z"),
    (ns::MOESIF, "0"),
    (ns::OPENTELEMETRY, "1"),
    (ns::GRPC, "2"),
    (ns::RESPONSE_BODY_GENERATOR, "3"),
    (ns::RESPONSE_JSON_SCHEMA, "4"),
    (ns::WEBSOCKET, "5"),
    (ns::RESPONSE_HEADERS, "6"),
    (ns::LUA_PROXY, "7"),
    (ns::LUA_BACKEND, "8"),
    (ns::LUA_ENDPOINT, "9"),
    (ns::HTTP_CACHE, "10"),
    (ns::AI_LLM, "11"),
    (ns::AI_MCP, "12"),
];

/// Short code of a namespace, if it has one.
pub fn alias_for(namespace: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(n, _)| *n == namespace)
        .map(|(_, code)| *code)
}

/// Namespace behind a short code, if the code is assigned.
pub fn namespace_for(code: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(namespace, _)| *namespace)
}

/// Rewrite keys through `lookup`; keys it does not know pass through.
///
/// When a passed-through key equals a rewritten one, the rewritten entry wins
/// and the other is dropped.
fn rekey(components: &mut Components, lookup: fn(&str) -> Option<&'static str>) {
    let original = std::mem::take(components);
    let (known, unknown): (Vec<_>, Vec<_>) = original
        .into_iter()
        .partition(|(key, _)| lookup(key).is_some());

    for (key, values) in known {
        if let Some(replacement) = lookup(&key) {
            components.insert(replacement.to_string(), values);
        }
    }
    for (key, values) in unknown {
        if components.contains_key(&key) {
            tracing::debug!(key = %key, "Component key collides with an alias, dropping it");
            continue;
        }
        components.insert(key, values);
    }
}

/// Replace known namespaces with their short codes.
pub fn shorten(components: &mut Components) {
    rekey(components, alias_for);
}

/// Replace short codes with the namespaces they stand for.
pub fn expand(components: &mut Components) {
    rekey(components, namespace_for);
}
