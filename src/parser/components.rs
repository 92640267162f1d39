//! Per-namespace extractors for extension sections.
//!
//! Each extractor turns a loosely-typed settings object into a fixed-length
//! integer vector. Anything with an unexpected shape degrades to zero values;
//! an extractor never fails.

use serde_json::{Map, Value};

use crate::config::schema::{ClientTlsConfig, ExtraConfig};
use crate::parser::duration::parse_duration_ms;
use crate::snapshot::bits::{
    with_bit, ClientPlugin, HttpCacheFlag, HttpClientFlag, ModifierPlugin, OpenCensusExporter,
    ProxyFlag, RateLimitFlag, RouterFlag, ServerPlugin,
};
use crate::snapshot::namespaces as ns;
use crate::snapshot::Components;

type Object = Map<String, Value>;
type Extractor = fn(&Object) -> Vec<i64>;

/// Registered extractors. Namespaces missing here are recorded as attached
/// with an empty vector.
const EXTRACTORS: &[(&str, Extractor)] = &[
    (ns::SERVER_PLUGIN, server_plugin),
    (ns::CLIENT_PLUGIN, client_plugin),
    (ns::MODIFIER_PLUGIN, modifier_plugin),
    (ns::PROXY, proxy),
    (ns::ROUTER, router),
    (ns::REVOKER, revoker),
    (ns::BOT_DETECTOR, bot_detector),
    (ns::OPENCENSUS, opencensus),
    (ns::RATELIMIT_ROUTER, ratelimit),
    (ns::BACKEND_HTTP_CLIENT, http_client),
    (ns::MOESIF, moesif),
    (ns::OPENTELEMETRY, opentelemetry),
    (ns::GRPC, grpc),
    (ns::RESPONSE_JSON_SCHEMA, response_json_schema),
    (ns::RESPONSE_BODY, response_body),
    (ns::RESPONSE_HEADERS, response_headers),
    (ns::WEBSOCKET, websocket),
    (ns::LUA_PROXY, lua),
    (ns::LUA_BACKEND, lua),
    (ns::LUA_ENDPOINT, lua),
    (ns::HTTP_CACHE, http_cache),
    (ns::BASIC_AUTH, basic_auth),
];

/// Summarize every extension section of one scope.
pub fn parse_components(extra: &ExtraConfig) -> Components {
    extra
        .iter()
        .map(|(namespace, settings)| (namespace.clone(), extract(namespace, settings)))
        .collect()
}

fn extract(namespace: &str, settings: &Value) -> Vec<i64> {
    let Some((_, extractor)) = EXTRACTORS.iter().find(|(n, _)| *n == namespace) else {
        tracing::trace!(namespace, "No extractor registered, recording presence only");
        return Vec::new();
    };

    match settings.as_object() {
        Some(cfg) => extractor(cfg),
        None => {
            tracing::debug!(namespace, "Extension settings are not an object, recording presence only");
            Vec::new()
        }
    }
}

fn is_true(cfg: &Object, key: &str) -> bool {
    cfg.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn number(cfg: &Object, key: &str) -> Option<f64> {
    cfg.get(key).and_then(Value::as_f64)
}

fn positive(cfg: &Object, key: &str) -> Option<f64> {
    number(cfg, key).filter(|v| *v > 0.0)
}

fn array_len(cfg: &Object, key: &str) -> i64 {
    cfg.get(key)
        .and_then(Value::as_array)
        .map_or(0, |a| a.len() as i64)
}

fn non_empty_array(cfg: &Object, key: &str) -> bool {
    array_len(cfg, key) > 0
}

fn duration_ms(cfg: &Object, key: &str) -> i64 {
    cfg.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .and_then(parse_duration_ms)
        .unwrap_or(0)
}

/// Fold named booleans into a bit-vector.
fn bool_bits(cfg: &Object, table: &[(&str, u32)]) -> i64 {
    table
        .iter()
        .filter(|(key, _)| is_true(cfg, key))
        .fold(0, |acc, (_, bit)| with_bit(acc, *bit))
}

/// Plugin names come either as a single string or as a list.
fn plugin_names(cfg: &Object) -> Option<Vec<&str>> {
    match cfg.get("name")? {
        Value::String(name) => Some(vec![name.as_str()]),
        Value::Array(names) => Some(names.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

fn server_plugin(cfg: &Object) -> Vec<i64> {
    match plugin_names(cfg) {
        Some(names) => vec![names
            .into_iter()
            .fold(0, |acc, n| with_bit(acc, ServerPlugin::bit_of(n)))],
        None => Vec::new(),
    }
}

fn client_plugin(cfg: &Object) -> Vec<i64> {
    match cfg.get("name").and_then(Value::as_str) {
        Some(name) => vec![ClientPlugin::id_of(name)],
        None => Vec::new(),
    }
}

fn modifier_plugin(cfg: &Object) -> Vec<i64> {
    match plugin_names(cfg) {
        Some(names) => vec![names
            .into_iter()
            .fold(0, |acc, n| with_bit(acc, ModifierPlugin::bit_of(n)))],
        None => Vec::new(),
    }
}

fn proxy(cfg: &Object) -> Vec<i64> {
    let mut bits = bool_bits(
        cfg,
        &[
            ("sequential", ProxyFlag::Sequential as u32),
            ("shadow", ProxyFlag::Shadow as u32),
        ],
    );
    for (key, flag) in [
        ("flatmap_filter", ProxyFlag::FlatmapFilter),
        ("combiner", ProxyFlag::Combiner),
        ("static", ProxyFlag::Static),
    ] {
        if cfg.contains_key(key) {
            bits = with_bit(bits, flag as u32);
        }
    }
    vec![bits]
}

fn router(cfg: &Object) -> Vec<i64> {
    let mut bits = bool_bits(
        cfg,
        &[
            ("error_body", RouterFlag::ErrorBody as u32),
            ("disable_health", RouterFlag::DisableHealth as u32),
            ("disable_access_log", RouterFlag::DisableAccessLog as u32),
            ("return_error_msg", RouterFlag::ReturnErrorMsg as u32),
            ("disable_redirect_trailing_slash", RouterFlag::DisableRedirectTrailingSlash as u32),
            ("disable_redirect_fixed_path", RouterFlag::DisableRedirectFixedPath as u32),
            ("remove_extra_slash", RouterFlag::RemoveExtraSlash as u32),
            ("disable_handle_method_not_allowed", RouterFlag::DisableHandleMethodNotAllowed as u32),
            ("disable_path_decoding", RouterFlag::DisablePathDecoding as u32),
            ("auto_options", RouterFlag::AutoOptions as u32),
            ("forwarded_by_client_ip", RouterFlag::ForwardedByClientIp as u32),
            ("app_engine", RouterFlag::AppEngine as u32),
            ("hide_version_header", RouterFlag::HideVersionHeader as u32),
            ("use_h2c", RouterFlag::UseH2c as u32),
        ],
    );
    if cfg.contains_key("health_path") {
        bits = with_bit(bits, RouterFlag::HealthPath as u32);
    }
    if non_empty_array(cfg, "remote_ip_headers") {
        bits = with_bit(bits, RouterFlag::RemoteIpHeaders as u32);
    }
    if non_empty_array(cfg, "trusted_proxies") {
        bits = with_bit(bits, RouterFlag::TrustedProxies as u32);
    }
    if positive(cfg, "max_multipart_memory").is_some() {
        bits = with_bit(bits, RouterFlag::MaxMultipartMemory as u32);
    }
    if non_empty_array(cfg, "logger_skip_paths") {
        bits = with_bit(bits, RouterFlag::LoggerSkipPaths as u32);
    }
    vec![bits]
}

fn revoker(cfg: &Object) -> Vec<i64> {
    let optimal = cfg.get("hash_name").and_then(Value::as_str) == Some("optimal");
    vec![i64::from(optimal), array_len(cfg, "token_keys")]
}

fn bot_detector(cfg: &Object) -> Vec<i64> {
    vec![
        array_len(cfg, "allow"),
        array_len(cfg, "deny"),
        array_len(cfg, "patterns"),
        number(cfg, "cache_size").map_or(0, |v| v as i64),
    ]
}

fn opencensus(cfg: &Object) -> Vec<i64> {
    let Some(exporters) = cfg.get("exporters").and_then(Value::as_object) else {
        return Vec::new();
    };
    let bits = OpenCensusExporter::ALL
        .iter()
        .filter(|(name, _)| exporters.contains_key(*name))
        .fold(0, |acc, (_, exporter)| with_bit(acc, *exporter as u32));
    vec![bits]
}

fn ratelimit(cfg: &Object) -> Vec<i64> {
    let mut bits = 0;
    if positive(cfg, "max_rate").is_some() {
        bits = with_bit(bits, RateLimitFlag::MaxRate as u32);
    }
    if positive(cfg, "client_max_rate").is_some() {
        bits = with_bit(bits, RateLimitFlag::ClientMaxRate as u32);
    }
    match cfg.get("strategy").and_then(Value::as_str) {
        Some("ip") => bits = with_bit(bits, RateLimitFlag::StrategyIp as u32),
        Some("header") => bits = with_bit(bits, RateLimitFlag::StrategyHeader as u32),
        _ => {}
    }
    vec![bits]
}

fn http_client(cfg: &Object) -> Vec<i64> {
    let mut bits = with_bit(0, HttpClientFlag::Present as u32);
    let client_tls = cfg
        .get("client_tls")
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value::<ClientTlsConfig>(v.clone()).ok());
    if let Some(tls) = client_tls {
        if tls.allow_insecure_connections {
            bits = with_bit(bits, HttpClientFlag::AllowInsecureConnections as u32);
        }
        if !tls.client_certs.is_empty() {
            bits = with_bit(bits, HttpClientFlag::ClientCerts as u32);
        }
    }
    vec![bits]
}

fn moesif(cfg: &Object) -> Vec<i64> {
    ["event_queue_size", "batch_size", "timer_wake_up_seconds"]
        .iter()
        .map(|key| number(cfg, key).map_or(0, |v| v as i64))
        .collect()
}

/// Count exporter entries that do not switch off the given signal.
fn enabled_exporters(entries: Option<&Value>, disable_key: &str) -> i64 {
    entries
        .and_then(Value::as_array)
        .map_or(0, |list| {
            list.iter()
                .filter_map(Value::as_object)
                .filter(|entry| !is_true(entry, disable_key))
                .count() as i64
        })
}

fn opentelemetry(cfg: &Object) -> Vec<i64> {
    let reporting_period = number(cfg, "metric_reporting_period").map_or(-1, |v| v as i64);
    let sample_rate = number(cfg, "trace_sample_rate").map_or(-1, |v| (v * 100.0) as i64);

    let exporters = cfg.get("exporters").and_then(Value::as_object);
    let otlp = exporters.and_then(|e| e.get("otlp"));
    let prometheus = exporters.and_then(|e| e.get("prometheus"));

    vec![
        reporting_period,
        sample_rate,
        enabled_exporters(otlp, "disable_metrics"),
        enabled_exporters(otlp, "disable_traces"),
        enabled_exporters(prometheus, "disable_metrics"),
    ]
}

fn grpc(cfg: &Object) -> Vec<i64> {
    match cfg.get("server").and_then(Value::as_object) {
        Some(server) => vec![array_len(server, "services")],
        None => Vec::new(),
    }
}

fn response_json_schema(cfg: &Object) -> Vec<i64> {
    let mut out = vec![0; 4];
    if let Some(schema) = cfg.get("schema").filter(|v| v.is_object()) {
        out[0] = serde_json::to_string(schema).map_or(0, |s| s.len() as i64);
    }
    if let Some(error) = cfg.get("error").and_then(Value::as_object) {
        let non_empty = |key: &str| error.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty());
        out[1] = i64::from(non_empty("body"));
        out[2] = positive(error, "status").map_or(0, |v| v as i64);
        out[3] = i64::from(non_empty("content_type"));
    }
    out
}

fn response_body(cfg: &Object) -> Vec<i64> {
    let mut out = vec![0; 6];
    let Some(modifiers) = cfg.get("modifiers").and_then(Value::as_array) else {
        return out;
    };
    out[0] = modifiers.len() as i64;
    for modifier in modifiers.iter().filter_map(Value::as_object) {
        let slot = match modifier.keys().next().map(String::as_str) {
            Some("regexp") => 1,
            Some("literal") => 2,
            Some("upper") => 3,
            Some("lower") => 4,
            Some("trim") => 5,
            _ => continue,
        };
        out[slot] += 1;
    }
    out
}

fn response_headers(cfg: &Object) -> Vec<i64> {
    let bits = ["delete", "add", "rename", "replace"]
        .iter()
        .enumerate()
        .filter(|(_, key)| cfg.contains_key(**key))
        .fold(0, |acc, (bit, _)| with_bit(acc, bit as u32));
    vec![bits]
}

fn websocket(cfg: &Object) -> Vec<i64> {
    let mut out = vec![0; 11];
    out[0] = bool_bits(
        cfg,
        &[
            ("disable_otel_metrics", 0),
            ("enable_direct_communication", 1),
            ("return_error_details", 2),
            ("connect_event", 3),
            ("disconnect_event", 4),
        ],
    );
    for (slot, key) in [
        "read_buffer_size",
        "write_buffer_size",
        "message_buffer_size",
        "max_message_size",
        "max_retries",
    ]
    .iter()
    .enumerate()
    {
        out[slot + 1] = positive(cfg, key).map_or(0, |v| v as i64);
    }
    for (slot, key) in ["write_wait", "pong_wait", "ping_period", "timeout"]
        .iter()
        .enumerate()
    {
        out[slot + 6] = duration_ms(cfg, key);
    }
    out[10] = array_len(cfg, "subprotocols");
    out
}

fn lua(cfg: &Object) -> Vec<i64> {
    let mut bits = 0;
    if cfg.get("pre").is_some_and(Value::is_string) {
        bits = with_bit(bits, 0);
    }
    if cfg.get("post").is_some_and(Value::is_string) {
        bits = with_bit(bits, 1);
    }
    vec![bits]
}

fn http_cache(cfg: &Object) -> Vec<i64> {
    let mut bits = bool_bits(cfg, &[("shared", HttpCacheFlag::Shared as u32)]);
    if positive(cfg, "max_items").is_some() {
        bits = with_bit(bits, HttpCacheFlag::MaxItems as u32);
    }
    if positive(cfg, "max_size").is_some() {
        bits = with_bit(bits, HttpCacheFlag::MaxSize as u32);
    }
    vec![bits]
}

fn basic_auth(cfg: &Object) -> Vec<i64> {
    let has_users = cfg
        .get("users")
        .and_then(Value::as_object)
        .is_some_and(|u| !u.is_empty());
    let has_file = cfg
        .get("htpasswd_path")
        .and_then(Value::as_str)
        .is_some_and(|p| !p.is_empty());
    vec![i64::from(has_users || has_file)]
}
