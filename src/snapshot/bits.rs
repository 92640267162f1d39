//! Bit tables for snapshot flag vectors.
//!
//! Every discriminant below is a wire value. Positions are append-only: a
//! named flag keeps its index forever and new flags take new indices, or
//! previously encoded snapshots decode with the wrong meaning.

/// Returns `value` with bit `bit` set.
pub fn with_bit(value: i64, bit: u32) -> i64 {
    value | (1 << bit)
}

/// Whether bit `bit` is set in `value`.
pub fn has_bit(value: i64, bit: u32) -> bool {
    (value >> bit) & 1 == 1
}

/// Service-wide boolean traits, stored in `Service::flags[0]`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFlag {
    Plugin = 0,
    SequentialStart = 1,
    Debug = 2,
    AllowInsecureConnections = 3,
    DisableStrictRest = 4,
    HasTls = 5,
    TlsEnabled = 6,
    TlsMutualAuth = 7,
    TlsDisableSystemCaPool = 8,
    TlsCaCerts = 9,
    Echo = 10,
    UseH2c = 11,
    TlsRawKeyFiles = 12,
}

/// Payload encodings, one-hot.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    NoOp = 0,
    Json = 1,
    SafeJson = 2,
    String = 3,
    Rss = 4,
    Xml = 5,
    Other = 6,
}

impl Encoding {
    /// Resolve an encoding name as written in the configuration.
    pub fn from_name(name: &str) -> Self {
        match name {
            "no-op" => Self::NoOp,
            "json" => Self::Json,
            "safejson" => Self::SafeJson,
            "string" => Self::String,
            "rss" => Self::Rss,
            "xml" => Self::Xml,
            _ => Self::Other,
        }
    }

    /// One-hot bit-vector for this encoding.
    pub fn bits(self) -> i64 {
        with_bit(0, self as u32)
    }
}

/// Backend shape bits, sharing the backend flag integer with [`Encoding`].
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFlag {
    Allow = 7,
    Deny = 8,
    Mapping = 9,
    Group = 10,
    Target = 11,
    IsCollection = 12,
    /// Reserved.
    HeadersToPass = 13,
    /// Reserved.
    Query = 14,
}

/// Endpoint wildcard bits, stored in `Endpoint::flags[EndpointIndex::Wildcards]`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardFlag {
    Path = 0,
    QueryString = 1,
    Headers = 2,
    CatchAll = 3,
}

/// Positions inside `Endpoint::flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointIndex {
    Encoding = 0,
    QueryStrings = 1,
    Headers = 2,
    TimeoutMs = 3,
    Wildcards = 4,
    UnsafeMethods = 5,
}

/// Positions inside `Agent::flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentIndex {
    Encoding = 0,
    Workers = 1,
    MaxRetries = 2,
    TimeoutMs = 3,
}

impl AgentIndex {
    /// Length of a fully populated `Agent::flags`.
    pub const LEN: usize = Self::TimeoutMs as usize + 1;
}

/// Bits of the router extension vector.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterFlag {
    ErrorBody = 0,
    DisableHealth = 1,
    DisableAccessLog = 2,
    HealthPath = 3,
    ReturnErrorMsg = 4,
    DisableRedirectTrailingSlash = 5,
    DisableRedirectFixedPath = 6,
    RemoveExtraSlash = 7,
    DisableHandleMethodNotAllowed = 8,
    DisablePathDecoding = 9,
    AutoOptions = 10,
    ForwardedByClientIp = 11,
    RemoteIpHeaders = 12,
    TrustedProxies = 13,
    AppEngine = 14,
    MaxMultipartMemory = 15,
    LoggerSkipPaths = 16,
    HideVersionHeader = 17,
    /// Deprecated location of the service `use_h2c` flag.
    UseH2c = 18,
}

/// Bits of the proxy extension vector.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyFlag {
    Sequential = 0,
    FlatmapFilter = 1,
    Shadow = 2,
    Combiner = 3,
    Static = 4,
}

/// Bits of the backend HTTP client extension vector.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpClientFlag {
    Present = 0,
    AllowInsecureConnections = 1,
    ClientCerts = 2,
}

/// Bits of the HTTP cache extension vector.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpCacheFlag {
    Shared = 0,
    MaxItems = 1,
    MaxSize = 2,
}

/// Exporter bits of the OpenCensus extension vector.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenCensusExporter {
    Logger = 0,
    Zipkin = 1,
    Jaeger = 2,
    InfluxDb = 3,
    Prometheus = 4,
    Xray = 5,
    Stackdriver = 6,
    Datadog = 7,
    OcAgent = 8,
}

impl OpenCensusExporter {
    /// Exporter names as they appear under `exporters`.
    pub const ALL: [(&'static str, Self); 9] = [
        ("logger", Self::Logger),
        ("zipkin", Self::Zipkin),
        ("jaeger", Self::Jaeger),
        ("influxdb", Self::InfluxDb),
        ("prometheus", Self::Prometheus),
        ("xray", Self::Xray),
        ("stackdriver", Self::Stackdriver),
        ("datadog", Self::Datadog),
        ("ocagent", Self::OcAgent),
    ];
}

/// Bits of the router rate-limit extension vector.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitFlag {
    MaxRate = 0,
    ClientMaxRate = 1,
    StrategyIp = 2,
    StrategyHeader = 3,
}

/// Positions inside the OpenTelemetry extension vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTelemetryIndex {
    /// Seconds, -1 when unset.
    MetricReportingPeriod = 0,
    /// Percent, -1 when unset.
    TraceSampleRate = 1,
    OtlpMetrics = 2,
    OtlpTraces = 3,
    Prometheus = 4,
}

/// Legacy HTTP server plugins, hashed into bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPlugin {
    StaticFilesystem = 1,
    BasicAuth = 2,
    GeoIp = 3,
    RedisRateLimit = 4,
    UrlRewrite = 5,
    VirtualHost = 6,
    Wildcard = 7,
    IpFilter = 8,
    JwkAggregator = 9,
}

impl ServerPlugin {
    /// Bit index of a plugin name; unknown names map to 0.
    pub fn bit_of(name: &str) -> u32 {
        let plugin = match name {
            "static-filesystem" => Self::StaticFilesystem,
            "basic-auth" => Self::BasicAuth,
            "geoip" => Self::GeoIp,
            "redis-ratelimit" => Self::RedisRateLimit,
            "url-rewrite" => Self::UrlRewrite,
            "virtualhost" => Self::VirtualHost,
            "wildcard" => Self::Wildcard,
            "ip-filter" => Self::IpFilter,
            "jwk-aggregator" => Self::JwkAggregator,
            _ => return 0,
        };
        plugin as u32
    }
}

/// Legacy HTTP client plugins. Stored as a plain value, not a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPlugin {
    NoRedirect = 1,
    HttpLogger = 2,
    StaticFilesystem = 3,
    HttpProxy = 4,
}

impl ClientPlugin {
    /// Identifier of a plugin name; unknown names map to 0.
    pub fn id_of(name: &str) -> i64 {
        let plugin = match name {
            "no-redirect" => Self::NoRedirect,
            "http-logger" => Self::HttpLogger,
            "static-filesystem" => Self::StaticFilesystem,
            "http-proxy" => Self::HttpProxy,
            _ => return 0,
        };
        plugin as i64
    }
}

/// Legacy request/response modifier plugins, hashed into bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierPlugin {
    ResponseSchemaValidator = 1,
    ContentReplacer = 2,
}

impl ModifierPlugin {
    /// Bit index of a plugin name; unknown names map to 0.
    pub fn bit_of(name: &str) -> u32 {
        match name {
            "response-schema-validator" => Self::ResponseSchemaValidator as u32,
            "content-replacer" => Self::ContentReplacer as u32,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_helpers() {
        let v = with_bit(with_bit(0, 3), 5);
        assert_eq!(v, 40);
        assert!(has_bit(v, 3));
        assert!(has_bit(v, 5));
        assert!(!has_bit(v, 4));
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(Encoding::from_name("no-op").bits(), 1);
        assert_eq!(Encoding::from_name("json").bits(), 2);
        assert_eq!(Encoding::from_name("safejson").bits(), 4);
        assert_eq!(Encoding::from_name("protobuf"), Encoding::Other);
        assert_eq!(Encoding::Other.bits(), 64);
    }

    #[test]
    fn test_backend_flags_follow_encodings() {
        assert_eq!(BackendFlag::Allow as u32, Encoding::Other as u32 + 1);
        assert_eq!(BackendFlag::Query as u32, 14);
    }

    #[test]
    fn test_service_flag_positions_are_stable() {
        assert_eq!(ServiceFlag::Plugin as u32, 0);
        assert_eq!(ServiceFlag::HasTls as u32, 5);
        assert_eq!(ServiceFlag::TlsRawKeyFiles as u32, 12);
    }

    #[test]
    fn test_plugin_lookup() {
        assert_eq!(ServerPlugin::bit_of("basic-auth"), 2);
        assert_eq!(ServerPlugin::bit_of("nope"), 0);
        assert_eq!(ClientPlugin::id_of("no-redirect"), 1);
        assert_eq!(ModifierPlugin::bit_of("content-replacer"), 2);
    }
}
