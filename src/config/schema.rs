//! Configuration schema definitions.
//!
//! This module defines the gateway configuration tree handed to the auditor.
//! All types derive Serde traits for deserialization from config files, and
//! every container defaults to empty so that minimal documents load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extension sections keyed by namespace.
///
/// Values are kept as loosely-typed JSON because their shape is owned by each
/// extension, not by the gateway core.
pub type ExtraConfig = BTreeMap<String, Value>;

/// Service timeout applied when neither the service nor the endpoint sets one.
pub const DEFAULT_TIMEOUT: &str = "2s";

/// Output encoding applied when neither the service nor the endpoint sets one.
pub const DEFAULT_ENCODING: &str = "json";

/// Method applied to endpoints that do not declare one.
pub const DEFAULT_METHOD: &str = "GET";

/// Root of the gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Configuration file format version.
    pub version: u32,

    /// Human readable service name.
    pub name: Option<String>,

    /// Default timeout for every endpoint (Go duration syntax, e.g. "3s").
    pub timeout: Option<String>,

    /// Default output encoding for every endpoint.
    pub output_encoding: Option<String>,

    /// Start async agents one after another instead of concurrently.
    pub sequential_start: bool,

    /// Expose the `/__debug/` endpoint.
    pub debug_endpoint: bool,

    /// Expose the `/__echo/` endpoint.
    pub echo_endpoint: bool,

    /// Deprecated global form of `client_tls.allow_insecure_connections`.
    pub allow_insecure_connections: bool,

    /// Accept non-RESTful endpoint paths.
    pub disable_rest: bool,

    /// Serve HTTP/2 over clear text.
    pub use_h2c: bool,

    /// Plugin loader settings.
    pub plugin: Option<PluginConfig>,

    /// Listener TLS settings.
    pub tls: Option<TlsConfig>,

    /// TLS settings for connections to backends.
    pub client_tls: Option<ClientTlsConfig>,

    /// Exposed routes.
    pub endpoints: Vec<EndpointConfig>,

    /// Asynchronous consumers.
    pub async_agent: Vec<AsyncAgentConfig>,

    /// Service level extensions.
    pub extra_config: ExtraConfig,
}

/// Plugin loader configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PluginConfig {
    /// Folder scanned for plugin binaries.
    pub folder: String,

    /// File name pattern for plugin binaries.
    pub pattern: String,
}

/// Listener TLS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// TLS section present but switched off.
    pub disabled: bool,

    /// Deprecated single certificate path. Superseded by `keys`.
    pub public_key: String,

    /// Deprecated single key path. Superseded by `keys`.
    pub private_key: String,

    /// Certificate/key pairs served by the listener.
    pub keys: Vec<TlsKeyPair>,

    /// Require client certificates.
    pub enable_mtls: bool,

    /// Ignore the operating system CA pool.
    pub disable_system_ca_pool: bool,

    /// Additional CA certificates.
    pub ca_certs: Vec<String>,

    pub min_version: Option<String>,

    pub max_version: Option<String>,
}

/// One certificate/key pair.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TlsKeyPair {
    pub public_key: String,
    pub private_key: String,
}

/// TLS configuration used when connecting to backends.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientTlsConfig {
    /// Skip certificate verification.
    pub allow_insecure_connections: bool,

    /// Ignore the operating system CA pool.
    pub disable_system_ca_pool: bool,

    /// Additional CA certificates.
    pub ca_certs: Vec<String>,

    /// Client certificates presented to backends (mTLS).
    pub client_certs: Vec<TlsKeyPair>,
}

/// An exposed route.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Path template (e.g. "/users/{id}").
    pub endpoint: String,

    /// HTTP method.
    pub method: String,

    /// Endpoint timeout. Inherits the service timeout when absent.
    pub timeout: Option<String>,

    /// Response encoding. Inherits the service encoding when absent.
    pub output_encoding: Option<String>,

    /// Query string parameters forwarded to backends ("*" forwards all).
    pub input_query_strings: Vec<String>,

    /// Headers forwarded to backends ("*" forwards all).
    pub input_headers: Vec<String>,

    /// Backends merged into the response.
    pub backend: Vec<BackendConfig>,

    pub extra_config: ExtraConfig,
}

/// An upstream service called by an endpoint or an async agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub url_pattern: String,

    pub host: Vec<String>,

    /// HTTP method. Inherits the endpoint method when empty.
    pub method: String,

    /// Response decoding. Defaults to JSON.
    pub encoding: String,

    /// Wraps the response under this key.
    pub group: String,

    /// Extracts the response from this key.
    pub target: String,

    /// The response is an array instead of an object.
    pub is_collection: bool,

    /// Fields kept from the response.
    pub allow: Vec<String>,

    /// Fields removed from the response.
    pub deny: Vec<String>,

    /// Field renames.
    pub mapping: BTreeMap<String, String>,

    pub extra_config: ExtraConfig,
}

/// An asynchronous consumer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AsyncAgentConfig {
    pub name: String,

    /// Message decoding.
    pub encoding: String,

    pub consumer: ConsumerConfig,

    pub connection: ConnectionConfig,

    pub backend: Vec<BackendConfig>,

    pub extra_config: ExtraConfig,
}

/// Consumer settings of an async agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ConsumerConfig {
    pub topic: String,

    /// Number of parallel workers.
    pub workers: i64,

    /// Processing timeout per message (Go duration syntax).
    pub timeout: Option<String>,

    pub max_rate: f64,
}

/// Connection settings of an async agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Reconnection attempts before giving up (0 = forever).
    pub max_retries: i64,

    pub backoff_strategy: String,

    pub health_interval: Option<String>,
}

impl ServiceConfig {
    /// Propagate service level defaults down to endpoints and backends.
    ///
    /// Mirrors what the gateway itself does at start-up, so the auditor sees
    /// the effective values rather than the literal document.
    pub fn normalize(&mut self) {
        let timeout = self
            .timeout
            .get_or_insert_with(|| DEFAULT_TIMEOUT.to_string())
            .clone();
        let encoding = self
            .output_encoding
            .get_or_insert_with(|| DEFAULT_ENCODING.to_string())
            .clone();

        for endpoint in &mut self.endpoints {
            if endpoint.timeout.is_none() {
                endpoint.timeout = Some(timeout.clone());
            }
            if endpoint.output_encoding.is_none() {
                endpoint.output_encoding = Some(encoding.clone());
            }
            if endpoint.method.is_empty() {
                endpoint.method = DEFAULT_METHOD.to_string();
            }
            endpoint.method.make_ascii_uppercase();

            for backend in &mut endpoint.backend {
                if backend.method.is_empty() {
                    backend.method.clone_from(&endpoint.method);
                }
                backend.method.make_ascii_uppercase();
                if backend.encoding.is_empty() {
                    backend.encoding = DEFAULT_ENCODING.to_string();
                }
            }
        }

        for agent in &mut self.async_agent {
            if agent.encoding.is_empty() {
                agent.encoding = DEFAULT_ENCODING.to_string();
            }
            for backend in &mut agent.backend {
                if backend.method.is_empty() {
                    backend.method = DEFAULT_METHOD.to_string();
                }
                if backend.encoding.is_empty() {
                    backend.encoding = DEFAULT_ENCODING.to_string();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_deserializes() {
        let config: ServiceConfig = serde_json::from_str(r#"{"version": 3}"#).unwrap();
        assert_eq!(config.version, 3);
        assert!(config.endpoints.is_empty());
        assert!(config.tls.is_none());
        assert!(config.extra_config.is_empty());
    }

    #[test]
    fn test_normalize_propagates_defaults() {
        let mut config: ServiceConfig = serde_json::from_str(
            r#"{
                "version": 3,
                "timeout": "10s",
                "endpoints": [
                    {"endpoint": "/a", "backend": [{"url_pattern": "/x"}]},
                    {"endpoint": "/b", "method": "post", "timeout": "1s", "output_encoding": "no-op",
                     "backend": [{"url_pattern": "/y"}]}
                ]
            }"#,
        )
        .unwrap();
        config.normalize();

        let a = &config.endpoints[0];
        assert_eq!(a.timeout.as_deref(), Some("10s"));
        assert_eq!(a.output_encoding.as_deref(), Some("json"));
        assert_eq!(a.method, "GET");
        assert_eq!(a.backend[0].method, "GET");
        assert_eq!(a.backend[0].encoding, "json");

        let b = &config.endpoints[1];
        assert_eq!(b.timeout.as_deref(), Some("1s"));
        assert_eq!(b.output_encoding.as_deref(), Some("no-op"));
        assert_eq!(b.method, "POST");
        assert_eq!(b.backend[0].method, "POST");
    }

    #[test]
    fn test_normalize_default_timeout() {
        let mut config = ServiceConfig {
            endpoints: vec![EndpointConfig::default()],
            ..Default::default()
        };
        config.normalize();
        assert_eq!(config.timeout.as_deref(), Some(DEFAULT_TIMEOUT));
        assert_eq!(config.endpoints[0].timeout.as_deref(), Some(DEFAULT_TIMEOUT));
    }
}
