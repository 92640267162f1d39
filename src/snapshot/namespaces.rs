//! Extension namespace identifiers.

pub const SERVER_PLUGIN: &str = "plugin/http-server";
pub const CLIENT_PLUGIN: &str = "plugin/http-client";
pub const MODIFIER_PLUGIN: &str = "plugin/req-resp-modifier";
pub const PROXY: &str = "proxy";
pub const ROUTER: &str = "router";
pub const REVOKER: &str = "auth/revoker";
pub const BOT_DETECTOR: &str = "security/bot-detector";
pub const OPENCENSUS: &str = "telemetry/opencensus";
pub const RATELIMIT_ROUTER: &str = "qos/ratelimit/router";
pub const RATELIMIT_PROXY: &str = "qos/ratelimit/proxy";
pub const RATELIMIT_SERVICE: &str = "qos/ratelimit/service";
pub const NEWRELIC: &str = "telemetry/newrelic";
pub const GANALYTICS: &str = "telemetry/ganalytics";
pub const INSTANA: &str = "telemetry/instana";
pub const JWT_VALIDATOR: &str = "auth/validator";
pub const JWT_SIGNER: &str = "auth/signer";
pub const API_KEYS: &str = "auth/api-keys";
pub const HTTP_SECURE: &str = "security/http";
pub const CORS: &str = "security/cors";
pub const LOGGING: &str = "telemetry/logging";
pub const GELF: &str = "telemetry/gelf";
pub const LOGSTASH: &str = "telemetry/logstash";
pub const METRICS: &str = "telemetry/metrics";
pub const MOESIF: &str = "telemetry/moesif";
pub const OPENTELEMETRY: &str = "telemetry/opentelemetry";
pub const BACKEND_GRPC: &str = "backend/grpc";
pub const BASIC_AUTH: &str = "auth/basic";
pub const VIRTUAL_HOST: &str = "server/virtualhost";
pub const SERVER_STATIC_FILESYSTEM: &str = "server/static-filesystem";
pub const BACKEND_STATIC_FILESYSTEM: &str = "backend/static-filesystem";
pub const BACKEND_HTTP_CLIENT: &str = "backend/http/client";
pub const GRPC: &str = "grpc";
pub const RESPONSE_BODY_GENERATOR: &str = "modifier/response-body-generator";
pub const RESPONSE_BODY: &str = "modifier/response-body";
pub const RESPONSE_HEADERS: &str = "modifier/response-headers";
pub const RESPONSE_JSON_SCHEMA: &str = "validation/response-json-schema";
pub const WEBSOCKET: &str = "websocket";
pub const LUA_PROXY: &str = "modifier/lua-proxy";
pub const LUA_BACKEND: &str = "modifier/lua-backend";
pub const LUA_ENDPOINT: &str = "modifier/lua-endpoint";
pub const HTTP_CACHE: &str = "qos/http-cache";
pub const CIRCUIT_BREAKER: &str = "qos/circuit-breaker";
pub const AI_LLM: &str = "ai/llm";
pub const AI_MCP: &str = "ai/mcp";
