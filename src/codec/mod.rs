//! Compact snapshot codec.
//!
//! # Data Flow
//! ```text
//! encode: Service → clone → alias.rs (namespace → code) → JSON → gzip (best)
//! decode: bytes → gunzip → JSON → alias.rs (code → namespace) → Service
//! ```
//!
//! # Design Decisions
//! - No version field in the output; compatibility rests on append-only
//!   bit positions and alias codes
//! - Empty containers are omitted on the wire and restored on decode
//! - Component maps are ordered, so equal snapshots encode to equal bytes

pub mod alias;

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::snapshot::Service;

/// Failures of [`encode`] and [`decode`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to compress snapshot: {0}")]
    Compress(#[source] std::io::Error),

    #[error("failed to decompress snapshot: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to deserialize snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Encode a snapshot into compact bytes. The input is left untouched.
pub fn encode(service: &Service) -> Result<Vec<u8>, CodecError> {
    let mut aliased = service.clone();
    aliased.for_each_components_mut(alias::shorten);

    let json = serde_json::to_vec(&aliased).map_err(CodecError::Serialize)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json).map_err(CodecError::Compress)?;
    let bytes = encoder.finish().map_err(CodecError::Compress)?;

    tracing::debug!(raw = json.len(), compressed = bytes.len(), "Snapshot encoded");
    Ok(bytes)
}

/// Decode bytes produced by [`encode`].
///
/// Fails without a partial result on corrupt or truncated input.
pub fn decode(bytes: &[u8]) -> Result<Service, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::Decompress(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "empty input",
        )));
    }

    let mut json = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut json)
        .map_err(CodecError::Decompress)?;

    let mut service: Service = serde_json::from_slice(&json).map_err(CodecError::Deserialize)?;
    service.for_each_components_mut(alias::expand);
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Backend, Components, Endpoint};
    use crate::snapshot::namespaces as ns;

    fn sample() -> Service {
        Service {
            flags: vec![1 << 5],
            agents: vec![],
            endpoints: vec![Endpoint {
                flags: vec![2, 0, 0, 2000, 0, 1],
                backends: vec![Backend {
                    flags: vec![2 | 1 << 7],
                    components: Components::from([(ns::HTTP_CACHE.to_string(), vec![3])]),
                }],
                components: Components::from([
                    (ns::JWT_VALIDATOR.to_string(), vec![]),
                    ("custom/thing".to_string(), vec![7, 8]),
                ]),
            }],
            components: Components::from([(ns::ROUTER.to_string(), vec![1 << 17])]),
        }
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let bytes = encode(&original).unwrap();
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_encode_does_not_touch_input() {
        let original = sample();
        let _ = encode(&original).unwrap();
        assert_eq!(original, sample());
    }

    #[test]
    fn test_wire_uses_short_codes() {
        let bytes = encode(&sample()).unwrap();
        let mut json = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut json).unwrap();
        assert!(json.contains(r#""c":{"e":[131072]}"#));
        assert!(json.contains(r#""10":[3]"#));
        assert!(json.contains(r#""custom/thing":[7,8]"#));
        assert!(!json.contains(ns::ROUTER));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(encode(&sample()).unwrap(), encode(&sample()).unwrap());
    }

    #[test]
    fn test_empty_snapshot() {
        let bytes = encode(&Service::default()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), Service::default());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(decode(&[]), Err(CodecError::Decompress(_))));
        assert!(matches!(decode(b"not gzip"), Err(CodecError::Decompress(_))));

        let bytes = encode(&sample()).unwrap();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn test_rejects_valid_gzip_with_bad_payload() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(br#"{"f": "nope"}"#).unwrap();
        let bytes = encoder.finish().unwrap();
        assert!(matches!(decode(&bytes), Err(CodecError::Deserialize(_))));
    }
}
