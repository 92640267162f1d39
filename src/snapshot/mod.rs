//! Numeric snapshot model.
//!
//! # Data Flow
//! ```text
//! ServiceConfig
//!     → parser (projection)
//!     → Service { flags, agents, endpoints, components }
//!     → audit rules (read only)
//!     → codec (encode / decode)
//! ```
//!
//! # Design Decisions
//! - Fixed shape: every scope is a flag vector, children and a component map
//! - Bit positions and vector indices are append-only (see `bits.rs`)
//! - `Clone` is a deep copy; nothing is shared between snapshots

pub mod bits;
pub mod model;
pub mod namespaces;

pub use bits::{
    has_bit, with_bit, AgentIndex, BackendFlag, Encoding, EndpointIndex, ServiceFlag, WildcardFlag,
};
pub use model::{Agent, Backend, Components, Endpoint, Service};
