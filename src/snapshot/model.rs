//! Numeric snapshot types.
//!
//! Field names on the wire are single letters to keep encoded snapshots small.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Extension namespace → namespace-specific integer vector.
///
/// Absence of a key means the extension is not attached at that scope; an
/// empty vector means "attached, default settings".
pub type Components = BTreeMap<String, Vec<i64>>;

/// Snapshot of a whole gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Element 0 is the service flag bit-vector (see [`ServiceFlag`](super::ServiceFlag)).
    #[serde(
        rename = "f",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub flags: Vec<i64>,

    #[serde(
        rename = "a",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub agents: Vec<Agent>,

    #[serde(
        rename = "e",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub endpoints: Vec<Endpoint>,

    #[serde(
        rename = "c",
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "components_or_empty"
    )]
    pub components: Components,
}

/// Snapshot of an async agent.
///
/// `flags`: encoding bit-vector, workers, max retries, timeout in ms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(
        rename = "f",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub flags: Vec<i64>,

    #[serde(
        rename = "b",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub backends: Vec<Backend>,

    #[serde(
        rename = "c",
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "components_or_empty"
    )]
    pub components: Components,
}

/// Snapshot of an endpoint.
///
/// `flags`: encoding bit-vector, query string count, header count, timeout
/// in ms, wildcard bit-vector, unsafe method count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(
        rename = "f",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub flags: Vec<i64>,

    #[serde(
        rename = "b",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub backends: Vec<Backend>,

    #[serde(
        rename = "c",
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "components_or_empty"
    )]
    pub components: Components,
}

/// Snapshot of a backend.
///
/// `flags`: one integer holding the encoding bit plus the backend shape bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backend {
    #[serde(
        rename = "f",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub flags: Vec<i64>,

    #[serde(
        rename = "c",
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "components_or_empty"
    )]
    pub components: Components,
}

/// Reads `null` as the type's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a component map, turning `null` map and `null` entries into empty ones.
fn components_or_empty<'de, D>(deserializer: D) -> Result<Components, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<Vec<i64>>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

/// Value at `index`, or 0 when the vector is shorter.
pub(crate) fn value_at(values: &[i64], index: usize) -> i64 {
    values.get(index).copied().unwrap_or(0)
}

impl Service {
    /// Service flag bit-vector (0 when missing).
    pub fn service_flags(&self) -> i64 {
        value_at(&self.flags, 0)
    }

    /// Visit every component map at every scope.
    pub fn for_each_components_mut(&mut self, mut f: impl FnMut(&mut Components)) {
        f(&mut self.components);
        for agent in &mut self.agents {
            f(&mut agent.components);
            for backend in &mut agent.backends {
                f(&mut backend.components);
            }
        }
        for endpoint in &mut self.endpoints {
            f(&mut endpoint.components);
            for backend in &mut endpoint.backends {
                f(&mut backend.components);
            }
        }
    }

    /// Every backend snapshot, endpoint backends first, then agent backends.
    pub fn all_backends(&self) -> impl Iterator<Item = &Backend> {
        self.endpoints
            .iter()
            .flat_map(|e| e.backends.iter())
            .chain(self.agents.iter().flat_map(|a| a.backends.iter()))
    }
}

impl Endpoint {
    /// Flag at `index` (0 when missing).
    pub fn flag(&self, index: usize) -> i64 {
        value_at(&self.flags, index)
    }
}

impl Agent {
    /// Flag at `index` (0 when missing).
    pub fn flag(&self, index: usize) -> i64 {
        value_at(&self.flags, index)
    }
}

impl Backend {
    /// Encoding and shape bit-vector (0 when missing).
    pub fn shape(&self) -> i64 {
        value_at(&self.flags, 0)
    }
}
