// Ordered node-id -> record mapping; serializes as a JSON object in insertion order

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::NodeRecord;

/// Node records keyed by node id, kept in configured order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMap(Vec<(String, NodeRecord)>);

impl NodeMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Inserts or replaces; a replaced entry keeps its original position.
    pub fn insert(&mut self, node_id: impl Into<String>, record: NodeRecord) {
        let node_id = node_id.into();
        match self.0.iter_mut().find(|(id, _)| *id == node_id) {
            Some((_, existing)) => *existing = record,
            None => self.0.push((node_id, record)),
        }
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeRecord> {
        self.0.iter().find(|(id, _)| id == node_id).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRecord)> {
        self.0.iter().map(|(id, r)| (id.as_str(), r))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, NodeRecord)> for NodeMap {
    fn from_iter<I: IntoIterator<Item = (String, NodeRecord)>>(iter: I) -> Self {
        let mut map = NodeMap::new();
        for (id, record) in iter {
            map.insert(id, record);
        }
        map
    }
}

impl Serialize for NodeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, record) in &self.0 {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NodeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeMapVisitor;

        impl<'de> Visitor<'de> for NodeMapVisitor {
            type Value = NodeMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of node id to node record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<NodeMap, A::Error> {
                let mut map = NodeMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, record)) = access.next_entry::<String, NodeRecord>()? {
                    map.insert(id, record);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(NodeMapVisitor)
    }
}
