//! Schemas the type checker resolves field paths against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level fields of one schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub id: String,
    /// Field name to declared type.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl SchemaInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.insert(name.into(), ty.into());
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Registered schemas by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaInfo>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any previous one with the same id.
    pub fn register(&mut self, schema: SchemaInfo) {
        self.schemas.insert(schema.id.clone(), schema);
    }

    pub fn with_schema(mut self, schema: SchemaInfo) -> Self {
        self.register(schema);
        self
    }

    pub fn get(&self, id: &str) -> Option<&SchemaInfo> {
        self.schemas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaInfo> {
        self.schemas.values()
    }
}
