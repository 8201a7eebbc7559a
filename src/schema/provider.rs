use super::{ObjectInfo, Schema};
use crate::error::SchemaError;
use ahash::AHashMap;
use async_trait::async_trait;

/// A source of node type schemas, usually the execution engine's `object_info` endpoint.
///
/// Implementations live outside this crate (an HTTP client, a fixture file, ...). The
/// compiler only ever talks to a provider through a [`super::SchemaCache`].
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Fetches the schema of a single node type.
    async fn get_schema(&self, type_name: &str) -> Result<Option<Schema>, SchemaError>;

    /// Fetches the schemas of every node type the provider knows about.
    async fn get_all_schemas(&self) -> Result<AHashMap<String, Schema>, SchemaError>;
}

/// A provider backed by schemas already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    schemas: AHashMap<String, Schema>,
}

impl StaticSchemaProvider {
    pub fn new(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.type_name.clone(), schema))
                .collect(),
        }
    }
}

impl From<ObjectInfo> for StaticSchemaProvider {
    fn from(info: ObjectInfo) -> Self {
        Self {
            schemas: info.into_schemas(),
        }
    }
}

#[async_trait]
impl SchemaProvider for StaticSchemaProvider {
    async fn get_schema(&self, type_name: &str) -> Result<Option<Schema>, SchemaError> {
        Ok(self.schemas.get(type_name).cloned())
    }

    async fn get_all_schemas(&self) -> Result<AHashMap<String, Schema>, SchemaError> {
        Ok(self.schemas.clone())
    }
}
