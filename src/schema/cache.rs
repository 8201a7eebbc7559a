use super::{Schema, SchemaProvider, StaticSchemaProvider};
use ahash::AHashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Read-through cache of node type schemas.
///
/// Empty when created. The first lookup performs a single bulk fetch from the
/// provider; every later lookup is a plain map read. Concurrent first lookups
/// share that one fetch. A failed or empty fetch leaves the cache empty for good,
/// so every node compiled against it ends up disabled.
pub struct SchemaCache {
    provider: Arc<dyn SchemaProvider>,
    schemas: OnceCell<AHashMap<String, Arc<Schema>>>,
}

impl SchemaCache {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self {
            provider,
            schemas: OnceCell::new(),
        }
    }

    /// A cache over schemas that are already in memory.
    pub fn preloaded(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self::new(Arc::new(StaticSchemaProvider::new(schemas)))
    }

    /// Returns the schema for `type_name`, populating the cache on first use.
    pub async fn lookup(&self, type_name: &str) -> Option<Arc<Schema>> {
        let schemas = self.schemas.get_or_init(|| self.populate()).await;
        match schemas.get(type_name) {
            Some(schema) => {
                tracing::debug!("Schema for '{}' served from cache", type_name);
                Some(Arc::clone(schema))
            }
            None => {
                tracing::warn!("No schema known for node type '{}'", type_name);
                None
            }
        }
    }

    /// Whether the one-time bulk fetch has already happened.
    pub fn is_populated(&self) -> bool {
        self.schemas.initialized()
    }

    /// Number of cached schemas; zero until populated.
    pub fn len(&self) -> usize {
        self.schemas.get().map_or(0, |schemas| schemas.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn populate(&self) -> AHashMap<String, Arc<Schema>> {
        tracing::info!("Retrieving all node type schemas from provider");
        match self.provider.get_all_schemas().await {
            Ok(schemas) if schemas.is_empty() => {
                tracing::warn!("Schema provider returned no node types");
                AHashMap::new()
            }
            Ok(schemas) => {
                tracing::debug!("Cached {} node type schemas", schemas.len());
                schemas
                    .into_iter()
                    .map(|(name, schema)| (name, Arc::new(schema)))
                    .collect()
            }
            Err(e) => {
                tracing::warn!("Unable to retrieve node type schemas: {}", e);
                AHashMap::new()
            }
        }
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("populated", &self.is_populated())
            .field("len", &self.len())
            .finish()
    }
}
