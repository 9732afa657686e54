//! Storage seam for the catalog.
//!
//! Search reads through [`CatalogStore`] and nothing else. Stores own the data
//! and every mutation of it; search only consumes snapshots.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sqlx::PgPool;

use super::errors::StoreError;
use super::models::{category_order, Category, Resource};
use crate::common::ResourceId;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories, ordered by name then slug.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Every resource, in no particular order. Implementations may page or
    /// stream internally; callers consume items one at a time.
    fn list_resources(&self) -> BoxStream<'_, Result<Resource, StoreError>>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// PostgreSQL
// =============================================================================

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Category::find_all(&self.pool).await.map_err(Into::into)
    }

    fn list_resources(&self) -> BoxStream<'_, Result<Resource, StoreError>> {
        Resource::stream_all(&self.pool)
            .map_err(StoreError::from)
            .boxed()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Default)]
struct Catalog {
    categories: Vec<Category>,
    resources: Vec<Resource>,
}

/// Process-local store for tests, demos and fixtures.
///
/// Reads clone a snapshot under the read lock, so a search never observes a
/// half-applied mutation and never holds the lock across an await.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalog: RwLock<Catalog>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(categories: Vec<Category>, resources: Vec<Resource>) -> Self {
        Self {
            catalog: RwLock::new(Catalog {
                categories,
                resources,
            }),
        }
    }

    pub fn insert_category(&self, category: Category) {
        self.write(|catalog| catalog.categories.push(category));
    }

    pub fn insert_resource(&self, resource: Resource) {
        self.write(|catalog| catalog.resources.push(resource));
    }

    /// Count one download; returns the new total.
    pub fn record_download(&self, id: ResourceId) -> Result<u64, StoreError> {
        self.bump(id, |resource| &mut resource.download_count)
    }

    /// Count one like; returns the new total.
    pub fn record_like(&self, id: ResourceId) -> Result<u64, StoreError> {
        self.bump(id, |resource| &mut resource.like_count)
    }

    pub fn resource_count(&self) -> usize {
        self.read(|catalog| catalog.resources.len())
    }

    fn bump(
        &self,
        id: ResourceId,
        counter: impl Fn(&mut Resource) -> &mut u64,
    ) -> Result<u64, StoreError> {
        self.write(|catalog| -> Result<u64, StoreError> {
            let resource = catalog
                .resources
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(StoreError::ResourceNotFound(id))?;
            let count = counter(resource);
            *count = count.saturating_add(1);
            let total = *count;
            resource.updated_at = chrono::Utc::now();
            Ok(total)
        })
    }

    // A poisoned lock only means a writer panicked mid-push; the Vec itself is
    // still structurally valid, so keep serving it.
    fn read<T>(&self, f: impl FnOnce(&Catalog) -> T) -> T {
        let guard = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Catalog) -> T) -> T {
        let mut guard = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.read(|catalog| catalog.categories.clone());
        categories.sort_by(category_order);
        Ok(categories)
    }

    fn list_resources(&self) -> BoxStream<'_, Result<Resource, StoreError>> {
        let snapshot = self.read(|catalog| catalog.resources.clone());
        stream::iter(snapshot.into_iter().map(Ok)).boxed()
    }
}
