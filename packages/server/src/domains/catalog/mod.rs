//! Resource catalog: models, storage seam, and the filter-compose-rank search
//! engine that powers browse and search.

pub mod engine;
pub mod errors;
pub mod facets;
pub mod filter;
pub mod models;
pub mod plan;
pub mod store;

pub use engine::{ResultPage, SearchEngine};
pub use errors::{SearchError, StoreError};
pub use facets::{FacetCount, Facets};
pub use filter::{FilterSpec, SearchParams, SortKey};
pub use models::{Category, NewCategory, NewResource, Platform, Resource, TagSet};
pub use plan::{Predicate, QueryPlan};
pub use store::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
