//! Filter-compose-rank search over a [`CatalogStore`].
//!
//! `search` is a pure read: compile the request into a [`QueryPlan`], stream
//! the store's resources through it, keep only what the requested page can
//! need, and report the exact match count and facets from that same pass.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::errors::{SearchError, StoreError};
use super::facets::{FacetCounter, Facets};
use super::filter::FilterSpec;
use super::models::{Category, Resource};
use super::plan::QueryPlan;
use super::store::CatalogStore;
use crate::common::PageLimits;

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<Resource>,
    /// Resources matching the filters, regardless of page.
    pub total_matched: u64,
    pub page: u32,
    pub page_size: u32,
    pub facets: Facets,
}

impl ResultPage {
    /// Number of pages needed to show every match (0 when nothing matched).
    pub fn total_pages(&self) -> u64 {
        self.total_matched.div_ceil(u64::from(self.page_size.max(1)))
    }
}

/// Stateless search engine. Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn CatalogStore>,
    limits: PageLimits,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn CatalogStore>, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Categories for populating filter selectors, ordered by name.
    pub async fn categories(&self) -> Result<Vec<Category>, SearchError> {
        self.store
            .list_categories()
            .await
            .map_err(|e| storage_failure("list_categories", e))
    }

    pub async fn search(&self, spec: &FilterSpec) -> Result<ResultPage, SearchError> {
        let categories = self.categories().await?;
        let plan = QueryPlan::compile(spec, &categories, &self.limits)?;
        let window = plan.window();

        let mut top = TopWindow::new(window.retain_count());
        let mut facets = FacetCounter::new(&categories);
        let mut total_matched: u64 = 0;

        let mut resources = self.store.list_resources();
        while let Some(resource) = resources
            .try_next()
            .await
            .map_err(|e| storage_failure("list_resources", e))?
        {
            if !plan.matches(&resource) {
                continue;
            }
            total_matched += 1;
            facets.record(&resource);
            top.push(resource, |a, b| plan.compare(a, b));
        }

        let items = top.into_page(window.clamp(usize::MAX), |a, b| plan.compare(a, b));

        debug!(
            active_filters = plan.predicates().len(),
            sort = %plan.sort_key(),
            total_matched,
            page = window.page,
            returned = items.len(),
            "Catalog search"
        );

        Ok(ResultPage {
            items,
            total_matched,
            page: window.page,
            page_size: window.page_size,
            facets: facets.finish(),
        })
    }
}

fn storage_failure(operation: &'static str, error: StoreError) -> SearchError {
    warn!(operation, error = %error, "Catalog store failed");
    SearchError::StorageUnavailable(error)
}

/// Keeps the first `keep` items of a stream under a total order without
/// holding the whole stream.
///
/// Items accumulate until the buffer reaches twice `keep`, then a selection
/// pass discards everything past position `keep`. Amortized linear time,
/// `O(keep)` memory.
struct TopWindow {
    keep: usize,
    buffer: Vec<Resource>,
}

impl TopWindow {
    fn new(keep: usize) -> Self {
        Self {
            keep,
            buffer: Vec::new(),
        }
    }

    fn push(&mut self, resource: Resource, cmp: impl Fn(&Resource, &Resource) -> Ordering) {
        if self.keep == 0 {
            return;
        }
        self.buffer.push(resource);
        if self.buffer.len() >= self.keep.saturating_mul(2) {
            self.compact(&cmp);
        }
    }

    fn compact(&mut self, cmp: &impl Fn(&Resource, &Resource) -> Ordering) {
        if self.buffer.len() > self.keep {
            self.buffer.select_nth_unstable_by(self.keep - 1, cmp);
            self.buffer.truncate(self.keep);
        }
    }

    /// Sort what is left and cut out `range`, clamped to what was kept.
    fn into_page(
        mut self,
        range: std::ops::Range<usize>,
        cmp: impl Fn(&Resource, &Resource) -> Ordering,
    ) -> Vec<Resource> {
        self.compact(&cmp);
        self.buffer.sort_unstable_by(&cmp);
        let end = range.end.min(self.buffer.len());
        let start = range.start.min(end);
        self.buffer.drain(start..end).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::common::{CategoryId, ResourceId};
    use crate::domains::catalog::filter::SortKey;
    use crate::domains::catalog::models::{NewResource, Platform};
    use crate::domains::catalog::plan::compare;

    fn numbered(n: u128) -> Resource {
        NewResource::builder()
            .id(ResourceId::from_uuid(Uuid::from_u128(n)))
            .title(format!("r{n}"))
            .category_id(CategoryId::nil())
            .platform(Platform::Pc)
            .created_at(Utc.timestamp_opt((n as i64 * 7919) % 1000, 0).unwrap())
            .build()
            .into()
    }

    #[test]
    fn top_window_matches_full_sort() {
        let all: Vec<Resource> = (1..=250).map(numbered).collect();
        let cmp = |a: &Resource, b: &Resource| compare(SortKey::Recency, a, b);

        let mut expected = all.clone();
        expected.sort_by(cmp);

        for (keep, range) in [(10, 0..10), (30, 20..30), (1, 0..1), (300, 240..300)] {
            let mut top = TopWindow::new(keep);
            for r in all.iter().cloned() {
                top.push(r, cmp);
            }
            let page = top.into_page(range.clone(), cmp);
            let end = range.end.min(expected.len());
            assert_eq!(page, expected[range.start..end].to_vec(), "keep={keep}");
        }
    }

    #[test]
    fn top_window_with_zero_keep_holds_nothing() {
        let mut top = TopWindow::new(0);
        top.push(numbered(1), |a, b| compare(SortKey::Recency, a, b));
        assert!(top.buffer.is_empty());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = ResultPage {
            items: vec![],
            total_matched: 41,
            page: 1,
            page_size: 20,
            facets: Facets::default(),
        };
        assert_eq!(page.total_pages(), 3);
    }
}
