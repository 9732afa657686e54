//! Facet counts reported alongside each result page.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::models::{Category, Platform, Resource};
use crate::common::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Per-dimension match counts over the filtered (not paginated) set.
/// Each list is ordered by count descending, then value ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub categories: Vec<FacetCount>,
    pub platforms: Vec<FacetCount>,
    pub tags: Vec<FacetCount>,
}

/// Accumulates facet counts one matched resource at a time.
#[derive(Debug)]
pub struct FacetCounter<'a> {
    slugs: HashMap<CategoryId, &'a str>,
    categories: BTreeMap<&'a str, u64>,
    platforms: BTreeMap<Platform, u64>,
    tags: BTreeMap<String, u64>,
}

impl<'a> FacetCounter<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            slugs: categories
                .iter()
                .map(|c| (c.id, c.slug.as_str()))
                .collect(),
            categories: BTreeMap::new(),
            platforms: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, resource: &Resource) {
        // Resources pointing at a category the store did not list have no slug
        // to report under.
        if let Some(slug) = self.slugs.get(&resource.category_id) {
            *self.categories.entry(*slug).or_default() += 1;
        }
        *self.platforms.entry(resource.platform).or_default() += 1;
        for tag in &resource.tags {
            match self.tags.get_mut(tag.as_str()) {
                Some(count) => *count += 1,
                None => {
                    self.tags.insert(tag.clone(), 1);
                }
            }
        }
    }

    pub fn finish(self) -> Facets {
        Facets {
            categories: ranked(self.categories.into_iter().map(|(k, v)| (k.to_string(), v))),
            platforms: ranked(self.platforms.into_iter().map(|(k, v)| (k.to_string(), v))),
            tags: ranked(self.tags),
        }
    }
}

fn ranked(counts: impl IntoIterator<Item = (String, u64)>) -> Vec<FacetCount> {
    let mut facets: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value, count })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facets
}
