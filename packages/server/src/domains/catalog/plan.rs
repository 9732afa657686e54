//! Compiling a [`FilterSpec`] into an executable [`QueryPlan`].
//!
//! Compilation is where a request is validated against the world: page bounds
//! against the configured limits and the category slug against the known
//! categories. A plan that compiles can only fail later on storage errors.

use std::cmp::Ordering;

use super::errors::SearchError;
use super::filter::{FilterSpec, SortKey};
use super::models::{Category, Platform, Resource, TagSet};
use crate::common::{CategoryId, PageArgs, PageLimits, PageWindow};

/// A single inclusion test. Inactive dimensions have no predicate at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Lowercased needle, matched as a substring of title or description.
    Text(String),
    Category(CategoryId),
    Platform(Platform),
    /// Every tag must be present.
    Tags(TagSet),
}

impl Predicate {
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Predicate::Text(needle) => {
                contains_ignore_case(&resource.title, needle)
                    || contains_ignore_case(&resource.description, needle)
            }
            Predicate::Category(id) => resource.category_id == *id,
            Predicate::Platform(platform) => resource.platform == *platform,
            Predicate::Tags(required) => resource.tags.contains_all(required),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryPlan {
    predicates: Vec<Predicate>,
    sort_key: SortKey,
    window: PageWindow,
}

impl QueryPlan {
    pub fn compile(
        spec: &FilterSpec,
        categories: &[Category],
        limits: &PageLimits,
    ) -> Result<Self, SearchError> {
        let window = PageArgs {
            page: spec.page(),
            page_size: spec.page_size(),
        }
        .validate(limits)?;

        let mut predicates = Vec::with_capacity(4);

        if let Some(text) = spec.search_text() {
            predicates.push(Predicate::Text(text.to_lowercase()));
        }

        if let Some(slug) = spec.category_slug() {
            let category = categories
                .iter()
                .find(|category| category.slug == slug)
                .ok_or_else(|| {
                    SearchError::invalid("category", format!("unknown category `{}`", slug))
                })?;
            predicates.push(Predicate::Category(category.id));
        }

        if let Some(platform) = spec.platform() {
            predicates.push(Predicate::Platform(platform));
        }

        if !spec.tags().is_empty() {
            predicates.push(Predicate::Tags(spec.tags().clone()));
        }

        Ok(Self {
            predicates,
            sort_key: spec.sort_key(),
            window,
        })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Conjunction of all predicates; an empty plan matches everything.
    pub fn matches(&self, resource: &Resource) -> bool {
        self.predicates.iter().all(|p| p.matches(resource))
    }

    pub fn compare(&self, a: &Resource, b: &Resource) -> Ordering {
        compare(self.sort_key, a, b)
    }
}

/// Total order for `sort_key`. Ids are unique, so two distinct resources never
/// compare equal.
pub fn compare(sort_key: SortKey, a: &Resource, b: &Resource) -> Ordering {
    match sort_key {
        SortKey::Recency => by_recency(a, b),
        SortKey::Downloads => b
            .download_count
            .cmp(&a.download_count)
            .then_with(|| by_recency(a, b)),
        SortKey::Likes => b
            .like_count
            .cmp(&a.like_count)
            .then_with(|| by_recency(a, b)),
        SortKey::Alphabetical => lowercase_chars(&a.title)
            .cmp(lowercase_chars(&b.title))
            .then_with(|| a.id.cmp(&b.id)),
    }
}

fn by_recency(a: &Resource, b: &Resource) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

fn lowercase_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    // ASCII fast path avoids allocating a lowercased copy per resource.
    if haystack.is_ascii() && needle.is_ascii() {
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|w| w.eq_ignore_ascii_case(needle.as_bytes()));
    }
    haystack.to_lowercase().contains(needle)
}
