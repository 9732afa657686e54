//! Search requests.
//!
//! A [`FilterSpec`] is the immutable description of one browse/search
//! request. [`SearchParams`] is the stringly-typed form it arrives in from a
//! query string or the CLI; parsing it is the only place raw user input is
//! interpreted.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::errors::SearchError;
use super::models::{Platform, TagSet};
use crate::common::pagination::DEFAULT_PAGE_SIZE;

// =============================================================================
// Sort keys
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Recency,
    /// Most downloaded first.
    Downloads,
    /// Most liked first.
    Likes,
    /// Title A-Z, ignoring case.
    Alphabetical,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recency => "recency",
            SortKey::Downloads => "downloads",
            SortKey::Likes => "likes",
            SortKey::Alphabetical => "alphabetical",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recency" | "created_at" | "newest" => Ok(SortKey::Recency),
            "downloads" => Ok(SortKey::Downloads),
            "likes" => Ok(SortKey::Likes),
            "alphabetical" | "title" => Ok(SortKey::Alphabetical),
            other => Err(SearchError::invalid(
                "sort",
                format!(
                    "unknown sort `{}` (expected recency, downloads, likes or alphabetical)",
                    other
                ),
            )),
        }
    }
}

// =============================================================================
// FilterSpec
// =============================================================================

/// One search request. Fields are read-only once built.
///
/// ```rust
/// use catalog_core::domains::catalog::{FilterSpec, SortKey};
///
/// let spec = FilterSpec::builder()
///     .search_text("sky")
///     .sort_key(SortKey::Downloads)
///     .build();
/// assert!(spec.has_active_filters());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct FilterSpec {
    #[builder(default, setter(strip_option, into))]
    search_text: Option<String>,
    #[builder(default, setter(strip_option, into))]
    category_slug: Option<String>,
    #[builder(default, setter(strip_option))]
    platform: Option<Platform>,
    #[builder(default, setter(into))]
    tags: TagSet,
    #[builder(default)]
    sort_key: SortKey,
    #[builder(default = 1)]
    page: u32,
    #[builder(default = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FilterSpec {
    /// Search text with surrounding whitespace removed; `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        non_blank(self.search_text.as_deref())
    }

    /// Category slug with surrounding whitespace removed; `None` when blank.
    pub fn category_slug(&self) -> Option<&str> {
        non_blank(self.category_slug.as_deref())
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether any filter dimension narrows the result set. Sort and paging
    /// never count.
    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    pub fn active_filter_count(&self) -> usize {
        [
            self.search_text().is_some(),
            self.category_slug().is_some(),
            self.platform.is_some(),
            !self.tags.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Raw parameters
// =============================================================================

/// Search parameters exactly as a client sent them.
///
/// Every field is a string so that malformed numbers surface as
/// `InvalidFilter` naming the field instead of a generic rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub platform: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl SearchParams {
    /// Collect parameters from decoded `key=value` pairs, as they appear in a
    /// query string. Unknown keys are ignored; a known key sent twice is an
    /// `InvalidFilter` naming it.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            let (field, slot) = match key.as_ref() {
                "search" => ("search", &mut params.search),
                "category" => ("category", &mut params.category),
                "platform" => ("platform", &mut params.platform),
                "tags" => ("tags", &mut params.tags),
                "sort" => ("sort", &mut params.sort),
                "page" => ("page", &mut params.page),
                "pageSize" => ("pageSize", &mut params.page_size),
                _ => continue,
            };
            if slot.is_some() {
                return Err(SearchError::invalid(
                    field,
                    format!("`{}` may be given at most once", field),
                ));
            }
            *slot = Some(value.into());
        }
        Ok(params)
    }

    /// Parse into a [`FilterSpec`]. `default_page_size` applies when no
    /// `pageSize` was sent. Page bounds are checked later against the
    /// engine's limits.
    pub fn into_filter_spec(self, default_page_size: u32) -> Result<FilterSpec, SearchError> {
        let platform = match non_blank(self.platform.as_deref()) {
            Some(raw) => Some(
                raw.to_lowercase()
                    .parse::<Platform>()
                    .map_err(|e| SearchError::invalid("platform", e.to_string()))?,
            ),
            None => None,
        };

        let sort_key = match non_blank(self.sort.as_deref()) {
            Some(raw) => raw.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        let tags: TagSet = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        let page = parse_number("page", self.page.as_deref())?.unwrap_or(1);
        let page_size =
            parse_number("pageSize", self.page_size.as_deref())?.unwrap_or(default_page_size);

        Ok(FilterSpec {
            search_text: self.search.map(|s| s.trim().to_string()),
            category_slug: self.category.map(|s| s.trim().to_string()),
            platform,
            tags,
            sort_key,
            page,
            page_size,
        })
    }
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<u32>, SearchError> {
    match non_blank(raw) {
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| SearchError::invalid(field, format!("`{}` is not a positive integer", raw))),
        None => Ok(None),
    }
}
