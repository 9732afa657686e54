//! Test fixtures for building catalogs.
//!
//! Timestamps are fixed offsets from a base instant so orderings never depend
//! on the wall clock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::stream::{self, BoxStream, StreamExt};

use catalog_core::common::PageLimits;
use catalog_core::domains::catalog::models::slugify;
use catalog_core::domains::catalog::{
    CatalogStore, Category, MemoryCatalogStore, NewCategory, NewResource, Platform, Resource,
    SearchEngine, StoreError,
};

/// Base instant for fixture timestamps.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// `t0` plus `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

pub fn category(name: &str, platform: Platform) -> Category {
    NewCategory::builder()
        .name(name)
        .platform(platform)
        .created_at(t0())
        .build()
        .into()
}

/// Resource with the fields search looks at; everything else defaulted.
pub fn resource(
    title: &str,
    category: &Category,
    platform: Platform,
    tags: &[&str],
    downloads: u64,
    likes: u64,
    created_minutes: i64,
) -> Resource {
    NewResource::builder()
        .title(title)
        .description(format!("{} for testing", title))
        .tags(tags.iter().map(|t| t.to_string()).collect::<Vec<_>>())
        .category_id(category.id)
        .platform(platform)
        .file_url(format!("https://files.example.com/{}.zip", slugify(title)))
        .download_count(downloads)
        .like_count(likes)
        .created_at(at(created_minutes))
        .build()
        .into()
}

/// A small mixed catalog.
///
/// | title         | category | platform | tags              | dl  | likes | created |
/// |---------------|----------|----------|-------------------|-----|-------|---------|
/// | Sky Game      | games    | pc       | action, co-op     | 10  | 5     | 0       |
/// | App One       | apps     | android  | tools             | 50  | 2     | 10      |
/// | Dungeon Crawl | games    | pc       | action, rpg       | 30  | 40    | 20      |
/// | Pixel Editor  | tools    | pc       | art, tools        | 30  | 1     | 30      |
/// | Skyline Run   | games    | mobile   | action, co-op, rpg| 5   | 12    | 40      |
/// | zen garden    | apps     | ios      | relax             | 0   | 0     | 50      |
pub struct SampleCatalog {
    pub games: Category,
    pub apps: Category,
    pub tools: Category,
    pub resources: Vec<Resource>,
}

impl SampleCatalog {
    pub fn new() -> Self {
        let games = category("Games", Platform::Pc);
        let apps = category("Apps", Platform::Mobile);
        let tools = category("Tools", Platform::Other);

        let resources = vec![
            resource("Sky Game", &games, Platform::Pc, &["action", "co-op"], 10, 5, 0),
            resource("App One", &apps, Platform::Android, &["tools"], 50, 2, 10),
            resource("Dungeon Crawl", &games, Platform::Pc, &["action", "rpg"], 30, 40, 20),
            resource("Pixel Editor", &tools, Platform::Pc, &["art", "tools"], 30, 1, 30),
            resource(
                "Skyline Run",
                &games,
                Platform::Mobile,
                &["action", "co-op", "rpg"],
                5,
                12,
                40,
            ),
            resource("zen garden", &apps, Platform::Ios, &["relax"], 0, 0, 50),
        ];

        Self {
            games,
            apps,
            tools,
            resources,
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        vec![self.games.clone(), self.apps.clone(), self.tools.clone()]
    }

    pub fn store(&self) -> MemoryCatalogStore {
        MemoryCatalogStore::with_data(self.categories(), self.resources.clone())
    }

    pub fn engine(&self) -> SearchEngine {
        engine_over(self.store())
    }
}

pub fn engine_over(store: impl CatalogStore + 'static) -> SearchEngine {
    SearchEngine::new(Arc::new(store), PageLimits::default())
}

/// Store whose reads fail, optionally after yielding some resources first.
pub struct FailingStore {
    pub categories_fail: bool,
    pub resources_before_failure: Vec<Resource>,
}

impl FailingStore {
    /// Every read fails.
    pub fn down() -> Self {
        Self {
            categories_fail: true,
            resources_before_failure: Vec::new(),
        }
    }

    /// Categories load, then the resource stream breaks after `resources`.
    pub fn mid_stream(resources: Vec<Resource>) -> Self {
        Self {
            categories_fail: false,
            resources_before_failure: resources,
        }
    }
}

#[async_trait]
impl CatalogStore for FailingStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        if self.categories_fail {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(Vec::new())
    }

    fn list_resources(&self) -> BoxStream<'_, Result<Resource, StoreError>> {
        let items = self.resources_before_failure.iter().cloned().map(Ok);
        let failure = std::iter::once(Err(StoreError::Unavailable("cursor reset".into())));
        stream::iter(items.chain(failure)).boxed()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}
