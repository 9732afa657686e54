//! PgCatalogStore against a real database.
//!
//! Needs Docker. Run with: cargo test --test postgres_store_tests -- --ignored

mod common;

use std::sync::Arc;

use crate::common::{at, TestHarness};
use catalog_core::common::{PageLimits, ResourceId};
use catalog_core::domains::catalog::models::slugify;
use catalog_core::domains::catalog::{
    CatalogStore, Category, FilterSpec, MemoryCatalogStore, NewCategory, NewResource,
    PgCatalogStore, Platform, Resource, SearchEngine, SortKey, TagSet,
};
use futures::TryStreamExt;
use test_context::test_context;
use uuid::Uuid;

/// The database is shared between tests, so every fixture carries a unique
/// marker that searches can filter on.
fn marker() -> String {
    format!("m{}", Uuid::new_v4().simple())
}

async fn create_category(ctx: &TestHarness, name: &str) -> Category {
    Category::create(
        NewCategory::builder()
            .name(name)
            .slug(slugify(&format!("{} {}", name, Uuid::new_v4())))
            .platform(Platform::Pc)
            .build(),
        &ctx.db_pool,
    )
    .await
    .expect("Failed to create category")
}

async fn create_resource(
    ctx: &TestHarness,
    category: &Category,
    title: &str,
    tags: &[&str],
    downloads: u64,
    created_minutes: i64,
) -> Resource {
    Resource::create(
        NewResource::builder()
            .title(title)
            .tags(tags.iter().map(|t| t.to_string()).collect::<Vec<_>>())
            .category_id(category.id)
            .platform(Platform::Pc)
            .file_url("https://files.example.com/x.zip")
            .download_count(downloads)
            .created_at(at(created_minutes))
            .build(),
        &ctx.db_pool,
    )
    .await
    .expect("Failed to create resource")
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn resources_round_trip_through_postgres(ctx: &mut TestHarness) {
    let category = create_category(ctx, "Games").await;
    let created = create_resource(ctx, &category, "Sky Game", &["rpg", "co-op"], 10, 0).await;

    let found = Resource::find_by_id(created.id, &ctx.db_pool)
        .await
        .unwrap()
        .expect("resource should exist");

    assert_eq!(found.title, "Sky Game");
    assert_eq!(found.slug, "sky-game");
    assert_eq!(found.tags, TagSet::from(["co-op", "rpg"]));
    assert_eq!(found.download_count, 10);
    assert_eq!(found.platform, Platform::Pc);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn counters_increment_atomically(ctx: &mut TestHarness) {
    let category = create_category(ctx, "Apps").await;
    let created = create_resource(ctx, &category, "App One", &[], 0, 0).await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let pool = ctx.db_pool.clone();
            let id = created.id;
            tokio::spawn(async move { Resource::record_download(id, &pool).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let liked = Resource::record_like(created.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(liked.download_count, 10);
    assert_eq!(liked.like_count, 1);

    let missing = Resource::record_like(ResourceId::new(), &ctx.db_pool)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn store_streams_what_was_inserted(ctx: &mut TestHarness) {
    let category = create_category(ctx, "Tools").await;
    let tag = marker();
    let a = create_resource(ctx, &category, "Hex Tool", &[&tag], 0, 0).await;
    let b = create_resource(ctx, &category, "Map Tool", &[&tag], 0, 1).await;

    let store = PgCatalogStore::new(ctx.db_pool.clone());
    store.ping().await.unwrap();

    let listed: Vec<Resource> = store.list_resources().try_collect().await.unwrap();
    let ours: Vec<_> = listed.iter().filter(|r| r.tags.contains(&tag)).collect();
    assert_eq!(ours.len(), 2);
    assert!(ours.iter().any(|r| r.id == a.id));
    assert!(ours.iter().any(|r| r.id == b.id));

    let categories = store.list_categories().await.unwrap();
    assert!(categories.iter().any(|c| c.id == category.id));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn categories_order_like_the_memory_store(ctx: &mut TestHarness) {
    let created = vec![
        create_category(ctx, "apps").await,
        create_category(ctx, "Zebra").await,
        create_category(ctx, "Apps").await,
    ];

    let listed = PgCatalogStore::new(ctx.db_pool.clone())
        .list_categories()
        .await
        .unwrap();
    let ours: Vec<Category> = listed
        .into_iter()
        .filter(|c| created.iter().any(|o| o.id == c.id))
        .collect();

    let memory = MemoryCatalogStore::with_data(created, vec![])
        .list_categories()
        .await
        .unwrap();

    let names: Vec<&str> = ours.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Apps", "Zebra", "apps"]);
    assert_eq!(ours, memory);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn engine_searches_postgres_catalog(ctx: &mut TestHarness) {
    let category = create_category(ctx, "Games").await;
    let tag = marker();
    create_resource(ctx, &category, "Sky Game", &[&tag], 10, 0).await;
    create_resource(ctx, &category, "App One", &[&tag], 50, 5).await;

    let engine = SearchEngine::new(
        Arc::new(PgCatalogStore::new(ctx.db_pool.clone())),
        PageLimits::default(),
    );

    let by_downloads = engine
        .search(
            &FilterSpec::builder()
                .tags([tag.as_str()])
                .sort_key(SortKey::Downloads)
                .build(),
        )
        .await
        .unwrap();
    let titles: Vec<_> = by_downloads.items.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["App One", "Sky Game"]);

    let sky = engine
        .search(
            &FilterSpec::builder()
                .tags([tag.as_str()])
                .category_slug(category.slug.clone())
                .search_text("sky")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(sky.total_matched, 1);
    assert_eq!(sky.items[0].title, "Sky Game");
}
