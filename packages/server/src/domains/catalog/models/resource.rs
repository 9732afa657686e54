use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use super::{slugify, Platform, TagSet};
use crate::common::{CategoryId, ResourceId};

/// An uploaded, approved catalog entry (game, app, tool, ...).
///
/// Download and like counters only ever grow; they are bumped by the storage
/// layer in response to download/like events, never by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub slug: String,
    pub description: String,
    #[sqlx(try_from = "Vec<String>")]
    pub tags: TagSet,
    pub category_id: CategoryId,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    pub file_url: String,
    pub thumb_url: Option<String>,
    #[sqlx(try_from = "i64")]
    pub download_count: u64,
    #[sqlx(try_from = "i64")]
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a resource.
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewResource {
    #[builder(default)]
    pub id: ResourceId,
    #[builder(setter(into))]
    pub title: String,
    #[builder(default = slugify(&title), setter(into))]
    pub slug: String,
    #[builder(default, setter(into))]
    pub description: String,
    #[builder(default, setter(into))]
    pub tags: TagSet,
    pub category_id: CategoryId,
    pub platform: Platform,
    #[builder(default, setter(into))]
    pub file_url: String,
    #[builder(default, setter(strip_option, into))]
    pub thumb_url: Option<String>,
    #[builder(default)]
    pub download_count: u64,
    #[builder(default)]
    pub like_count: u64,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl From<NewResource> for Resource {
    fn from(new: NewResource) -> Self {
        Self {
            id: new.id,
            title: new.title,
            slug: new.slug,
            description: new.description,
            tags: new.tags,
            category_id: new.category_id,
            platform: new.platform,
            file_url: new.file_url,
            thumb_url: new.thumb_url,
            download_count: new.download_count,
            like_count: new.like_count,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl Resource {
    /// Stream every resource through a server-side cursor.
    pub fn stream_all(pool: &PgPool) -> BoxStream<'_, sqlx::Result<Self>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources").fetch(pool)
    }

    pub async fn find_by_id(id: ResourceId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(new: NewResource, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (
                id,
                title,
                slug,
                description,
                tags,
                category_id,
                platform,
                file_url,
                thumb_url,
                download_count,
                like_count,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(new.title)
        .bind(new.slug)
        .bind(new.description)
        .bind(new.tags.into_vec())
        .bind(new.category_id)
        .bind(new.platform.as_str())
        .bind(new.file_url)
        .bind(new.thumb_url)
        .bind(counter(new.download_count))
        .bind(counter(new.like_count))
        .bind(new.created_at)
        .fetch_one(pool)
        .await
    }

    /// Atomically count one download. Returns `None` for an unknown id.
    pub async fn record_download(id: ResourceId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Resource>(
            r#"
            UPDATE resources
            SET download_count = download_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Atomically count one like. Returns `None` for an unknown id.
    pub async fn record_like(id: ResourceId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Resource>(
            r#"
            UPDATE resources
            SET like_count = like_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

// BIGINT columns; counters past i64::MAX saturate.
fn counter(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
