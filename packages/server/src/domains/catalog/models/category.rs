use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use super::{slugify, Platform};
use crate::common::CategoryId;

/// Reference data grouping resources (Games, Apps, Tools, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a category. The slug defaults to the slugified name.
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewCategory {
    #[builder(default)]
    pub id: CategoryId,
    #[builder(setter(into))]
    pub name: String,
    #[builder(default = slugify(&name), setter(into))]
    pub slug: String,
    pub platform: Platform,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl From<NewCategory> for Category {
    fn from(new: NewCategory) -> Self {
        Self {
            id: new.id,
            name: new.name,
            slug: new.slug,
            platform: new.platform,
            created_at: new.created_at,
        }
    }
}

/// Listing order used everywhere categories are shown: name, then slug,
/// both compared bytewise (`COLLATE "C"` in SQL).
pub fn category_order(a: &Category, b: &Category) -> std::cmp::Ordering {
    a.name.cmp(&b.name).then_with(|| a.slug.cmp(&b.slug))
}

// =============================================================================
// SQL Queries
// =============================================================================

impl Category {
    pub async fn find_all(pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Category>(
            r#"SELECT * FROM categories ORDER BY name COLLATE "C", slug COLLATE "C""#,
        )
            .fetch_all(pool)
            .await
    }

    pub async fn create(new: NewCategory, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, slug, platform, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(new.name)
        .bind(new.slug)
        .bind(new.platform.as_str())
        .bind(new.created_at)
        .fetch_one(pool)
        .await
    }
}
