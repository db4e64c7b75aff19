use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Site {
    pub id: Uuid,
    pub slug: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Finds a tenant by its unique slug.
#[async_trait]
pub trait SiteLookup {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Site>, AppError>;
}

#[async_trait]
impl SiteLookup for PgPool {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Site>, AppError> {
        sqlx::query_as::<_, Site>(
            "SELECT id, slug, name, description FROM sites WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self)
        .await
        .map_err(Into::into)
    }
}
