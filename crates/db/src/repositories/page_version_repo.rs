//! Repository for the `page_versions` table.
//!
//! Snapshots are append-only. They are written by [`PageVersionRepo::snapshot`]
//! on the caller's transaction and are only ever removed in bulk, together
//! with their page.

use lectern_core::content_tree::{compare, VersionDiff};
use lectern_core::error::CoreError;
use lectern_core::types::{DbId, VersionNumber};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::error::StoreResult;
use crate::models::page::Page;
use crate::models::page_version::PageVersion;

/// Column list for page_versions queries.
const COLUMNS: &str = "id, page_id, version, title, content_tree, seo_metadata, \
    created_by, created_at";

/// Provides snapshot creation, history reads and comparison.
pub struct PageVersionRepo;

impl PageVersionRepo {
    /// Record the page's current title, content tree and SEO metadata under
    /// its current version number.
    ///
    /// Never deduplicates: two calls against unchanged state produce two rows.
    pub async fn snapshot<'e, E>(
        executor: E,
        page: &Page,
        actor: &str,
    ) -> Result<PageVersion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO page_versions
                (page_id, version, title, content_tree, seo_metadata, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, PageVersion>(&query)
            .bind(page.id)
            .bind(page.version)
            .bind(&page.title)
            .bind(&page.content_tree)
            .bind(page.seo().map(Json))
            .bind(actor)
            .fetch_one(executor)
            .await?;

        tracing::debug!(
            page_id = page.id,
            version = version.version,
            snapshot_id = version.id,
            "Page snapshot recorded"
        );
        Ok(version)
    }

    /// Find a snapshot by its own ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_versions WHERE id = $1");
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a snapshot by ID or fail with `NotFound`.
    pub async fn get_by_id(pool: &PgPool, id: DbId) -> StoreResult<PageVersion> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("PageVersion", id).into())
    }

    /// Find the snapshot a page recorded under a given version number.
    ///
    /// Version numbers are historical facts, so this is an exact match and
    /// makes no assumption that the page's history is contiguous.
    pub async fn find_by_page_and_version<'e, E>(
        executor: E,
        page_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<PageVersion>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM page_versions
             WHERE page_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(page_id)
            .bind(version)
            .fetch_optional(executor)
            .await
    }

    /// List a page's snapshots, newest version first, with the total count.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PageVersion>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_versions
             WHERE page_id = $1
             ORDER BY version DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, PageVersion>(&query)
            .bind(page_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total = Self::count_by_page(pool, page_id).await?;
        Ok((items, total))
    }

    /// Count a page's snapshots.
    pub async fn count_by_page(pool: &PgPool, page_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM page_versions WHERE page_id = $1")
            .bind(page_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Compare two snapshots field by field.
    pub async fn compare(pool: &PgPool, a_id: DbId, b_id: DbId) -> StoreResult<VersionDiff> {
        let a = Self::get_by_id(pool, a_id).await?;
        let b = Self::get_by_id(pool, b_id).await?;
        Ok(compare(a.content(), b.content()))
    }

    /// Delete every snapshot owned by a page. Only used when the page itself
    /// is being deleted.
    pub async fn delete_by_page<'e, E>(executor: E, page_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM page_versions WHERE page_id = $1")
            .bind(page_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
