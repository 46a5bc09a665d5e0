//! Repository for the `pages` table: the live page store.
//!
//! Every versioned write (update, rollback) runs in one transaction that
//! locks the page row, checks the caller's `expected_version`, records a
//! snapshot of the state about to be replaced, optionally upserts a
//! redirect, and bumps the version. Any failure rolls the whole unit back.

use lectern_core::content_tree::{
    default_content_tree, validate_content_tree, validate_seo_metadata,
};
use lectern_core::error::CoreError;
use lectern_core::page_fields::{
    validate_parent, validate_position, validate_template, validate_title,
};
use lectern_core::page_lifecycle::{publish_transition, unpublish_transition, PageStatus};
use lectern_core::page_path::PagePath;
use lectern_core::redirect::RedirectStatus;
use lectern_core::types::{DbId, VersionNumber};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::error::StoreResult;
use crate::models::page::{CreatePage, Page, PageListFilter, UpdatePage};
use crate::repositories::page_version_repo::PageVersionRepo;
use crate::repositories::redirect_repo::RedirectRepo;

/// Column list for pages queries.
const COLUMNS: &str = "id, path, title, content_tree, seo_metadata, status, version, \
    published_at, parent_id, position, is_template, template_name, \
    created_by, created_at, updated_at";

/// Provides the page lifecycle: create, versioned update, publish state,
/// rollback and removal.
pub struct PageRepo;

impl PageRepo {
    // ── Create & read ────────────────────────────────────────────────

    /// Create a new page at version 1 in `draft` status.
    ///
    /// The path is taken from `input.path` or derived from the title. Fails
    /// with `Conflict` if another page already owns it.
    pub async fn create(pool: &PgPool, input: &CreatePage, actor: &str) -> StoreResult<Page> {
        validate_title(&input.title)?;
        let path = PagePath::resolve(input.path.as_deref(), &input.title)?;
        let is_template = input.is_template.unwrap_or(false);
        validate_template(is_template, input.template_name.as_deref())?;
        if let Some(tree) = &input.content_tree {
            validate_content_tree(tree)?;
        }
        if let Some(seo) = &input.seo_metadata {
            validate_seo_metadata(seo)?;
        }
        let content_tree = input
            .content_tree
            .clone()
            .unwrap_or_else(default_content_tree);

        let mut tx = pool.begin().await?;

        ensure_path_available(&mut tx, &path, None).await?;
        if let Some(parent_id) = input.parent_id {
            ensure_page_exists(&mut tx, parent_id).await?;
        }

        let query = format!(
            "INSERT INTO pages
                (path, title, content_tree, seo_metadata, status, version, position,
                 is_template, template_name, parent_id, created_by)
             VALUES ($1, $2, $3, $4, $5, 1, 0, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(path.as_str())
            .bind(&input.title)
            .bind(&content_tree)
            .bind(input.seo_metadata.as_ref().map(Json))
            .bind(PageStatus::Draft.as_str())
            .bind(is_template)
            .bind(&input.template_name)
            .bind(input.parent_id)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(page)
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by its normalized path.
    pub async fn find_by_path(pool: &PgPool, path: &PagePath) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE path = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(path.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Fetch a page by ID or fail with `NotFound`.
    pub async fn get_by_id(pool: &PgPool, id: DbId) -> StoreResult<Page> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Page", id).into())
    }

    /// Normalize `raw` and fetch the page at that path or fail with
    /// `NotFound`.
    pub async fn get_by_path(pool: &PgPool, raw: &str) -> StoreResult<Page> {
        let path = PagePath::parse(raw)?;
        Self::find_by_path(pool, &path)
            .await?
            .ok_or_else(|| CoreError::path_not_found("Page", path.as_str()).into())
    }

    /// List pages with optional status/parent/template filters, ordered for
    /// tree display (roots first, then by sibling position), with the total.
    pub async fn list(
        pool: &PgPool,
        filter: &PageListFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<Page>, i64)> {
        let status = filter
            .status
            .as_deref()
            .map(str::parse::<PageStatus>)
            .transpose()?;
        let status = status.as_ref().map(PageStatus::as_str);

        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR parent_id = $2)
               AND ($3::BOOL IS NULL OR is_template = $3)
             ORDER BY parent_id NULLS FIRST, position ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Page>(&query)
            .bind(status)
            .bind(filter.parent_id)
            .bind(filter.is_template)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pages
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR parent_id = $2)
               AND ($3::BOOL IS NULL OR is_template = $3)",
        )
        .bind(status)
        .bind(filter.parent_id)
        .bind(filter.is_template)
        .fetch_one(pool)
        .await?;

        Ok((items, total.0))
    }

    // ── Versioned writes ─────────────────────────────────────────────

    /// Apply a partial update as a new version.
    ///
    /// The current state is snapshotted before anything else changes, even
    /// when the patch turns out to be a no-op. A path change is checked for
    /// uniqueness and recorded in the redirect ledger as a 301 from the old
    /// path.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePage,
        actor: &str,
    ) -> StoreResult<Page> {
        if let Some(title) = &input.title {
            validate_title(title)?;
        }
        let new_path = input.path.as_deref().map(PagePath::parse).transpose()?;
        if let Some(tree) = &input.content_tree {
            validate_content_tree(tree)?;
        }
        if let Some(Some(seo)) = &input.seo_metadata {
            validate_seo_metadata(seo)?;
        }
        if let Some(position) = input.position {
            validate_position(position)?;
        }
        if let Some(parent_id) = input.parent_id {
            validate_parent(id, parent_id)?;
        }

        let mut tx = pool.begin().await?;

        let current = lock_page(&mut tx, id).await?;
        ensure_expected_version(&current, input.expected_version)?;

        PageVersionRepo::snapshot(&mut *tx, &current, actor).await?;

        let moved_to = new_path.filter(|path| path.as_str() != current.path);
        if let Some(to) = &moved_to {
            ensure_path_available(&mut tx, to, Some(id)).await?;
            let from = PagePath::parse(&current.path)?;
            RedirectRepo::upsert(&mut *tx, &from, to, RedirectStatus::Permanent).await?;
        }
        if let Some(Some(parent_id)) = input.parent_id {
            ensure_page_exists(&mut tx, parent_id).await?;
        }

        let seo_provided = input.seo_metadata.is_some();
        let seo_value = input.seo_metadata.as_ref().and_then(|v| v.as_ref()).map(Json);
        let parent_provided = input.parent_id.is_some();
        let parent_value = input.parent_id.flatten();

        let query = format!(
            "UPDATE pages SET
                title = COALESCE($2, title),
                path = COALESCE($3, path),
                content_tree = COALESCE($4, content_tree),
                seo_metadata = CASE WHEN $5 THEN $6 ELSE seo_metadata END,
                parent_id = CASE WHEN $7 THEN $8 ELSE parent_id END,
                position = COALESCE($9, position),
                version = version + 1
             WHERE id = $1 AND version = $10
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(moved_to.as_ref().map(PagePath::as_str))
            .bind(&input.content_tree)
            .bind(seo_provided)
            .bind(seo_value)
            .bind(parent_provided)
            .bind(parent_value)
            .bind(input.position)
            .bind(current.version)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        if let Some(to) = moved_to {
            tracing::info!(page_id = id, from = %current.path, to = %to, "Page path changed");
        }
        Ok(page)
    }

    /// Restore the title, content tree and SEO metadata recorded under
    /// `target_version` as a brand-new version.
    ///
    /// The state being overwritten is snapshotted first, so a rollback can
    /// itself be rolled back. Path, status and hierarchy are not versioned
    /// and stay as they are.
    pub async fn rollback(
        pool: &PgPool,
        id: DbId,
        target_version: VersionNumber,
        expected_version: VersionNumber,
        actor: &str,
    ) -> StoreResult<Page> {
        let mut tx = pool.begin().await?;

        let current = lock_page(&mut tx, id).await?;
        ensure_expected_version(&current, expected_version)?;

        let target = PageVersionRepo::find_by_page_and_version(&mut *tx, id, target_version)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "PageVersion",
                key: format!("with version {target_version} for page {id}"),
            })?;

        PageVersionRepo::snapshot(&mut *tx, &current, actor).await?;

        let query = format!(
            "UPDATE pages SET
                title = $2,
                content_tree = $3,
                seo_metadata = $4,
                version = version + 1
             WHERE id = $1 AND version = $5
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&target.title)
            .bind(&target.content_tree)
            .bind(&target.seo_metadata)
            .bind(current.version)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            page_id = id,
            restored_from = target_version,
            version = page.version,
            "Page rolled back"
        );
        Ok(page)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Move a page to `published` and stamp `published_at`. The version is
    /// unchanged and no snapshot is taken.
    pub async fn publish(pool: &PgPool, id: DbId) -> StoreResult<Page> {
        let mut tx = pool.begin().await?;
        let current = lock_page(&mut tx, id).await?;
        let next = publish_transition(current.lifecycle_status()?)?;

        let query = format!(
            "UPDATE pages SET status = $2, published_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(page)
    }

    /// Move a published page back to `draft` and clear `published_at`.
    pub async fn unpublish(pool: &PgPool, id: DbId) -> StoreResult<Page> {
        let mut tx = pool.begin().await?;
        let current = lock_page(&mut tx, id).await?;
        let next = unpublish_transition(current.lifecycle_status()?)?;

        let query = format!(
            "UPDATE pages SET status = $2, published_at = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(page)
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete a page and all of its snapshots.
    ///
    /// Redirects pointing at the page's former paths are left in place.
    /// Child pages are detached (their `parent_id` becomes NULL).
    pub async fn remove(pool: &PgPool, id: DbId) -> StoreResult<()> {
        let mut tx = pool.begin().await?;
        lock_page(&mut tx, id).await?;

        let removed = PageVersionRepo::delete_by_page(&mut *tx, id).await?;
        sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(page_id = id, snapshots_removed = removed, "Page removed");
        Ok(())
    }
}

// ── Transaction helpers ──────────────────────────────────────────────

/// Load a page and hold its row lock for the rest of the transaction.
async fn lock_page(conn: &mut PgConnection, id: DbId) -> StoreResult<Page> {
    let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Page>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| CoreError::not_found("Page", id).into())
}

fn ensure_expected_version(page: &Page, expected: VersionNumber) -> Result<(), CoreError> {
    if page.version != expected {
        tracing::warn!(
            page_id = page.id,
            expected,
            actual = page.version,
            "Rejected write against stale page version"
        );
        return Err(CoreError::VersionConflict {
            expected,
            actual: page.version,
        });
    }
    Ok(())
}

/// Fail with `Conflict` if any page other than `exclude` owns `path`.
async fn ensure_path_available(
    conn: &mut PgConnection,
    path: &PagePath,
    exclude: Option<DbId>,
) -> StoreResult<()> {
    let taken: (bool,) = sqlx::query_as(
        "SELECT EXISTS(
            SELECT 1 FROM pages WHERE path = $1 AND ($2::BIGINT IS NULL OR id <> $2)
         )",
    )
    .bind(path.as_str())
    .bind(exclude)
    .fetch_one(&mut *conn)
    .await?;

    if taken.0 {
        return Err(CoreError::Conflict(format!(
            "Path '{path}' is already taken by another page"
        ))
        .into());
    }
    Ok(())
}

async fn ensure_page_exists(conn: &mut PgConnection, id: DbId) -> StoreResult<()> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pages WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if !exists.0 {
        return Err(CoreError::not_found("Page", id).into());
    }
    Ok(())
}
