//! Repository for the `redirects` table.
//!
//! The ledger maps an old path to a new one in a single hop, keyed by
//! `from_path`. Page moves write to it automatically; admins can also
//! manage entries by hand.

use lectern_core::page_path::PagePath;
use lectern_core::redirect::{validate_redirect, RedirectStatus};
use lectern_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::error::StoreResult;
use crate::models::redirect::{Redirect, RedirectTarget, UpsertRedirect};

/// Column list for redirects queries.
const COLUMNS: &str = "id, from_path, to_path, status_code, created_at, updated_at";

/// Provides upsert, single-hop resolution and admin CRUD for redirects.
pub struct RedirectRepo;

impl RedirectRepo {
    /// Insert or overwrite the redirect for `from`.
    ///
    /// A second upsert for the same `from` replaces `to_path` and
    /// `status_code` in place rather than adding a row.
    pub async fn upsert<'e, E>(
        executor: E,
        from: &PagePath,
        to: &PagePath,
        status: RedirectStatus,
    ) -> Result<Redirect, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO redirects (from_path, to_path, status_code)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_redirects_from_path DO UPDATE SET
                to_path = EXCLUDED.to_path,
                status_code = EXCLUDED.status_code
             RETURNING {COLUMNS}"
        );
        let redirect = sqlx::query_as::<_, Redirect>(&query)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(status.code())
            .fetch_one(executor)
            .await?;

        tracing::debug!(
            from = %redirect.from_path,
            to = %redirect.to_path,
            status_code = redirect.status_code,
            "Redirect upserted"
        );
        Ok(redirect)
    }

    /// Validate and apply a manual upsert.
    pub async fn upsert_manual(pool: &PgPool, input: &UpsertRedirect) -> StoreResult<Redirect> {
        let from = PagePath::parse(&input.from_path)?;
        let to = PagePath::parse(&input.to_path)?;
        validate_redirect(&from, &to)?;
        let status = match input.status_code {
            Some(code) => RedirectStatus::from_code(code)?,
            None => RedirectStatus::default(),
        };
        Ok(Self::upsert(pool, &from, &to, status).await?)
    }

    /// Look up where `path` redirects to. Exactly one hop: the stored
    /// `to_path` is returned as-is even if it has a redirect of its own.
    pub async fn resolve(
        pool: &PgPool,
        path: &PagePath,
    ) -> Result<Option<RedirectTarget>, sqlx::Error> {
        sqlx::query_as::<_, RedirectTarget>(
            "SELECT to_path, status_code FROM redirects WHERE from_path = $1",
        )
        .bind(path.as_str())
        .fetch_optional(pool)
        .await
    }

    /// Find a redirect by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Redirect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM redirects WHERE id = $1");
        sqlx::query_as::<_, Redirect>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List redirects ordered by source path, with the total count.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Redirect>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM redirects
             ORDER BY from_path ASC
             LIMIT $1 OFFSET $2"
        );
        let items = sqlx::query_as::<_, Redirect>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM redirects")
            .fetch_one(pool)
            .await?;
        Ok((items, total.0))
    }

    /// Delete a redirect by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
