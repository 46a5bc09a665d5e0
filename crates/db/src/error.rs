use lectern_core::error::CoreError;

/// Unique constraint guarding page path uniqueness.
pub const PAGE_PATH_CONSTRAINT: &str = "uq_pages_path";

/// Error returned by repository operations that enforce domain rules.
///
/// Plain lookups return `sqlx::Error` directly; anything that can fail a
/// business rule (conflicts, lifecycle, version checks) returns this.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain rule was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database rejected or failed the operation.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    /// A path unique violation can only slip past the in-transaction check
    /// when two writers race for the same path; report it as the same
    /// `Conflict` the check would have produced.
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() && db_err.constraint() == Some(PAGE_PATH_CONSTRAINT) {
                return StoreError::Core(CoreError::Conflict(
                    "Path is already taken by another page".into(),
                ));
            }
        }
        StoreError::Database(err)
    }
}
