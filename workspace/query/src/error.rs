use thiserror::Error;

/// Error types for the access-scoped query layer.
///
/// Every variant except `Database` is a normal, caller-visible outcome;
/// the HTTP boundary translates them to statuses. `Database` is the only
/// one that should surface as a generic server error.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed or missing input (empty required field, bad date, bad role).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced entity is absent, or the caller's scope excludes it.
    /// Scope exclusions deliberately use this variant rather than
    /// `Forbidden` so callers cannot probe for existence.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The entity exists but the caller's role or ownership disallows the
    /// operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A unique key is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A reorder payload does not match the existing topic-id set.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Error from the database operations
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Type alias for Result with QueryError
pub type Result<T> = std::result::Result<T, QueryError>;
