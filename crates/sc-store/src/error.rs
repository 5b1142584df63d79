//! Store errors

/// Storage failure (never a business rule outcome)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend unreachable or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Row failed to decode
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// Write rejected by a backend constraint
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(value.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Corrupt(value.to_string())
            }
            sqlx::Error::Database(ref db) if db.constraint().is_some() => {
                Self::Constraint(value.to_string())
            }
            other => Self::Backend(other.to_string()),
        }
    }
}
