//! Errors raised by the record store.

use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The registered models cannot be ordered for table creation.
    #[error("migration error: {0}")]
    Migration(String),

    /// An operation that needs a stored row was called on an unsaved instance.
    #[error("{0} has no primary key value")]
    MissingPrimaryKey(&'static str),

    #[error("{model} has no field named `{field}`")]
    UnknownField { model: &'static str, field: String },
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
