//! The `db` module provides functionality for interacting with the database.
//!
//! [`model::Model`] is the typed interface implemented by `#[derive(Model)]`;
//! [`record`] offers the same operations over [`ModelMeta`](crate::meta::ModelMeta)
//! for callers that only know a model at runtime, such as the admin.

pub mod model;
pub mod query;
pub mod record;

pub type Connection = sqlx::Pool<sqlx::Any>;

#[cfg(not(feature = "postgres"))]
pub const PLACEHOLDER: &str = "?";

#[cfg(feature = "postgres")]
pub const PLACEHOLDER: &str = "$";
