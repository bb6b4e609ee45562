//! Declarative record store for the OC Lettings site.
//!
//! Models are plain structs deriving [`Model`](prelude::Model). The derive
//! produces the table DDL, the runtime [`ModelMeta`](meta::ModelMeta) used by
//! validation and the admin, and registers the model so that
//! [`Database::migrate`] can create every table in dependency order.

/// This module contains the macros used in the crate.
#[macro_use]
mod macros;

/// Connection pool, model trait, query building and dynamic records.
pub mod db;

pub mod error;

/// Static description of models and their fields.
pub mod meta;

/// This module contains the prelude for the crate.
pub mod prelude;

/// Models submitted by the derive macro.
pub mod registry;

/// Column type aliases understood by the derive macro.
pub mod types;

pub mod validation;

pub mod value;

pub use db::{record, Connection, PLACEHOLDER};
pub use error::Error;

#[doc(hidden)]
pub use async_trait;
#[doc(hidden)]
pub use chrono;
#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use sqlx;

use sqlformat::{FormatOptions, QueryParams};

/// Represents a database.
pub struct Database {
    pub conn: Connection,
}

impl Database {
    /// Opens a pool on `database_url`.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();
        let conn = sqlx::any::AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!(max_connections, "database pool ready");
        Ok(Self { conn })
    }

    /// Creates the table of every registered model.
    ///
    /// Tables referenced through a foreign key are created before the tables
    /// referencing them. Existing tables are left untouched.
    pub async fn migrate(&self) -> Result<(), Error> {
        for meta in registry::migration_order()? {
            tracing::debug!(
                table = meta.table,
                sql = %sqlformat::format(meta.up, &QueryParams::None, &FormatOptions::default()),
                "creating table"
            );
            sqlx::query(meta.up).execute(&self.conn).await?;
        }
        tracing::info!("schema up to date");
        Ok(())
    }

    /// Drops every registered table, dependents first.
    pub async fn flush(&self) -> Result<(), Error> {
        for meta in registry::migration_order()?.into_iter().rev() {
            tracing::debug!(table = meta.table, "dropping table");
            sqlx::query(meta.down).execute(&self.conn).await?;
        }
        Ok(())
    }
}
