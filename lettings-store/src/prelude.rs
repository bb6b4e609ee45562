pub use sqlx::FromRow;

pub use super::db::model::{Delete, Model};
pub use super::db::query::condition::{And, Group, Kwargs, Or};
pub use super::db::query::statement::{JoinType, Statement};
pub use super::db::record::{self, Record};
pub use super::validation::ValidationErrors;
pub use super::value::Value;
pub use super::{kwargs, select};
pub use super::{types::*, Connection, Database, Error};
pub use lettings_store_derive::Model;
