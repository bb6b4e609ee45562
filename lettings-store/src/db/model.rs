//! Typed database operations for `#[derive(Model)]` structs.

use sqlx::{any::AnyRow, FromRow};

use super::query::{builder, condition::Kwargs};
use super::{record, Connection};
use crate::meta::ModelMeta;
use crate::validation::{self, ValidationErrors};
use crate::value::Value;
use crate::Error;

/// Trait for database model operations.
///
/// `meta`, `pk` and `values` are generated by the derive macro; everything
/// else is provided on top of them.
#[async_trait::async_trait]
pub trait Model: Sized + Send + Sync {
    fn meta() -> &'static ModelMeta;

    /// Primary key value, `None` for an instance that was never saved.
    fn pk(&self) -> Option<i64>;

    /// Every column except an auto-generated primary key.
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Inserts the instance as a new row and returns its primary key.
    ///
    /// # Example
    /// ```ignore
    /// let id = Address {
    ///     number: 123,
    ///     street: "Main Street".into(),
    ///     ..Default::default()
    /// }
    /// .save(&conn)
    /// .await?;
    /// ```
    async fn save(&self, conn: &Connection) -> Result<i64, Error> {
        record::insert_record(Self::meta(), &self.values(), conn).await
    }

    /// Inserts a row from keyword arguments and returns its primary key.
    ///
    /// # Example
    /// ```ignore
    /// let id = Letting::create(kwargs!(title = "Boston Loft", address = address_id), &conn).await?;
    /// ```
    async fn create(kw: Vec<Kwargs>, conn: &Connection) -> Result<i64, Error> {
        let values = assignments(Self::meta(), kw)?;
        record::insert_record(Self::meta(), &values, conn).await
    }

    /// Writes every column of the instance back to its row.
    async fn update(&self, conn: &Connection) -> Result<(), Error> {
        let pk = self.pk().ok_or(Error::MissingPrimaryKey(Self::meta().name))?;
        record::update_record(Self::meta(), pk, &self.values(), conn).await
    }

    /// Updates the row identified by `pk` with the given keyword arguments.
    ///
    /// # Example
    /// ```ignore
    /// Profile::set(profile_id, kwargs!(favorite_city = "Lyon"), &conn).await?;
    /// ```
    async fn set(pk: i64, kw: Vec<Kwargs>, conn: &Connection) -> Result<(), Error> {
        let values = assignments(Self::meta(), kw)?;
        record::update_record(Self::meta(), pk, &values, conn).await
    }

    async fn delete(&self, conn: &Connection) -> Result<(), Error> {
        let pk = self.pk().ok_or(Error::MissingPrimaryKey(Self::meta().name))?;
        record::delete_record(Self::meta(), pk, conn).await
    }

    /// Every row, primary key ascending.
    async fn all(conn: &Connection) -> Result<Vec<Self>, Error>
    where
        Self: Unpin + for<'r> FromRow<'r, AnyRow>,
    {
        let meta = Self::meta();
        let query = format!("select * from {} order by {} asc", meta.table, meta.pk);
        Ok(sqlx::query_as::<_, Self>(&query).fetch_all(conn).await?)
    }

    /// Rows matching `kw`, primary key ascending.
    ///
    /// # Example
    /// ```ignore
    /// let lofts = Letting::filter(kwargs!(title = "Boston Loft"), &conn).await?;
    /// ```
    async fn filter(kw: Vec<Kwargs>, conn: &Connection) -> Result<Vec<Self>, Error>
    where
        Self: Unpin + for<'r> FromRow<'r, AnyRow>,
    {
        let meta = Self::meta();
        let select_query = builder::to_select_query(&kw, 0);
        let mut query = format!("select * from {}", meta.table);
        if !kw.is_empty() {
            query.push_str(&format!(" where {}", select_query.placeholders));
        }
        query.push_str(&format!(" order by {} asc", meta.pk));

        let mut stream = sqlx::query_as::<_, Self>(&query);
        binds!(select_query.args, stream);
        Ok(stream.fetch_all(conn).await?)
    }

    /// First row matching `kw`, if any.
    async fn get(kw: Vec<Kwargs>, conn: &Connection) -> Result<Option<Self>, Error>
    where
        Self: Unpin + for<'r> FromRow<'r, AnyRow>,
    {
        Ok(Self::filter(kw, conn).await?.into_iter().next())
    }

    async fn count(conn: &Connection) -> Result<i64, Error> {
        record::count_records(Self::meta(), &[], conn).await
    }

    /// Checks bounds, lengths and blank rules of every field.
    fn clean_fields(&self) -> Result<(), ValidationErrors> {
        validation::validate_values(Self::meta(), &self.values()).into_result()
    }

    /// Field checks plus uniqueness and foreign key existence.
    async fn full_clean(&self, conn: &Connection) -> Result<(), Error> {
        validation::full_clean(Self::meta(), self.pk(), &self.values(), conn).await
    }
}

/// Turns `field = value` keyword arguments into column assignments.
fn assignments(meta: &ModelMeta, kw: Vec<Kwargs>) -> Result<Vec<(&'static str, Value)>, Error> {
    let mut values = Vec::new();
    for condition in kw {
        if let Kwargs::Condition { field, value, .. } = condition {
            let column = meta.field(&field).ok_or(Error::UnknownField {
                model: meta.name,
                field,
            })?;
            values.push((column.name, value));
        }
    }
    Ok(values)
}

/// Trait for deleting database records.
#[async_trait::async_trait]
pub trait Delete {
    async fn delete(&self, conn: &Connection) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl<T> Delete for Vec<T>
where
    T: Model,
{
    /// Deletes the listed instances.
    async fn delete(&self, conn: &Connection) -> Result<(), Error> {
        for instance in self {
            Model::delete(instance, conn).await?;
        }
        Ok(())
    }
}
