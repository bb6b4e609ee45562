//! Untyped rows described by a [`ModelMeta`].

use serde::Serialize;
use sqlx::{any::AnyRow, Row};

use super::query::{builder, condition::Kwargs};
use super::Connection;
use crate::meta::{FieldKind, FieldMeta, ModelMeta};
use crate::value::Value;
use crate::Error;

/// A stored row: its primary key and every other column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub pk: i64,
    pub values: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// Textual identity of the row according to its model's display template.
    pub fn display(&self, meta: &ModelMeta) -> String {
        meta.render(Some(self.pk), &self.values)
    }
}

fn decode_value(row: &AnyRow, field: &FieldMeta) -> Result<Value, sqlx::Error> {
    let value = match field.kind {
        FieldKind::Integer | FieldKind::Boolean => {
            row.try_get::<Option<i64>, _>(field.name)?.map(Value::Integer)
        }
        FieldKind::Float => row.try_get::<Option<f64>, _>(field.name)?.map(Value::Float),
        FieldKind::Text | FieldKind::String | FieldKind::Date | FieldKind::DateTime => {
            row.try_get::<Option<String>, _>(field.name)?.map(Value::Text)
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

fn decode(meta: &ModelMeta, row: &AnyRow) -> Result<Record, Error> {
    let mut pk = None;
    let mut values = Vec::with_capacity(meta.fields.len());
    for field in meta.fields {
        let value = decode_value(row, field)?;
        if field.primary_key {
            pk = value.as_i64();
        } else {
            values.push((field.name, value));
        }
    }
    let pk = pk.ok_or(Error::MissingPrimaryKey(meta.name))?;
    Ok(Record { pk, values })
}

fn column_list(meta: &ModelMeta) -> String {
    meta.columns().collect::<Vec<_>>().join(", ")
}

/// Rows matching `kw` (all rows when empty), primary key ascending.
pub async fn fetch_records(
    meta: &ModelMeta,
    kw: &[Kwargs],
    conn: &Connection,
) -> Result<Vec<Record>, Error> {
    let mut sql = format!("select {} from {}", column_list(meta), meta.table);
    let filter = builder::to_select_query(kw, 0);
    if !kw.is_empty() {
        sql.push_str(&format!(" where {}", filter.placeholders));
    }
    sql.push_str(&format!(" order by {} asc", meta.pk));

    let mut stream = sqlx::query(&sql);
    binds!(filter.args, stream);
    stream
        .fetch_all(conn)
        .await?
        .iter()
        .map(|row| decode(meta, row))
        .collect()
}

pub async fn get_record(meta: &ModelMeta, pk: i64, conn: &Connection) -> Result<Option<Record>, Error> {
    let condition = vec![Kwargs::Condition {
        field: meta.pk.to_string(),
        value: Value::Integer(pk),
        comparison_operator: "=".to_string(),
    }];
    Ok(fetch_records(meta, &condition, conn).await?.into_iter().next())
}

pub async fn count_records(meta: &ModelMeta, kw: &[Kwargs], conn: &Connection) -> Result<i64, Error> {
    let mut sql = format!("select count(*) from {}", meta.table);
    let filter = builder::to_select_query(kw, 0);
    if !kw.is_empty() {
        sql.push_str(&format!(" where {}", filter.placeholders));
    }
    let mut stream = sqlx::query(&sql);
    binds!(filter.args, stream);
    Ok(stream.fetch_one(conn).await?.try_get::<i64, _>(0)?)
}

/// Inserts a row and returns its primary key.
pub async fn insert_record(
    meta: &ModelMeta,
    values: &[(&str, Value)],
    conn: &Connection,
) -> Result<i64, Error> {
    let sql = if values.is_empty() {
        format!("insert into {} default values returning {}", meta.table, meta.pk)
    } else {
        let insert = builder::to_insert_query(values);
        format!(
            "insert into {name} ({fields}) values ({placeholders}) returning {pk}",
            name = meta.table,
            fields = insert.fields,
            placeholders = insert.placeholders,
            pk = meta.pk,
        )
    };
    let args: Vec<Value> = values.iter().map(|(_, value)| value.clone()).collect();

    let mut stream = sqlx::query(&sql);
    binds!(args, stream);
    let pk = stream.fetch_one(conn).await?.try_get::<i64, _>(0)?;
    tracing::debug!(table = meta.table, pk, "inserted row");
    Ok(pk)
}

/// Updates the given columns of one row; the primary key itself is never rewritten.
pub async fn update_record(
    meta: &ModelMeta,
    pk: i64,
    values: &[(&str, Value)],
    conn: &Connection,
) -> Result<(), Error> {
    let values: Vec<_> = values
        .iter()
        .filter(|(field, _)| *field != meta.pk)
        .cloned()
        .collect();
    if values.is_empty() {
        return Ok(());
    }
    let update = builder::to_update_query(&values);
    let index = update.args.len() + 1;
    let sql = format!(
        "update {name} set {placeholders} where {pk_column}={placeholder}{index}",
        name = meta.table,
        placeholders = update.placeholders,
        pk_column = meta.pk,
        placeholder = crate::PLACEHOLDER,
    );

    let mut stream = sqlx::query(&sql);
    binds!(update.args, stream);
    stream.bind(pk).execute(conn).await?;
    tracing::debug!(table = meta.table, pk, "updated row");
    Ok(())
}

pub async fn delete_record(meta: &ModelMeta, pk: i64, conn: &Connection) -> Result<(), Error> {
    let sql = format!(
        "delete from {} where {}={}1",
        meta.table,
        meta.pk,
        crate::PLACEHOLDER
    );
    sqlx::query(&sql).bind(pk).execute(conn).await?;
    tracing::debug!(table = meta.table, pk, "deleted row");
    Ok(())
}

/// Distinct non-null values of one column, sorted.
pub async fn distinct_values(
    meta: &ModelMeta,
    field: &str,
    conn: &Connection,
) -> Result<Vec<Value>, Error> {
    let field = meta.field(field).ok_or_else(|| Error::UnknownField {
        model: meta.name,
        field: field.to_string(),
    })?;
    let sql = format!(
        "select distinct {name} from {table} where {name} is not null order by {name}",
        name = field.name,
        table = meta.table
    );
    sqlx::query(&sql)
        .fetch_all(conn)
        .await?
        .iter()
        .map(|row| decode_value(row, field).map_err(Error::from))
        .collect()
}
