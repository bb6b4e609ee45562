//! Turning submitted form fields into column values.

use std::collections::HashMap;

use lettings_store::meta::{FieldKind, FieldMeta};
use lettings_store::prelude::*;
use lettings_store::record;
use lettings_store::validation;

use super::ModelAdmin;
use crate::error::AppError;

/// Raw form values keyed by field name, as submitted or as stored.
pub type FormData = HashMap<String, String>;

/// Whether a checkbox value means "checked".
pub fn is_checked(raw: &str) -> bool {
    matches!(raw, "on" | "true" | "1")
}

/// Stored values of a record in form representation.
pub fn initial(admin: &ModelAdmin, record: &Record) -> FormData {
    admin
        .form_fields()
        .map(|field| {
            let raw = record.get(field.name).map(Value::to_string).unwrap_or_default();
            (field.name.to_string(), raw)
        })
        .collect()
}

fn clean_field(field: &FieldMeta, raw: &str) -> Result<Value, &'static str> {
    if field.kind == FieldKind::Boolean {
        return Ok(Value::from(is_checked(raw)));
    }
    if raw.is_empty() {
        return match field.kind {
            _ if field.nullable => Ok(Value::Null),
            FieldKind::Text | FieldKind::String if field.blank => Ok(Value::from("")),
            _ => Err("This field is required."),
        };
    }
    match field.kind {
        FieldKind::Integer => raw.parse::<i64>().map(Value::Integer).map_err(|_| {
            if field.foreign_key.is_some() {
                "Select a valid choice. That choice is not one of the available choices."
            } else {
                "Enter a whole number."
            }
        }),
        FieldKind::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| "Enter a number."),
        _ => Ok(Value::from(raw)),
    }
}

/// Converts the editable fields of `data`.
///
/// Fields that are not editable are left out so the database keeps, or
/// defaults, their value.
pub fn clean(
    admin: &ModelAdmin,
    data: &FormData,
) -> Result<Vec<(&'static str, Value)>, ValidationErrors> {
    let mut values = Vec::new();
    let mut errors = ValidationErrors::new();
    for field in admin.form_fields() {
        let raw = data.get(field.name).map(|raw| raw.trim()).unwrap_or_default();
        match clean_field(field, raw) {
            Ok(value) => values.push((field.name, value)),
            Err(message) => errors.add(field.name, message),
        }
    }
    errors.into_result().map(|()| values)
}

/// Validates `data` and writes it, inserting when `pk` is `None`.
///
/// Invalid input comes back as a validation [`lettings_store::Error`] and
/// leaves the table untouched.
pub async fn save(
    admin: &ModelAdmin,
    pk: Option<i64>,
    data: &FormData,
    conn: &Connection,
) -> Result<i64, AppError> {
    let meta = admin.meta();
    let values = clean(admin, data).map_err(Error::from)?;
    validation::full_clean(meta, pk, &values, conn).await?;
    match pk {
        Some(pk) => {
            record::update_record(meta, pk, &values, conn).await?;
            tracing::info!(table = meta.table, pk, "changed through admin");
            Ok(pk)
        }
        None => {
            let pk = record::insert_record(meta, &values, conn).await?;
            tracing::info!(table = meta.table, pk, "added through admin");
            Ok(pk)
        }
    }
}
