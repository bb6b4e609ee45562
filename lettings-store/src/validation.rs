//! Field-level validation shared by typed models and the admin.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::db::{query::condition::Kwargs, record, Connection};
use crate::meta::{FieldKind, FieldMeta, ModelMeta};
use crate::value::Value;
use crate::Error;

/// Messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks each non primary key field of `meta` against `values`.
///
/// A column missing from `values` is treated as null unless the field has a
/// default, in which case the database fills it in.
pub fn validate_values(meta: &ModelMeta, values: &[(&str, Value)]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in meta.fields.iter().filter(|field| !field.primary_key) {
        match values.iter().find(|(name, _)| *name == field.name) {
            Some((_, value)) => validate_field(field, value, &mut errors),
            None if field.has_default || field.nullable => {}
            None => errors.add(field.name, "This field is required."),
        }
    }
    errors
}

fn validate_field(field: &FieldMeta, value: &Value, errors: &mut ValidationErrors) {
    match value {
        Value::Null => {
            if !field.nullable {
                errors.add(field.name, "This field cannot be null.");
            }
        }
        Value::Text(text) if field.kind.is_textual() => {
            let length = text.chars().count();
            if length == 0 {
                if !field.blank {
                    errors.add(field.name, "This field cannot be blank.");
                }
                return;
            }
            if let Some(max) = field.max_length {
                if length > max {
                    errors.add(
                        field.name,
                        format!("Ensure this value has at most {max} characters (it has {length})."),
                    );
                }
            }
            if let Some(min) = field.min_length {
                if length < min {
                    errors.add(
                        field.name,
                        format!("Ensure this value has at least {min} characters (it has {length})."),
                    );
                }
            }
        }
        Value::Integer(number) if matches!(field.kind, FieldKind::Integer | FieldKind::Boolean) => {
            if field.kind == FieldKind::Boolean && !matches!(*number, 0 | 1) {
                errors.add(field.name, "Enter a valid boolean.");
            }
            if let Some(max) = field.max {
                if *number > max {
                    errors.add(
                        field.name,
                        format!("Ensure this value is less than or equal to {max}."),
                    );
                }
            }
            if let Some(min) = field.min {
                if *number < min {
                    errors.add(
                        field.name,
                        format!("Ensure this value is greater than or equal to {min}."),
                    );
                }
            }
        }
        Value::Float(_) | Value::Integer(_) if field.kind == FieldKind::Float => {}
        _ => errors.add(field.name, type_mismatch_message(field.kind)),
    }
}

pub(crate) fn type_mismatch_message(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Integer => "Enter a whole number.",
        FieldKind::Float => "Enter a number.",
        FieldKind::Boolean => "Enter a valid boolean.",
        _ => "Enter a valid value.",
    }
}

/// Unique columns whose value is already used by another row.
pub async fn validate_unique(
    meta: &ModelMeta,
    pk: Option<i64>,
    values: &[(&str, Value)],
    conn: &Connection,
) -> Result<ValidationErrors, Error> {
    let mut errors = ValidationErrors::new();
    for field in meta.fields.iter().filter(|field| field.unique && !field.primary_key) {
        let Some((_, value)) = values.iter().find(|(name, _)| *name == field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let mut condition = vec![Kwargs::Condition {
            field: field.name.to_string(),
            value: value.clone(),
            comparison_operator: "=".to_string(),
        }];
        if let Some(pk) = pk {
            condition.push(Kwargs::LogicalOperator {
                operator: "and".to_string(),
            });
            condition.push(Kwargs::Condition {
                field: meta.pk.to_string(),
                value: Value::Integer(pk),
                comparison_operator: "!=".to_string(),
            });
        }
        if record::count_records(meta, &condition, conn).await? > 0 {
            let model = crate::meta::humanize(&meta.verbose_name());
            errors.add(
                field.name,
                format!("{model} with this {} already exists.", field.label()),
            );
        }
    }
    Ok(errors)
}

/// Foreign keys pointing at rows that do not exist.
pub async fn validate_relations(
    meta: &ModelMeta,
    values: &[(&str, Value)],
    conn: &Connection,
) -> Result<ValidationErrors, Error> {
    let mut errors = ValidationErrors::new();
    for field in meta.fields {
        let Some(fk) = field.foreign_key else {
            continue;
        };
        let Some((_, value)) = values.iter().find(|(name, _)| *name == field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let sql = format!(
            "select count(*) from {table} where {column}={placeholder}1",
            table = fk.table,
            column = fk.column,
            placeholder = crate::PLACEHOLDER,
        );
        let mut stream = sqlx::query_scalar::<_, i64>(&sql);
        binds!([value.clone()], stream);
        if stream.fetch_one(conn).await? == 0 {
            errors.add(
                field.name,
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }
    }
    Ok(errors)
}

/// Runs field validation, then the database checks for fields that passed it.
pub async fn full_clean(
    meta: &ModelMeta,
    pk: Option<i64>,
    values: &[(&str, Value)],
    conn: &Connection,
) -> Result<(), Error> {
    let mut errors = validate_values(meta, values);
    let passed: Vec<(&str, Value)> = values
        .iter()
        .filter(|(name, _)| !errors.has(name))
        .cloned()
        .collect();
    errors.merge(validate_relations(meta, &passed, conn).await?);
    let passed: Vec<(&str, Value)> = passed
        .into_iter()
        .filter(|(name, _)| !errors.has(name))
        .collect();
    errors.merge(validate_unique(meta, pk, &passed, conn).await?);
    errors.into_result().map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{FieldKind, FieldMeta};

    const fn field(name: &'static str, kind: FieldKind) -> FieldMeta {
        FieldMeta {
            name,
            kind,
            primary_key: false,
            auto: false,
            nullable: false,
            unique: false,
            blank: false,
            editable: true,
            has_default: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            foreign_key: None,
        }
    }

    static ADDRESS: ModelMeta = ModelMeta {
        name: "Address",
        table: "lettings_address",
        pk: "id",
        display: Some("{number} {street}"),
        fields: &[
            FieldMeta {
                primary_key: true,
                auto: true,
                nullable: true,
                ..field("id", FieldKind::Integer)
            },
            FieldMeta {
                min: Some(1),
                max: Some(9999),
                ..field("number", FieldKind::Integer)
            },
            FieldMeta {
                max_length: Some(64),
                ..field("street", FieldKind::String)
            },
            FieldMeta {
                max_length: Some(2),
                min_length: Some(2),
                ..field("state", FieldKind::String)
            },
            FieldMeta {
                max_length: Some(64),
                blank: true,
                ..field("note", FieldKind::String)
            },
        ],
        up: "",
        down: "",
    };

    fn address(number: i64, street: &str, state: &str) -> Vec<(&'static str, Value)> {
        vec![
            ("number", Value::Integer(number)),
            ("street", Value::from(street)),
            ("state", Value::from(state)),
            ("note", Value::from("")),
        ]
    }

    #[test]
    fn valid_values_pass() {
        assert!(validate_values(&ADDRESS, &address(123, "Main Street", "IL")).is_empty());
    }

    #[test]
    fn bounds_are_checked() {
        let errors = validate_values(&ADDRESS, &address(10000, "Main Street", "IL"));
        assert_eq!(
            errors.get("number"),
            ["Ensure this value is less than or equal to 9999."]
        );
        let errors = validate_values(&ADDRESS, &address(0, "Main Street", "IL"));
        assert_eq!(
            errors.get("number"),
            ["Ensure this value is greater than or equal to 1."]
        );
    }

    #[test]
    fn lengths_are_checked() {
        let errors = validate_values(&ADDRESS, &address(1, "Main Street", "T"));
        assert_eq!(
            errors.get("state"),
            ["Ensure this value has at least 2 characters (it has 1)."]
        );
        let errors = validate_values(&ADDRESS, &address(1, "Main Street", "TEX"));
        assert_eq!(
            errors.get("state"),
            ["Ensure this value has at most 2 characters (it has 3)."]
        );
    }

    #[test]
    fn blank_rules() {
        let errors = validate_values(&ADDRESS, &address(1, "", "IL"));
        assert_eq!(errors.get("street"), ["This field cannot be blank."]);
        assert!(!errors.has("note"));
    }

    #[test]
    fn missing_and_mistyped_values() {
        let errors = validate_values(&ADDRESS, &[("number", Value::from("twelve"))]);
        assert_eq!(errors.get("number"), ["Enter a whole number."]);
        assert_eq!(errors.get("street"), ["This field is required."]);
    }

    #[test]
    fn display_lists_every_message() {
        let mut errors = ValidationErrors::new();
        errors.add("state", "too short");
        errors.add("number", "too big");
        assert_eq!(errors.to_string(), "number: too big; state: too short");
        assert!(errors.into_result().is_err());
    }
}
