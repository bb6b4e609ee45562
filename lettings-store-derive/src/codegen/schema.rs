use syn::Lit;

use super::{Column, Kind};

fn base_type(column: &Column) -> String {
    match column.kind {
        Kind::Text => "text".to_string(),
        Kind::Float => "float".to_string(),
        Kind::Integer | Kind::Boolean => "integer".to_string(),
        Kind::Date => "varchar(10)".to_string(),
        Kind::DateTime => "varchar(40)".to_string(),
        Kind::String => format!("varchar({})", column.size.unwrap_or(255)),
    }
}

fn auto_primary_key() -> &'static str {
    if cfg!(feature = "postgres") {
        "serial primary key"
    } else {
        "integer primary key autoincrement"
    }
}

fn default_schema(column: &Column) -> syn::Result<Option<String>> {
    let Some(default) = &column.default else {
        return Ok(None);
    };
    let value = match (default, column.kind) {
        (Lit::Str(text), Kind::Date) if text.value() == "now" => "current_date".to_string(),
        (Lit::Str(text), Kind::DateTime) if text.value() == "now" => "current_timestamp".to_string(),
        (Lit::Str(text), _) if text.value() == "now" => {
            return Err(column.error("`now` only works with Date or DateTime fields"))
        }
        (Lit::Bool(flag), Kind::Boolean) => if flag.value { "1" } else { "0" }.to_string(),
        (Lit::Str(text), kind) if kind.is_textual() => {
            format!("'{}'", text.value().replace('\'', "''"))
        }
        (Lit::Int(number), Kind::Integer | Kind::Float) => number.base10_digits().to_string(),
        (Lit::Float(number), Kind::Float) => number.base10_digits().to_string(),
        _ => return Err(column.error("default value does not match the field type")),
    };
    Ok(Some(value))
}

/// `name type [primary key] [unique] [default ..] [not null] [references ..]`.
pub fn column_definition(column: &Column) -> syn::Result<String> {
    let mut parts = vec![column.name()];

    if column.primary_key && column.auto {
        parts.push(auto_primary_key().to_string());
    } else {
        parts.push(base_type(column));
        if column.primary_key {
            parts.push("primary key".to_string());
        }
    }

    if column.unique {
        parts.push("unique".to_string());
    }

    if let Some(default) = default_schema(column)? {
        parts.push(format!("default {default}"));
    }

    if !column.nullable && !column.auto {
        parts.push("not null".to_string());
    }

    if let Some((table, referenced)) = &column.foreign_key {
        parts.push(format!("references {table}({referenced})"));
        if let Some(action) = &column.on_delete {
            let action = action.to_lowercase();
            if !matches!(action.as_str(), "cascade" | "restrict" | "set null" | "no action") {
                return Err(column.error(
                    "on_delete must be one of \"cascade\", \"restrict\", \"set null\", \"no action\"",
                ));
            }
            parts.push(format!("on delete {action}"));
        }
    }

    Ok(parts.join(" "))
}

pub fn create_table(table: &str, definitions: &[String]) -> String {
    format!("create table if not exists {table} ({});", definitions.join(", "))
}

pub fn drop_table(table: &str) -> String {
    format!("drop table if exists {table};")
}
