use super::condition::Kwargs;
use super::Query;
use crate::db::PLACEHOLDER;
use crate::value::Value;

pub fn to_update_query(values: &[(&str, Value)]) -> Query {
    let mut args = Vec::new();
    let mut placeholders = Vec::new();
    for (field, value) in values {
        args.push(value.clone());
        placeholders.push(format!("{field}={PLACEHOLDER}{index}", index = args.len()));
    }

    Query {
        placeholders: placeholders.join(", "),
        args,
        ..Default::default()
    }
}

pub fn to_insert_query(values: &[(&str, Value)]) -> Query {
    let mut args = Vec::new();
    let mut fields = Vec::new();
    let mut placeholders = Vec::new();
    for (field, value) in values {
        args.push(value.clone());
        fields.push(field.to_string());
        placeholders.push(format!("{PLACEHOLDER}{index}", index = args.len()));
    }

    Query {
        placeholders: placeholders.join(", "),
        fields: fields.join(", "),
        args,
    }
}

/// Renders a `where` expression whose placeholders start after `offset`.
pub fn to_select_query(kw: &[Kwargs], offset: usize) -> Query {
    let mut clause = WhereClause {
        args: Vec::new(),
        offset,
    };
    let placeholders = clause.render(kw);
    Query {
        placeholders,
        args: clause.args,
        ..Default::default()
    }
}

struct WhereClause {
    args: Vec<Value>,
    offset: usize,
}

impl WhereClause {
    fn render(&mut self, kw: &[Kwargs]) -> String {
        let mut parts = Vec::with_capacity(kw.len());
        for condition in kw {
            match condition {
                Kwargs::Condition {
                    field,
                    value,
                    comparison_operator,
                } => parts.push(self.condition(field, value, comparison_operator)),
                Kwargs::Column {
                    field,
                    other,
                    comparison_operator,
                } => parts.push(format!(
                    "{field}{op}{other}",
                    op = sql_operator(comparison_operator)
                )),
                Kwargs::Contains { field, value } => {
                    let pattern = format!("%{}%", escape_like(&value.to_lowercase()));
                    let placeholder = self.bind(Value::Text(pattern));
                    parts.push(format!("lower({field}) like {placeholder} escape '\\'"));
                }
                Kwargs::Related {
                    field,
                    table,
                    column,
                    condition,
                } => {
                    let subquery = if condition.is_empty() {
                        format!("select {column} from {table}")
                    } else {
                        format!(
                            "select {column} from {table} where {inner}",
                            inner = self.render(condition)
                        )
                    };
                    parts.push(format!("{field} in ({subquery})"));
                }
                Kwargs::Group(inner) => parts.push(format!("({})", self.render(inner))),
                Kwargs::LogicalOperator { operator } => parts.push(operator.clone()),
            }
        }
        parts.join(" ")
    }

    fn condition(&mut self, field: &str, value: &Value, comparison_operator: &str) -> String {
        let op = sql_operator(comparison_operator);
        match (value, op) {
            (Value::Null, "=") => format!("{field} is null"),
            (Value::Null, "!=" | "<>") => format!("{field} is not null"),
            _ => {
                let placeholder = self.bind(value.clone());
                format!("{field}{op}{placeholder}")
            }
        }
    }

    fn bind(&mut self, value: Value) -> String {
        self.args.push(value);
        format!("{PLACEHOLDER}{}", self.offset + self.args.len())
    }
}

fn sql_operator(op: &str) -> &str {
    match op {
        "==" => "=",
        other => other,
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
