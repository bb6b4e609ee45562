use crate::value::Value;

/// One piece of a `where` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Kwargs {
    /// `field <op> value`.
    Condition {
        field: String,
        value: Value,
        comparison_operator: String,
    },
    /// `field <op> other`, comparing two columns.
    Column {
        field: String,
        other: String,
        comparison_operator: String,
    },
    /// Case-insensitive substring match.
    Contains { field: String, value: String },
    /// `field in (select column from table where condition)`.
    Related {
        field: String,
        table: String,
        column: String,
        condition: Vec<Kwargs>,
    },
    /// Parenthesised sub-expression.
    Group(Vec<Kwargs>),
    LogicalOperator { operator: String },
}

impl Kwargs {
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Vec<Self> {
        vec![Self::Contains {
            field: field.into(),
            value: value.into(),
        }]
    }
}

pub trait Or {
    fn or(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs>;
}

pub trait And {
    fn and(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs>;
}

pub trait Group {
    /// Wraps the conditions in parentheses.
    fn group(self) -> Vec<Kwargs>;
}

impl Or for Vec<Kwargs> {
    fn or(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        join(self, "or", kwargs)
    }
}

impl And for Vec<Kwargs> {
    fn and(self, kwargs: Vec<Kwargs>) -> Vec<Kwargs> {
        join(self, "and", kwargs)
    }
}

impl Group for Vec<Kwargs> {
    fn group(self) -> Vec<Kwargs> {
        if self.is_empty() {
            self
        } else {
            vec![Kwargs::Group(self)]
        }
    }
}

fn join(mut left: Vec<Kwargs>, operator: &str, right: Vec<Kwargs>) -> Vec<Kwargs> {
    if right.is_empty() {
        return left;
    }
    if !left.is_empty() {
        left.push(Kwargs::LogicalOperator {
            operator: operator.to_string(),
        });
    }
    left.extend(right);
    left
}
