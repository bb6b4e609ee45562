pub mod builder;
pub mod condition;
pub mod statement;

use crate::value::Value;

#[derive(Debug, Default)]
pub struct Query {
    pub placeholders: String,
    pub fields: String,
    pub args: Vec<Value>,
}
