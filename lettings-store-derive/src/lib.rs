use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;

/// Derives `lettings_store::db::model::Model`.
///
/// Container attribute `#[model(table = "...", display = "...")]`; field
/// attribute `#[field(...)]` with `primary_key`, `auto`, `unique`, `size`,
/// `min`, `max`, `min_length`, `blank`, `editable`, `default`,
/// `foreign_key = "table.column"` and `on_delete`.
#[proc_macro_derive(Model, attributes(model, field))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);
    match codegen::expand(&mut input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
