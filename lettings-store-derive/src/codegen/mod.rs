mod schema;

use deluxe::ExtractAttributes;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, GenericArgument, Ident, Lit, PathArguments, Type};

use crate::codegen::schema::{column_definition, create_table, drop_table};

#[derive(ExtractAttributes, Default, Debug)]
#[deluxe(attributes(model), default)]
struct ModelAttributes {
    table: Option<String>,
    display: Option<String>,
}

#[derive(ExtractAttributes, Default, Debug)]
#[deluxe(attributes(field), default)]
struct FieldAttributes {
    primary_key: Option<bool>,
    auto: Option<bool>,
    size: Option<usize>,
    unique: Option<bool>,
    default: Option<TokenStream>,
    foreign_key: Option<String>,
    on_delete: Option<String>,
    min: Option<i64>,
    max: Option<i64>,
    min_length: Option<usize>,
    blank: Option<bool>,
    editable: Option<bool>,
}

/// Storage class named after the `lettings_store::types` alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Float,
    Text,
    String,
    Boolean,
    Date,
    DateTime,
}

impl Kind {
    fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "Integer" | "Serial" | "i32" | "i64" => Self::Integer,
            "Float" | "f64" => Self::Float,
            "Text" => Self::Text,
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Date" => Self::Date,
            "DateTime" => Self::DateTime,
            _ => return None,
        })
    }

    fn ident(self) -> Ident {
        format_ident!("{}", format!("{self:?}"))
    }

    fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::String | Self::Date | Self::DateTime)
    }
}

/// One struct field with its parsed attributes.
pub struct Column {
    pub ident: Ident,
    pub kind: Kind,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto: bool,
    pub unique: bool,
    pub size: Option<usize>,
    pub default: Option<Lit>,
    pub foreign_key: Option<(String, String)>,
    pub on_delete: Option<String>,
    min: Option<i64>,
    max: Option<i64>,
    min_length: Option<usize>,
    blank: bool,
    editable: bool,
}

impl Column {
    fn parse(field: &syn::Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "Model fields must be named"))?;
        let mut field = field.clone();
        let attrs = FieldAttributes::extract_attributes(&mut field)?;

        let type_name = inner_type_name(&field.ty)
            .ok_or_else(|| syn::Error::new_spanned(&field.ty, "unsupported field type"))?;
        let kind = Kind::from_type_name(&type_name).ok_or_else(|| {
            syn::Error::new_spanned(
                &field.ty,
                format!(
                    "unexpected field type `{type_name}`, expected one of `Integer`, `Serial`, \
                     `Float`, `Text`, `String`, `Boolean`, `Date`, `DateTime`"
                ),
            )
        })?;

        let default = attrs
            .default
            .map(syn::parse2::<Lit>)
            .transpose()?;

        let foreign_key = match attrs.foreign_key {
            Some(reference) => match reference.split_once('.') {
                Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                    Some((table.to_string(), column.to_string()))
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        &ident,
                        "foreign_key must be written as \"table.column\"",
                    ))
                }
            },
            None => None,
        };

        let primary_key = attrs.primary_key.unwrap_or(false);
        let auto = attrs.auto.unwrap_or(false);
        if auto && !primary_key {
            return Err(syn::Error::new_spanned(&ident, "`auto` only applies to a primary key"));
        }
        if attrs.size.is_some() && kind != Kind::String {
            return Err(syn::Error::new_spanned(&ident, "`size` only applies to `String` fields"));
        }

        Ok(Self {
            ident,
            kind,
            nullable: is_nullable(&field.ty),
            primary_key,
            auto,
            unique: attrs.unique.unwrap_or(false),
            size: attrs.size,
            default,
            foreign_key,
            on_delete: attrs.on_delete,
            min: attrs.min,
            max: attrs.max,
            min_length: attrs.min_length,
            blank: attrs.blank.unwrap_or(false),
            editable: attrs.editable.unwrap_or(!(primary_key && auto)),
        })
    }

    fn name(&self) -> String {
        self.ident.to_string()
    }

    fn max_length(&self) -> Option<usize> {
        match self.kind {
            Kind::String => Some(self.size.unwrap_or(255)),
            _ => None,
        }
    }

    fn meta(&self) -> TokenStream {
        let name = self.name();
        let kind = self.kind.ident();
        let primary_key = self.primary_key;
        let auto = self.auto;
        let nullable = self.nullable;
        let unique = self.unique;
        let blank = self.blank;
        let editable = self.editable;
        let has_default = self.default.is_some();
        let min = option_tokens(self.min);
        let max = option_tokens(self.max);
        let min_length = option_tokens(self.min_length);
        let max_length = option_tokens(self.max_length());
        let foreign_key = match &self.foreign_key {
            Some((table, column)) => quote! {
                ::core::option::Option::Some(::lettings_store::meta::ForeignKey {
                    table: #table,
                    column: #column,
                })
            },
            None => quote! { ::core::option::Option::None },
        };

        quote! {
            ::lettings_store::meta::FieldMeta {
                name: #name,
                kind: ::lettings_store::meta::FieldKind::#kind,
                primary_key: #primary_key,
                auto: #auto,
                nullable: #nullable,
                unique: #unique,
                blank: #blank,
                editable: #editable,
                has_default: #has_default,
                min: #min,
                max: #max,
                min_length: #min_length,
                max_length: #max_length,
                foreign_key: #foreign_key,
            }
        }
    }

    /// Expression used by the generated `Default` impl.
    fn default_value(&self) -> syn::Result<TokenStream> {
        let value = match &self.default {
            None if self.nullable => return Ok(quote! { ::core::option::Option::None }),
            None => match self.kind {
                Kind::Float => quote! { 0.0 },
                Kind::Integer | Kind::Boolean => quote! { 0 },
                _ => quote! { ::std::string::String::new() },
            },
            Some(Lit::Str(text)) if text.value() == "now" => match self.kind {
                Kind::Date => {
                    quote! { ::lettings_store::chrono::Utc::now().format("%Y-%m-%d").to_string() }
                }
                Kind::DateTime => {
                    quote! { ::lettings_store::chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string() }
                }
                _ => return Err(self.error("`now` only works with Date or DateTime fields")),
            },
            Some(Lit::Bool(flag)) if self.kind == Kind::Boolean => {
                if flag.value {
                    quote! { 1 }
                } else {
                    quote! { 0 }
                }
            }
            Some(Lit::Str(text)) if self.kind.is_textual() => quote! { #text.to_string() },
            Some(lit @ Lit::Int(_)) if self.kind == Kind::Integer => quote! { #lit },
            Some(lit @ (Lit::Float(_) | Lit::Int(_))) if self.kind == Kind::Float => quote! { #lit as f64 },
            Some(_) => return Err(self.error("default value does not match the field type")),
        };
        Ok(if self.nullable {
            quote! { ::core::option::Option::Some(#value) }
        } else {
            value
        })
    }

    fn error(&self, message: &str) -> syn::Error {
        syn::Error::new_spanned(&self.ident, message)
    }
}

fn option_tokens<T: quote::ToTokens>(value: Option<T>) -> TokenStream {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}

fn is_nullable(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"))
}

fn inner_type_name(field_type: &Type) -> Option<String> {
    let Type::Path(type_path) = field_type else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident == "Option" {
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
                return inner_type_name(inner_type);
            }
        }
        return None;
    }
    Some(segment.ident.to_string())
}

/// `LettingAddress` becomes `letting_address`.
fn snake_case(name: &str) -> String {
    let mut out = String::new();
    for (index, ch) in name.char_indices() {
        if ch.is_uppercase() && index > 0 {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

pub fn expand(input: &mut DeriveInput) -> syn::Result<TokenStream> {
    let attrs = ModelAttributes::extract_attributes(input)?;
    let name = input.ident.clone();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &name,
                    "Model derive macro only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &name,
                "Model derive macro only supports structs",
            ))
        }
    };

    let columns = fields.iter().map(Column::parse).collect::<syn::Result<Vec<_>>>()?;

    let mut primary_keys = columns.iter().filter(|column| column.primary_key);
    let primary_key = primary_keys
        .next()
        .ok_or_else(|| syn::Error::new_spanned(&name, "a Model needs a `primary_key` field"))?;
    if let Some(extra) = primary_keys.next() {
        return Err(extra.error("only one field may be the primary key"));
    }

    let table = attrs.table.unwrap_or_else(|| snake_case(&name.to_string()));
    let model_name = name.to_string();
    let pk_name = primary_key.name();
    let pk_ident = &primary_key.ident;

    let definitions = columns
        .iter()
        .map(column_definition)
        .collect::<syn::Result<Vec<_>>>()?;
    let up = create_table(&table, &definitions);
    let down = drop_table(&table);

    let display = option_tokens(attrs.display.as_deref());
    let field_metas: Vec<_> = columns.iter().map(Column::meta).collect();

    let pk_value = if primary_key.nullable {
        quote! { self.#pk_ident.map(::core::convert::Into::into) }
    } else {
        quote! { ::core::option::Option::Some(::core::convert::Into::into(self.#pk_ident)) }
    };

    let stored: Vec<_> = columns
        .iter()
        .filter(|column| !(column.primary_key && column.auto))
        .collect();
    let stored_names: Vec<_> = stored.iter().map(|column| column.name()).collect();
    let stored_idents: Vec<_> = stored.iter().map(|column| &column.ident).collect();

    let default_idents: Vec<_> = columns.iter().map(|column| &column.ident).collect();
    let default_values = columns
        .iter()
        .map(Column::default_value)
        .collect::<syn::Result<Vec<_>>>()?;

    let display_impl = attrs.display.as_ref().map(|_| {
        quote! {
            impl ::core::fmt::Display for #name {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    use ::lettings_store::db::model::Model as _;
                    f.write_str(&Self::meta().render(self.pk(), &self.values()))
                }
            }
        }
    });

    Ok(quote! {
        impl ::lettings_store::db::model::Model for #name {
            fn meta() -> &'static ::lettings_store::meta::ModelMeta {
                static META: ::lettings_store::meta::ModelMeta = ::lettings_store::meta::ModelMeta {
                    name: #model_name,
                    table: #table,
                    pk: #pk_name,
                    display: #display,
                    fields: &[#(#field_metas),*],
                    up: #up,
                    down: #down,
                };
                &META
            }

            fn pk(&self) -> ::core::option::Option<i64> {
                #pk_value
            }

            fn values(&self) -> ::std::vec::Vec<(&'static str, ::lettings_store::value::Value)> {
                ::std::vec![
                    #((
                        #stored_names,
                        ::lettings_store::value::Value::from(::core::clone::Clone::clone(&self.#stored_idents)),
                    )),*
                ]
            }
        }

        impl ::core::default::Default for #name {
            fn default() -> Self {
                Self {
                    #(#default_idents: #default_values),*
                }
            }
        }

        #display_impl

        ::lettings_store::inventory::submit! {
            ::lettings_store::registry::ModelRegistration {
                meta: <#name as ::lettings_store::db::model::Model>::meta,
            }
        }
    })
}
