use crate::value::Value;

/// Storage class of a column, derived from the field's Rust type alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    /// Unbounded text.
    Text,
    /// Text bounded by `max_length`.
    String,
    Boolean,
    Date,
    DateTime,
}

impl FieldKind {
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::String | Self::Date | Self::DateTime)
    }
}

/// Column referenced by a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

/// Everything the store knows about one column.
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    pub name: &'static str,
    pub kind: FieldKind,
    pub primary_key: bool,
    pub auto: bool,
    pub nullable: bool,
    pub unique: bool,
    /// Empty text is accepted.
    pub blank: bool,
    /// Shown in admin forms.
    pub editable: bool,
    pub has_default: bool,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub foreign_key: Option<ForeignKey>,
}

impl FieldMeta {
    /// Human label: `zip_code` becomes `Zip code`.
    pub fn label(&self) -> String {
        humanize(self.name)
    }
}

/// Static description of a model, generated by `#[derive(Model)]`.
#[derive(Debug)]
pub struct ModelMeta {
    /// Rust type name.
    pub name: &'static str,
    pub table: &'static str,
    pub pk: &'static str,
    /// Template for the textual identity, e.g. `"{number} {street}"`.
    pub display: Option<&'static str>,
    pub fields: &'static [FieldMeta],
    pub up: &'static str,
    pub down: &'static str,
}

impl ModelMeta {
    pub fn field(&self, name: &str) -> Option<&'static FieldMeta> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Columns in declaration order, primary key included.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Tables this model references, without duplicates or self references.
    pub fn depends_on(&self) -> Vec<&'static str> {
        let mut tables = Vec::new();
        for fk in self.fields.iter().filter_map(|field| field.foreign_key) {
            if fk.table != self.table && !tables.contains(&fk.table) {
                tables.push(fk.table);
            }
        }
        tables
    }

    /// `LettingAddress` becomes `letting address`.
    pub fn verbose_name(&self) -> String {
        let mut words = String::new();
        for (index, ch) in self.name.char_indices() {
            if ch.is_uppercase() && index > 0 {
                words.push(' ');
            }
            words.extend(ch.to_lowercase());
        }
        words
    }

    /// Renders the display template against a row.
    ///
    /// Without a template the identity is `"{Name} object ({pk})"`.
    pub fn render(&self, pk: Option<i64>, values: &[(&'static str, Value)]) -> String {
        let Some(template) = self.display else {
            return match pk {
                Some(pk) => format!("{} object ({pk})", self.name),
                None => format!("{} object (None)", self.name),
            };
        };

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = &after[..end];
            if name == self.pk {
                if let Some(pk) = pk {
                    out.push_str(&pk.to_string());
                }
            } else if let Some((_, value)) = values.iter().find(|(field, _)| *field == name) {
                out.push_str(&value.to_string());
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

pub(crate) fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
