//! Record management pages generated from model metadata.
//!
//! Each model is declared once as a [`ModelAdmin`]; the pages themselves only
//! work with [`ModelMeta`] and untyped [`Record`]s.

pub mod forms;
pub mod routes;
pub mod views;

use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use lettings_store::meta::{FieldKind, FieldMeta, ModelMeta};
use lettings_store::prelude::*;
use lettings_store::registry;

use crate::error::AppError;
use crate::{accounts, lettings, profiles};

lazy_static! {
    /// Every model exposed under `/admin/`.
    pub static ref SITE: AdminSite = AdminSite::new(vec![
        lettings::admin::address_admin(),
        lettings::admin::letting_admin(),
        profiles::admin::profile_admin(),
        accounts::user_admin(),
    ]);
}

/// How one model is presented in the admin.
#[derive(Debug, Clone)]
pub struct ModelAdmin {
    pub app_label: &'static str,
    /// Url segment, e.g. `letting`.
    pub model_name: &'static str,
    pub meta: fn() -> &'static ModelMeta,
    pub verbose_name_plural: Option<&'static str>,
    /// Changelist columns; the row's display string when empty.
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    /// Columns matched by the search box. `a__b` follows the foreign key
    /// `a` to column `b` of the referenced model.
    pub search_fields: &'static [&'static str],
    /// Foreign key whose related row names this model's rows.
    pub display_via: Option<&'static str>,
}

impl ModelAdmin {
    pub fn new(
        app_label: &'static str,
        model_name: &'static str,
        meta: fn() -> &'static ModelMeta,
    ) -> Self {
        Self {
            app_label,
            model_name,
            meta,
            verbose_name_plural: None,
            list_display: &[],
            list_filter: &[],
            search_fields: &[],
            display_via: None,
        }
    }

    pub fn meta(&self) -> &'static ModelMeta {
        (self.meta)()
    }

    pub fn verbose_name(&self) -> String {
        self.meta().verbose_name()
    }

    pub fn verbose_name_plural(&self) -> String {
        match self.verbose_name_plural {
            Some(plural) => plural.to_string(),
            None => format!("{}s", self.verbose_name()),
        }
    }

    /// Changelist url, with a trailing slash.
    pub fn url(&self) -> String {
        format!("/admin/{}/{}/", self.app_label, self.model_name)
    }

    pub fn change_url(&self, pk: i64) -> String {
        format!("{}{pk}/change/", self.url())
    }

    pub fn delete_url(&self, pk: i64) -> String {
        format!("{}{pk}/delete/", self.url())
    }

    fn field(&self, name: &str) -> Result<&'static FieldMeta, AppError> {
        self.meta().field(name).ok_or_else(|| {
            AppError::Config(format!("{} has no field `{name}`", self.meta().name))
        })
    }

    pub fn columns(&self) -> Result<Vec<&'static FieldMeta>, AppError> {
        self.list_display.iter().map(|name| self.field(name)).collect()
    }

    pub fn filter_fields(&self) -> Result<Vec<&'static FieldMeta>, AppError> {
        self.list_filter.iter().map(|name| self.field(name)).collect()
    }

    /// Fields shown in the add and change forms.
    pub fn form_fields(&self) -> impl Iterator<Item = &'static FieldMeta> {
        self.meta()
            .fields
            .iter()
            .filter(|field| field.editable && !field.primary_key)
    }

    /// Conditions for a search box query.
    ///
    /// Every whitespace separated term has to match at least one search
    /// field, ignoring case.
    pub fn search(&self, query: &str) -> Result<Vec<Kwargs>, AppError> {
        let mut conditions = Vec::new();
        for term in query.split_whitespace() {
            let mut matches = Vec::new();
            for path in self.search_fields {
                matches = matches.or(lookup(self.meta(), path, term)?);
            }
            conditions = conditions.and(matches.group());
        }
        Ok(conditions)
    }

    /// Equality conditions for the sidebar filters present in `params`.
    ///
    /// Empty values and values that do not parse for the field are ignored.
    pub fn filters(&self, params: &HashMap<String, String>) -> Result<Vec<Kwargs>, AppError> {
        let mut conditions = Vec::new();
        for field in self.filter_fields()? {
            let Some(raw) = params.get(field.name).map(|raw| raw.trim()) else {
                continue;
            };
            let value = match field.kind {
                _ if raw.is_empty() => continue,
                FieldKind::Integer | FieldKind::Boolean => match raw.parse::<i64>() {
                    Ok(number) => Value::Integer(number),
                    Err(_) => continue,
                },
                FieldKind::Float => match raw.parse::<f64>() {
                    Ok(number) => Value::Float(number),
                    Err(_) => continue,
                },
                _ => Value::from(raw),
            };
            conditions = conditions.and(vec![Kwargs::Condition {
                field: field.name.to_string(),
                value,
                comparison_operator: "=".to_string(),
            }]);
        }
        Ok(conditions)
    }

    /// Resolves every configured field name.
    pub fn check(&self) -> Result<(), AppError> {
        self.columns()?;
        self.filter_fields()?;
        for path in self.search_fields {
            lookup(self.meta(), path, "")?;
        }
        if let Some(name) = self.display_via {
            if self.field(name)?.foreign_key.is_none() {
                return Err(AppError::Config(format!(
                    "{}.{name} is not a foreign key",
                    self.meta().name
                )));
            }
        }
        Ok(())
    }
}

fn lookup(meta: &'static ModelMeta, path: &str, term: &str) -> Result<Vec<Kwargs>, AppError> {
    let Some((name, rest)) = path.split_once("__") else {
        if meta.field(path).is_none() {
            return Err(AppError::Config(format!("{} has no field `{path}`", meta.name)));
        }
        return Ok(Kwargs::contains(path, term));
    };
    let foreign_key = meta
        .field(name)
        .and_then(|field| field.foreign_key)
        .ok_or_else(|| AppError::Config(format!("{}.{name} is not a foreign key", meta.name)))?;
    let related = registry::find(foreign_key.table).ok_or_else(|| {
        AppError::Config(format!("table `{}` is not registered", foreign_key.table))
    })?;
    Ok(vec![Kwargs::Related {
        field: name.to_string(),
        table: foreign_key.table.to_string(),
        column: foreign_key.column.to_string(),
        condition: lookup(related, rest, term)?,
    }])
}

pub struct AdminSite {
    models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn new(models: Vec<ModelAdmin>) -> Self {
        Self { models }
    }

    pub fn get(&self, app_label: &str, model_name: &str) -> Option<&ModelAdmin> {
        self.models
            .iter()
            .find(|admin| admin.app_label == app_label && admin.model_name == model_name)
    }

    /// Models grouped by app label, both sorted.
    pub fn apps(&self) -> BTreeMap<&'static str, Vec<&ModelAdmin>> {
        let mut apps: BTreeMap<&'static str, Vec<&ModelAdmin>> = BTreeMap::new();
        for admin in &self.models {
            apps.entry(admin.app_label).or_default().push(admin);
        }
        for models in apps.values_mut() {
            models.sort_by_key(|admin| admin.model_name);
        }
        apps
    }

    pub fn check(&self) -> Result<(), AppError> {
        self.models.iter().try_for_each(ModelAdmin::check)
    }
}
