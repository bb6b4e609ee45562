//! HTML for the admin pages.

use std::collections::HashMap;

use lettings_store::meta::{FieldKind, FieldMeta};
use lettings_store::prelude::*;
use lettings_store::{record, registry};
use rocket::response::content::RawHtml;

use super::forms::{is_checked, FormData};
use super::{AdminSite, ModelAdmin};
use crate::error::AppError;
use crate::templates::{encode, escape, page};

/// Display strings of the rows referenced by each foreign key of a model.
#[derive(Debug, Default)]
pub struct RelatedNames {
    choices: HashMap<&'static str, Vec<(i64, String)>>,
}

impl RelatedNames {
    pub async fn load(admin: &ModelAdmin, conn: &Connection) -> Result<Self, AppError> {
        let mut choices = HashMap::new();
        for field in admin.meta().fields {
            let Some(foreign_key) = field.foreign_key else {
                continue;
            };
            let related = registry::find(foreign_key.table).ok_or_else(|| {
                AppError::Config(format!("table `{}` is not registered", foreign_key.table))
            })?;
            let rows = record::fetch_records(related, &[], conn)
                .await?
                .into_iter()
                .filter_map(|row| {
                    let key = if foreign_key.column == related.pk {
                        Some(row.pk)
                    } else {
                        row.get(foreign_key.column).and_then(Value::as_i64)
                    };
                    Some((key?, row.display(related)))
                })
                .collect();
            choices.insert(field.name, rows);
        }
        Ok(Self { choices })
    }

    pub fn choices(&self, field: &str) -> &[(i64, String)] {
        self.choices.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn name(&self, field: &str, key: i64) -> Option<&str> {
        self.choices(field)
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, name)| name.as_str())
    }
}

/// Textual identity of a row as shown in headings and the changelist.
pub fn object_name(admin: &ModelAdmin, row: &Record, related: &RelatedNames) -> String {
    admin
        .display_via
        .and_then(|field| {
            let key = row.get(field)?.as_i64()?;
            related.name(field, key).map(str::to_string)
        })
        .unwrap_or_else(|| row.display(admin.meta()))
}

fn cell(field: &FieldMeta, row: &Record, related: &RelatedNames) -> String {
    if field.primary_key {
        return row.pk.to_string();
    }
    match row.get(field.name) {
        None | Some(Value::Null) => "-".to_string(),
        Some(value) if field.foreign_key.is_some() => value
            .as_i64()
            .and_then(|key| related.name(field.name, key))
            .map_or_else(|| value.to_string(), str::to_string),
        Some(value) if field.kind == FieldKind::Boolean => {
            let label = if value.as_i64() == Some(1) { "Yes" } else { "No" };
            label.to_string()
        }
        Some(value) => value.to_string(),
    }
}

fn heading(title: &str, crumbs: &[(String, String)]) -> String {
    let mut trail = String::from("<a href=\"/admin/\">Home</a>");
    for (href, label) in crumbs {
        trail.push_str(&format!(" &rsaquo; <a href=\"{href}\">{}</a>", escape(label)));
    }
    format!("<div class=\"breadcrumbs\">{trail}</div>\n<h1>{}</h1>", escape(title))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn index(site: &AdminSite) -> RawHtml<String> {
    let mut body = heading("Site administration", &[]);
    for (app_label, models) in site.apps() {
        body.push_str(&format!(
            "\n<table class=\"module\">\n<caption>{}</caption>",
            escape(&capitalize(app_label))
        ));
        for admin in models {
            body.push_str(&format!(
                "\n<tr><th><a href=\"{url}\">{name}</a></th><td><a href=\"{url}add/\">Add</a></td></tr>",
                url = admin.url(),
                name = escape(&capitalize(&admin.verbose_name_plural())),
            ));
        }
        body.push_str("\n</table>");
    }
    page("Site administration", &body)
}

/// One sidebar filter: field and its `(value, label)` choices.
pub type FilterChoices = (&'static FieldMeta, Vec<(String, String)>);

pub async fn filter_choices(
    admin: &ModelAdmin,
    conn: &Connection,
) -> Result<Vec<FilterChoices>, AppError> {
    let mut filters = Vec::new();
    for field in admin.filter_fields()? {
        let choices = if field.kind == FieldKind::Boolean {
            vec![
                ("1".to_string(), "Yes".to_string()),
                ("0".to_string(), "No".to_string()),
            ]
        } else {
            record::distinct_values(admin.meta(), field.name, conn)
                .await?
                .into_iter()
                .map(|value| (value.to_string(), value.to_string()))
                .collect()
        };
        filters.push((field, choices));
    }
    Ok(filters)
}

fn query_string(params: &[(&str, &str)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
        .collect();
    if pairs.is_empty() {
        "?".to_string()
    } else {
        format!("?{}", pairs.join("&amp;"))
    }
}

/// Current query with `field` set to `value` (removed when empty).
fn filter_link(
    admin: &ModelAdmin,
    query: &str,
    applied: &HashMap<String, String>,
    field: &str,
    value: &str,
) -> String {
    let mut params = vec![("q", query)];
    for name in admin.list_filter.iter().copied() {
        if name == field {
            params.push((name, value));
        } else if let Some(current) = applied.get(name) {
            params.push((name, current.as_str()));
        }
    }
    query_string(&params)
}

pub struct Changelist<'a> {
    pub rows: &'a [Record],
    pub related: &'a RelatedNames,
    pub query: &'a str,
    pub applied: &'a HashMap<String, String>,
    pub filters: &'a [FilterChoices],
    pub total: i64,
}

pub fn changelist(admin: &ModelAdmin, list: Changelist<'_>) -> Result<RawHtml<String>, AppError> {
    let title = format!("Select {} to change", admin.verbose_name());
    let mut body = heading(
        &title,
        &[(admin.url(), capitalize(&admin.verbose_name_plural()))],
    );
    body.push_str(&format!(
        "\n<p><a class=\"addlink\" href=\"{}add/\">Add {}</a></p>",
        admin.url(),
        escape(&admin.verbose_name())
    ));

    if !admin.search_fields.is_empty() {
        body.push_str(&format!(
            "\n<form id=\"changelist-search\" method=\"get\">\
             <input type=\"text\" name=\"q\" value=\"{}\"> <input type=\"submit\" value=\"Search\"></form>",
            escape(list.query)
        ));
    }

    if !list.filters.is_empty() {
        body.push_str("\n<div id=\"changelist-filter\"><h2>Filter</h2>");
        for (field, choices) in list.filters {
            let current = list.applied.get(field.name).map(String::as_str).unwrap_or("");
            body.push_str(&format!("\n<h3>By {}</h3>\n<ul>", escape(&field.label().to_lowercase())));
            let all = filter_link(admin, list.query, list.applied, field.name, "");
            let selected = if current.is_empty() { " class=\"selected\"" } else { "" };
            body.push_str(&format!("\n<li{selected}><a href=\"{all}\">All</a></li>"));
            for (value, label) in choices {
                let href = filter_link(admin, list.query, list.applied, field.name, value);
                let selected = if current == value { " class=\"selected\"" } else { "" };
                body.push_str(&format!(
                    "\n<li{selected}><a href=\"{href}\">{}</a></li>",
                    escape(label)
                ));
            }
            body.push_str("\n</ul>");
        }
        body.push_str("\n</div>");
    }

    let columns = admin.columns()?;
    body.push_str("\n<table id=\"result_list\">\n<thead><tr>");
    if columns.is_empty() {
        body.push_str(&format!("<th>{}</th>", escape(&capitalize(&admin.verbose_name()))));
    }
    for field in &columns {
        body.push_str(&format!("<th>{}</th>", escape(&field.label())));
    }
    body.push_str("</tr></thead>\n<tbody>");
    for row in list.rows {
        let mut cells = if columns.is_empty() {
            vec![object_name(admin, row, list.related)]
        } else {
            columns.iter().map(|field| cell(field, row, list.related)).collect()
        };
        if let Some(first) = cells.first_mut() {
            *first = format!("<a href=\"{}\">{}</a>", admin.change_url(row.pk), escape(first));
        }
        let cells: Vec<String> = cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                if index == 0 {
                    format!("<th>{cell}</th>")
                } else {
                    format!("<td>{}</td>", escape(&cell))
                }
            })
            .collect();
        body.push_str(&format!("\n<tr>{}</tr>", cells.concat()));
    }
    body.push_str("\n</tbody>\n</table>");

    let plural = admin.verbose_name_plural();
    let count = list.rows.len() as i64;
    if count == list.total {
        body.push_str(&format!("\n<p class=\"paginator\">{count} {}</p>", escape(&plural)));
    } else {
        body.push_str(&format!(
            "\n<p class=\"paginator\">{count} results ({} total)</p>",
            list.total
        ));
    }
    Ok(page(&title, &body))
}

fn widget(field: &FieldMeta, raw: &str, related: &RelatedNames) -> String {
    let name = field.name;
    if field.foreign_key.is_some() {
        let mut options = String::from("<option value=\"\">---------</option>");
        for (key, label) in related.choices(name) {
            let selected = if raw == key.to_string() { " selected" } else { "" };
            options.push_str(&format!(
                "<option value=\"{key}\"{selected}>{}</option>",
                escape(label)
            ));
        }
        return format!("<select name=\"{name}\" id=\"id_{name}\">{options}</select>");
    }
    match field.kind {
        FieldKind::Boolean => {
            let checked = if is_checked(raw) { " checked" } else { "" };
            format!("<input type=\"checkbox\" name=\"{name}\" id=\"id_{name}\"{checked}>")
        }
        FieldKind::Integer => {
            let mut bounds = String::new();
            if let Some(min) = field.min {
                bounds.push_str(&format!(" min=\"{min}\""));
            }
            if let Some(max) = field.max {
                bounds.push_str(&format!(" max=\"{max}\""));
            }
            format!(
                "<input type=\"number\" name=\"{name}\" id=\"id_{name}\" value=\"{}\"{bounds}>",
                escape(raw)
            )
        }
        FieldKind::Float => format!(
            "<input type=\"number\" step=\"any\" name=\"{name}\" id=\"id_{name}\" value=\"{}\">",
            escape(raw)
        ),
        FieldKind::Text => format!(
            "<textarea name=\"{name}\" id=\"id_{name}\">{}</textarea>",
            escape(raw)
        ),
        FieldKind::String | FieldKind::Date | FieldKind::DateTime => {
            let max_length = field
                .max_length
                .map(|max| format!(" maxlength=\"{max}\""))
                .unwrap_or_default();
            format!(
                "<input type=\"text\" name=\"{name}\" id=\"id_{name}\" value=\"{}\"{max_length}>",
                escape(raw)
            )
        }
    }
}

pub struct ChangeForm<'a> {
    /// `None` on the add page.
    pub object: Option<(i64, String)>,
    pub data: &'a FormData,
    pub errors: &'a ValidationErrors,
    pub related: &'a RelatedNames,
}

pub fn change_form(admin: &ModelAdmin, form: ChangeForm<'_>) -> RawHtml<String> {
    let (title, action, crumb) = match &form.object {
        Some((pk, name)) => (
            format!("Change {}", admin.verbose_name()),
            admin.change_url(*pk),
            name.clone(),
        ),
        None => (
            format!("Add {}", admin.verbose_name()),
            format!("{}add/", admin.url()),
            format!("Add {}", admin.verbose_name()),
        ),
    };
    let mut body = heading(
        &title,
        &[
            (admin.url(), capitalize(&admin.verbose_name_plural())),
            (action.clone(), crumb),
        ],
    );
    if !form.errors.is_empty() {
        let message = if form.errors.fields().count() == 1 {
            "Please correct the error below."
        } else {
            "Please correct the errors below."
        };
        body.push_str(&format!("\n<p class=\"errornote\">{message}</p>"));
    }
    body.push_str(&format!("\n<form method=\"post\" action=\"{action}\">"));
    for field in admin.form_fields() {
        let raw = form.data.get(field.name).map(String::as_str).unwrap_or("");
        let messages = form.errors.get(field.name);
        body.push_str("\n<div class=\"form-row\">");
        if !messages.is_empty() {
            let items: Vec<String> = messages
                .iter()
                .map(|message| format!("<li>{}</li>", escape(message)))
                .collect();
            body.push_str(&format!("<ul class=\"errorlist\">{}</ul>", items.concat()));
        }
        body.push_str(&format!(
            "<label for=\"id_{}\">{}:</label> {}</div>",
            field.name,
            escape(&field.label()),
            widget(field, raw, form.related)
        ));
    }
    body.push_str("\n<input type=\"submit\" value=\"Save\">");
    if let Some((pk, _)) = &form.object {
        body.push_str(&format!(
            " <a class=\"deletelink\" href=\"{}\">Delete</a>",
            admin.delete_url(*pk)
        ));
    }
    body.push_str("\n</form>");
    page(&title, &body)
}

pub fn delete_confirmation(admin: &ModelAdmin, pk: i64, name: &str) -> RawHtml<String> {
    let mut body = heading(
        "Are you sure?",
        &[
            (admin.url(), capitalize(&admin.verbose_name_plural())),
            (admin.change_url(pk), name.to_string()),
        ],
    );
    body.push_str(&format!(
        "\n<p>Are you sure you want to delete the {} \"{}\"?</p>\n\
         <form method=\"post\" action=\"{}\">\
         <input type=\"submit\" value=\"Yes, I'm sure\"> <a href=\"{}\">No, take me back</a></form>",
        escape(&admin.verbose_name()),
        escape(name),
        admin.delete_url(pk),
        admin.change_url(pk),
    ));
    page("Are you sure?", &body)
}
