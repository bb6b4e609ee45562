use std::collections::HashMap;

use lettings_store::prelude::*;
use lettings_store::record;
use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::{Route, State};

use super::forms::{self, FormData};
use super::views::{self, ChangeForm, Changelist, RelatedNames};
use super::{ModelAdmin, SITE};
use crate::error::AppError;
use crate::AppState;

pub fn routes() -> Vec<Route> {
    routes![
        index,
        changelist,
        add,
        create,
        change,
        update,
        delete_confirmation,
        delete
    ]
}

/// Outcome of a submitted add or change form.
#[derive(Responder)]
pub enum Submission {
    Saved(Redirect),
    #[response(status = 422)]
    Invalid(RawHtml<String>),
}

/// The admin and stored row addressed by a change or delete url.
async fn lookup(
    app_label: &str,
    model_name: &str,
    pk: Result<i64, &str>,
    conn: &Connection,
) -> Result<Option<(&'static ModelAdmin, Record)>, AppError> {
    let (Some(admin), Ok(pk)) = (SITE.get(app_label, model_name), pk) else {
        return Ok(None);
    };
    let row = record::get_record(admin.meta(), pk, conn).await?;
    Ok(row.map(|row| (admin, row)))
}

async fn submit(
    admin: &ModelAdmin,
    object: Option<(i64, String)>,
    data: FormData,
    conn: &Connection,
) -> Result<Submission, AppError> {
    let pk = object.as_ref().map(|(pk, _)| *pk);
    match forms::save(admin, pk, &data, conn).await {
        Ok(_) => Ok(Submission::Saved(Redirect::to(admin.url()))),
        Err(AppError::Store(Error::Validation(errors))) => {
            tracing::debug!(model = admin.meta().name, %errors, "form rejected");
            let related = RelatedNames::load(admin, conn).await?;
            Ok(Submission::Invalid(views::change_form(
                admin,
                ChangeForm {
                    object,
                    data: &data,
                    errors: &errors,
                    related: &related,
                },
            )))
        }
        Err(err) => Err(err),
    }
}

#[get("/admin")]
pub fn index() -> RawHtml<String> {
    views::index(&SITE)
}

#[get("/admin/<app_label>/<model_name>?<q>&<params..>")]
pub async fn changelist(
    app_label: &str,
    model_name: &str,
    q: Option<String>,
    params: HashMap<String, String>,
    state: &State<AppState>,
) -> Result<Option<RawHtml<String>>, AppError> {
    let Some(admin) = SITE.get(app_label, model_name) else {
        return Ok(None);
    };
    let conn = &state.conn;
    let query = q.unwrap_or_default();
    let conditions = admin.search(&query)?.and(admin.filters(&params)?);
    let rows = record::fetch_records(admin.meta(), &conditions, conn).await?;
    let total = record::count_records(admin.meta(), &[], conn).await?;
    let related = RelatedNames::load(admin, conn).await?;
    let filters = views::filter_choices(admin, conn).await?;
    views::changelist(
        admin,
        Changelist {
            rows: &rows,
            related: &related,
            query: query.trim(),
            applied: &params,
            filters: &filters,
            total,
        },
    )
    .map(Some)
}

#[get("/admin/<app_label>/<model_name>/add")]
pub async fn add(
    app_label: &str,
    model_name: &str,
    state: &State<AppState>,
) -> Result<Option<RawHtml<String>>, AppError> {
    let Some(admin) = SITE.get(app_label, model_name) else {
        return Ok(None);
    };
    let related = RelatedNames::load(admin, &state.conn).await?;
    Ok(Some(views::change_form(
        admin,
        ChangeForm {
            object: None,
            data: &FormData::new(),
            errors: &ValidationErrors::new(),
            related: &related,
        },
    )))
}

#[post("/admin/<app_label>/<model_name>/add", data = "<form>")]
pub async fn create(
    app_label: &str,
    model_name: &str,
    form: Form<FormData>,
    state: &State<AppState>,
) -> Result<Option<Submission>, AppError> {
    let Some(admin) = SITE.get(app_label, model_name) else {
        return Ok(None);
    };
    submit(admin, None, form.into_inner(), &state.conn)
        .await
        .map(Some)
}

#[get("/admin/<app_label>/<model_name>/<pk>/change")]
pub async fn change(
    app_label: &str,
    model_name: &str,
    pk: Result<i64, &str>,
    state: &State<AppState>,
) -> Result<Option<RawHtml<String>>, AppError> {
    let conn = &state.conn;
    let Some((admin, row)) = lookup(app_label, model_name, pk, conn).await? else {
        return Ok(None);
    };
    let related = RelatedNames::load(admin, conn).await?;
    let name = views::object_name(admin, &row, &related);
    Ok(Some(views::change_form(
        admin,
        ChangeForm {
            object: Some((row.pk, name)),
            data: &forms::initial(admin, &row),
            errors: &ValidationErrors::new(),
            related: &related,
        },
    )))
}

#[post("/admin/<app_label>/<model_name>/<pk>/change", data = "<form>")]
pub async fn update(
    app_label: &str,
    model_name: &str,
    pk: Result<i64, &str>,
    form: Form<FormData>,
    state: &State<AppState>,
) -> Result<Option<Submission>, AppError> {
    let conn = &state.conn;
    let Some((admin, row)) = lookup(app_label, model_name, pk, conn).await? else {
        return Ok(None);
    };
    let related = RelatedNames::load(admin, conn).await?;
    let name = views::object_name(admin, &row, &related);
    submit(admin, Some((row.pk, name)), form.into_inner(), conn)
        .await
        .map(Some)
}

#[get("/admin/<app_label>/<model_name>/<pk>/delete")]
pub async fn delete_confirmation(
    app_label: &str,
    model_name: &str,
    pk: Result<i64, &str>,
    state: &State<AppState>,
) -> Result<Option<RawHtml<String>>, AppError> {
    let conn = &state.conn;
    let Some((admin, row)) = lookup(app_label, model_name, pk, conn).await? else {
        return Ok(None);
    };
    let related = RelatedNames::load(admin, conn).await?;
    let name = views::object_name(admin, &row, &related);
    Ok(Some(views::delete_confirmation(admin, row.pk, &name)))
}

#[post("/admin/<app_label>/<model_name>/<pk>/delete")]
pub async fn delete(
    app_label: &str,
    model_name: &str,
    pk: Result<i64, &str>,
    state: &State<AppState>,
) -> Result<Option<Redirect>, AppError> {
    let conn = &state.conn;
    let Some((admin, row)) = lookup(app_label, model_name, pk, conn).await? else {
        return Ok(None);
    };
    record::delete_record(admin.meta(), row.pk, conn).await?;
    tracing::info!(table = admin.meta().table, pk = row.pk, "deleted through admin");
    Ok(Some(Redirect::to(admin.url())))
}
