//! OC Lettings: holiday lettings and member profiles, with an admin.

#[macro_use]
extern crate rocket;

pub mod accounts;
pub mod admin;
pub mod config;
pub mod error;
pub mod home;
pub mod lettings;
pub mod profiles;
pub mod telemetry;
pub mod templates;

use lettings_store::{Connection, Database};
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::{Build, Request, Rocket};

use crate::config::Settings;
use crate::error::AppError;

/// Shared by every handler through Rocket's managed state.
pub struct AppState {
    pub conn: Connection,
    pub settings: Settings,
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> RawHtml<String> {
    templates::page(
        "Page not found",
        &format!(
            "<h1>Page not found</h1>\n<p>Nothing lives at {}.</p>\n<a href=\"/\">Home</a>",
            templates::escape(request.uri().path().as_str())
        ),
    )
}

#[catch(500)]
fn internal_error() -> RawHtml<String> {
    templates::page(
        "Server error",
        "<h1>Server error</h1>\n<p>Something went wrong on our side.</p>\n<a href=\"/\">Home</a>",
    )
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> (Status, RawHtml<String>) {
    let reason = status.reason().unwrap_or("Error");
    let body = format!("<h1>{} {reason}</h1>\n<a href=\"/\">Home</a>", status.code);
    (status, templates::page(reason, &body))
}

/// Mounts the routes enabled by `settings` on a pool that is already migrated.
pub fn app(figment: Figment, settings: Settings, conn: Connection) -> Rocket<Build> {
    let mut rocket = rocket::custom(figment)
        .mount(
            "/",
            routes![
                home::index,
                lettings::routes::index,
                lettings::routes::detail,
                profiles::routes::index,
                profiles::routes::detail,
            ],
        )
        .register("/", catchers![not_found, internal_error, default_catcher]);
    if settings.admin_enabled {
        rocket = rocket.mount("/", admin::routes::routes());
    }
    if settings.debug_error_route {
        rocket = rocket.mount("/", routes![home::trigger_error]);
    }
    rocket.manage(AppState { conn, settings })
}

/// Reads the settings, opens the pool, creates missing tables and checks the
/// admin declarations.
pub async fn launchpad(figment: Figment) -> Result<Rocket<Build>, AppError> {
    let settings = Settings::from_figment(&figment)
        .map_err(|err| AppError::Config(err.to_string()))?;
    if settings.admin_enabled {
        admin::SITE.check()?;
    }
    let database = Database::new(&settings.database_url, settings.max_connections).await?;
    database.migrate().await?;
    tracing::info!(
        admin = settings.admin_enabled,
        debug_error_route = settings.debug_error_route,
        "application ready"
    );
    Ok(app(figment, settings, database.conn))
}
