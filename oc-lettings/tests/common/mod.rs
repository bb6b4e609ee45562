#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use lettings_store::prelude::*;
use oc_lettings::accounts::User;
use oc_lettings::config::Settings;
use oc_lettings::lettings::models::{Address, Letting};
use oc_lettings::profiles::models::Profile;
use oc_lettings::AppState;
use rocket::figment::Figment;
use rocket::local::asynchronous::Client;

static DATABASES: AtomicUsize = AtomicUsize::new(0);

fn database_url() -> String {
    format!(
        "sqlite:file:oc_lettings_{}_{}?mode=memory&cache=shared",
        std::process::id(),
        DATABASES.fetch_add(1, Ordering::SeqCst)
    )
}

/// A client on a fresh in-memory database, with `configure` applied to the
/// settings.
pub async fn client_with(configure: impl FnOnce(Figment) -> Figment) -> Client {
    let figment = Settings::figment()
        .merge(("database_url", database_url()))
        .merge(("log_level", "off"));
    let rocket = oc_lettings::launchpad(configure(figment))
        .await
        .expect("application starts");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

pub async fn client() -> Client {
    client_with(|figment| figment).await
}

pub fn conn(client: &Client) -> &Connection {
    &client
        .rocket()
        .state::<AppState>()
        .expect("application state is managed")
        .conn
}

pub fn springfield() -> Address {
    Address {
        number: 123,
        street: "Main Street".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: 62701,
        country_iso_code: "USA".into(),
        ..Default::default()
    }
}

/// Stores an address and a letting on it, returning both ids.
pub async fn create_letting(conn: &Connection, title: &str, address: Address) -> (i64, i64) {
    let address = address.save(conn).await.unwrap();
    let letting = Letting {
        title: title.into(),
        address: address as Integer,
        ..Default::default()
    }
    .save(conn)
    .await
    .unwrap();
    (letting, address)
}

/// Stores an account and, when `favorite_city` is given, its profile.
pub async fn create_user(conn: &Connection, username: &str, favorite_city: Option<&str>) -> i64 {
    let user = User {
        username: username.into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        email: format!("{username}@example.com"),
        ..Default::default()
    }
    .save(conn)
    .await
    .unwrap();
    if let Some(city) = favorite_city {
        Profile {
            user: user as Integer,
            favorite_city: city.into(),
            ..Default::default()
        }
        .save(conn)
        .await
        .unwrap();
    }
    user
}
