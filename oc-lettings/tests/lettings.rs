mod common;

use lettings_store::prelude::*;
use oc_lettings::lettings::models::{Address, Letting};
use oc_lettings::lettings::service;
use rocket::http::Status;

#[tokio::test]
async fn empty_index_renders() {
    let client = common::client().await;
    let response = client.get("/lettings/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().await.unwrap();
    assert!(body.contains("No lettings are available."));
}

#[tokio::test]
async fn index_lists_every_title() {
    let client = common::client().await;
    let conn = common::conn(&client);
    let (first, _) = common::create_letting(conn, "Beautiful Chicago Apartment", common::springfield()).await;
    let (second, _) = common::create_letting(
        conn,
        "Joshua Tree Green Haus",
        Address {
            number: 7,
            street: "Desert Road".into(),
            ..common::springfield()
        },
    )
    .await;

    let body = client
        .get("/lettings/")
        .dispatch()
        .await
        .into_string()
        .await
        .unwrap();
    assert!(body.contains(&format!("href=\"/lettings/{first}/\">Beautiful Chicago Apartment")));
    assert!(body.contains(&format!("href=\"/lettings/{second}/\">Joshua Tree Green Haus")));
}

#[tokio::test]
async fn detail_shows_title_and_address() {
    let client = common::client().await;
    let conn = common::conn(&client);
    let (letting, _) = common::create_letting(conn, "Beautiful Chicago Apartment", common::springfield()).await;

    let response = client.get(format!("/lettings/{letting}/")).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().await.unwrap();
    assert!(body.contains("Beautiful Chicago Apartment"));
    assert!(body.contains("123 Main Street"));
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let client = common::client().await;
    let response = client.get("/lettings/999/").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let response = client.get("/lettings/abc/").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn urls_resolve_with_or_without_trailing_slash() {
    let client = common::client().await;
    let conn = common::conn(&client);
    let (letting, _) = common::create_letting(conn, "Loft", common::springfield()).await;

    for uri in [
        "/lettings".to_string(),
        "/lettings/".to_string(),
        format!("/lettings/{letting}"),
        format!("/lettings/{letting}/"),
    ] {
        let response = client.get(uri.as_str()).dispatch().await;
        assert_eq!(response.status(), Status::Ok, "{uri}");
    }
    let response = client.get("/lettings/abc").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn addresses_outlive_their_letting() {
    let client = common::client().await;
    let conn = common::conn(&client);
    let (letting, address) = common::create_letting(conn, "Loft", common::springfield()).await;

    let (stored, _) = service::get(letting, conn).await.unwrap().unwrap();
    stored.delete(conn).await.unwrap();
    assert!(service::get(letting, conn).await.unwrap().is_none());
    assert!(Address::get(kwargs!(id = address), conn).await.unwrap().is_some());

    let response = client.get(format!("/lettings/{letting}/")).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn removing_an_address_removes_its_letting() {
    let client = common::client().await;
    let conn = common::conn(&client);
    let (_, address) = common::create_letting(conn, "Loft", common::springfield()).await;

    let address = Address::get(kwargs!(id = address), conn).await.unwrap().unwrap();
    address.delete(conn).await.unwrap();
    assert_eq!(Letting::count(conn).await.unwrap(), 0);
    assert!(service::list(conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn an_address_backs_one_letting_only() {
    let client = common::client().await;
    let conn = common::conn(&client);
    let (_, address) = common::create_letting(conn, "Loft", common::springfield()).await;

    let second = Letting {
        title: "Second".into(),
        address: address as Integer,
        ..Default::default()
    };
    match second.full_clean(conn).await {
        Err(Error::Validation(errors)) => assert_eq!(
            errors.get("address"),
            ["Letting with this Address already exists."]
        ),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(second.save(conn).await.is_err());
}
