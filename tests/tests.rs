use std::sync::atomic::{AtomicUsize, Ordering};

use lettings_store::prelude::*;

static DATABASES: AtomicUsize = AtomicUsize::new(0);

#[allow(dead_code)]
async fn setup_database() -> Database {
    #[cfg(not(feature = "postgres"))]
    let url = format!(
        "sqlite:file:store_{}?mode=memory&cache=shared",
        DATABASES.fetch_add(1, Ordering::SeqCst)
    );
    #[cfg(feature = "postgres")]
    let url = {
        let _ = DATABASES.fetch_add(1, Ordering::SeqCst);
        std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a postgres database")
    };
    let database = Database::new(&url, 4)
        .await
        .expect("failed to init database");
    database.migrate().await.expect("failed to migrate");
    database
}

#[derive(Model, Clone, FromRow, Debug)]
#[model(table = "store_owner", display = "{name}")]
struct Owner {
    #[field(primary_key = true, auto = true)]
    id: Option<Integer>,
    #[field(unique = true, size = 32)]
    name: String,
    #[field(default = "user", size = 16)]
    role: String,
    #[field(default = false)]
    verified: Boolean,
    #[field(default = "now")]
    joined: DateTime,
}

#[derive(Model, Clone, FromRow, Debug)]
#[model(table = "store_cottage")]
struct Cottage {
    #[field(primary_key = true, auto = true)]
    id: Option<Integer>,
    #[field(foreign_key = "store_owner.id", on_delete = "cascade")]
    owner: Integer,
    #[field(min = 1, max = 9999)]
    number: Integer,
    #[field(size = 64, blank = true)]
    note: String,
}

#[tokio::test]
async fn test_main() {
    let database = setup_database().await;
    let conn = &database.conn;

    // Create
    let r = Owner::create(kwargs!(name = "John"), conn).await;
    assert!(r.is_ok(), "{:?}", r);
    let r = Owner::create(kwargs!(name = "Doe"), conn).await;
    assert!(r.is_ok(), "{:?}", r);

    // Get
    let owner = Owner::get(kwargs!(name = "John"), conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.name, "John");
    assert_eq!(owner.role, "user");
    assert_eq!(owner.verified, False);
    assert!(!owner.joined.is_empty());
    assert_eq!(owner.to_string(), "John");

    // Filter
    let owners = Owner::filter(kwargs!(role = "user"), conn).await.unwrap();
    assert_eq!(owners.len(), 2);
    assert_eq!(owners[0].name, "John");

    // No conditions matches every row
    let everyone = Owner::filter(kwargs!(), conn).await.unwrap();
    assert_eq!(everyone.len(), 2);
    assert_eq!(everyone[1].name, "Doe");
    let first = Owner::get(kwargs!(), conn).await.unwrap().unwrap();
    assert_eq!(first.name, "John");

    // Update
    let mut owner = owner;
    owner.role = "admin".to_owned();
    owner.verified = True;
    let r = owner.update(conn).await;
    assert!(r.is_ok(), "{:?}", r);

    let updated = Owner::get(kwargs!(role == "admin"), conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "John");
    assert_eq!(updated.verified, True);

    // Set
    Owner::set(updated.id.unwrap().into(), kwargs!(role = "guest"), conn)
        .await
        .unwrap();
    assert_eq!(Owner::filter(kwargs!(role = "guest"), conn).await.unwrap().len(), 1);

    // Delete
    let r = updated.delete(conn).await;
    assert!(r.is_ok(), "{:?}", r);
    assert!(Owner::get(kwargs!(name = "John"), conn).await.unwrap().is_none());
    assert_eq!(Owner::count(conn).await.unwrap(), 1);
}

#[tokio::test]
async fn test_save_and_unknown_fields() {
    let database = setup_database().await;
    let conn = &database.conn;

    let owner = Owner {
        name: "Ada".into(),
        ..Default::default()
    };
    assert!(owner.id.is_none());
    let id = owner.save(conn).await.unwrap();
    let stored = Owner::get(kwargs!(id = id), conn).await.unwrap().unwrap();
    assert_eq!(stored.role, "user");

    let err = Owner::create(kwargs!(nickname = "ada"), conn).await.unwrap_err();
    assert!(matches!(err, Error::UnknownField { field, .. } if field == "nickname"));

    let err = Owner::default().update(conn).await.unwrap_err();
    assert!(matches!(err, Error::MissingPrimaryKey("Owner")));
}

#[tokio::test]
async fn test_join() {
    let database = setup_database().await;
    let conn = &database.conn;

    let jane = Owner::create(kwargs!(name = "Jane"), conn).await.unwrap();
    let _ = Owner::create(kwargs!(name = "Bob"), conn).await.unwrap();
    Cottage::create(kwargs!(owner = jane, number = 12, note = "sea view"), conn)
        .await
        .unwrap();

    let results: Vec<Owner> = select!(Owner)
        .inner_join::<Cottage>(kwargs!(store_owner.id == store_cottage.owner))
        .r#where(kwargs!(store_cottage.number == 12))
        .fetch_all(conn)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Jane");

    let nobody: Option<Owner> = select!(Owner)
        .inner_join::<Cottage>(kwargs!(store_owner.id == store_cottage.owner))
        .r#where(kwargs!(store_cottage.number == 13))
        .fetch_optional(conn)
        .await
        .unwrap();
    assert!(nobody.is_none());
}

#[tokio::test]
async fn test_cascade() {
    let database = setup_database().await;
    let conn = &database.conn;

    let owner = Owner::create(kwargs!(name = "Ann"), conn).await.unwrap();
    Cottage::create(kwargs!(owner = owner, number = 1, note = ""), conn)
        .await
        .unwrap();
    Cottage::create(kwargs!(owner = owner, number = 2, note = ""), conn)
        .await
        .unwrap();
    assert_eq!(Cottage::count(conn).await.unwrap(), 2);

    let owner = Owner::get(kwargs!(id = owner), conn).await.unwrap().unwrap();
    owner.delete(conn).await.unwrap();
    assert_eq!(Cottage::count(conn).await.unwrap(), 0);
}

#[tokio::test]
async fn test_full_clean() {
    let database = setup_database().await;
    let conn = &database.conn;

    Owner::create(kwargs!(name = "Taken"), conn).await.unwrap();

    let duplicate = Owner {
        name: "Taken".into(),
        ..Default::default()
    };
    assert!(duplicate.clean_fields().is_ok());
    match duplicate.full_clean(conn).await {
        Err(Error::Validation(errors)) => assert_eq!(
            errors.get("name"),
            ["Owner with this Name already exists."]
        ),
        other => panic!("expected a validation error, got {other:?}"),
    }

    let orphan = Cottage {
        owner: 999,
        number: 0,
        ..Default::default()
    };
    match orphan.full_clean(conn).await {
        Err(Error::Validation(errors)) => {
            assert_eq!(
                errors.get("owner"),
                ["Select a valid choice. That choice is not one of the available choices."]
            );
            assert_eq!(
                errors.get("number"),
                ["Ensure this value is greater than or equal to 1."]
            );
            assert!(!errors.has("note"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_records() {
    let database = setup_database().await;
    let conn = &database.conn;
    let owners = Owner::meta();
    let cottages = Cottage::meta();

    let joe = Owner::create(kwargs!(name = "Joe Black", role = "staff"), conn)
        .await
        .unwrap();
    let eve = Owner::create(kwargs!(name = "Eve White"), conn).await.unwrap();
    Cottage::create(kwargs!(owner = joe, number = 5, note = "garden"), conn)
        .await
        .unwrap();
    Cottage::create(kwargs!(owner = eve, number = 7, note = "attic"), conn)
        .await
        .unwrap();

    let found = record::fetch_records(owners, &Kwargs::contains("name", "JOE"), conn)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].display(owners), "Joe Black");
    assert_eq!(found[0].get("role"), Some(&Value::from("staff")));

    let related = vec![Kwargs::Related {
        field: "owner".to_string(),
        table: owners.table.to_string(),
        column: owners.pk.to_string(),
        condition: Kwargs::contains("name", "white"),
    }];
    let found = record::fetch_records(cottages, &related, conn).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("note"), Some(&Value::from("attic")));
    assert_eq!(found[0].display(cottages), format!("Cottage object ({})", found[0].pk));

    let pk = record::insert_record(
        cottages,
        &[
            ("owner", Value::from(eve)),
            ("number", Value::from(9)),
            ("note", Value::from("")),
        ],
        conn,
    )
    .await
    .unwrap();
    record::update_record(cottages, pk, &[("note", Value::from("porch"))], conn)
        .await
        .unwrap();
    let stored = record::get_record(cottages, pk, conn).await.unwrap().unwrap();
    assert_eq!(stored.get("note"), Some(&Value::from("porch")));

    let roles = record::distinct_values(owners, "role", conn).await.unwrap();
    assert_eq!(roles, [Value::from("staff"), Value::from("user")]);

    record::delete_record(cottages, pk, conn).await.unwrap();
    assert!(record::get_record(cottages, pk, conn).await.unwrap().is_none());
    assert_eq!(record::count_records(cottages, &[], conn).await.unwrap(), 2);
}
