//! Owner-scoped contact CRUD, search and birthdays over HTTP

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Days, Local, NaiveDate};
use common::{contact_body, test_app};
use contacts_service::domain::messages;
use serde_json::json;

#[tokio::test]
async fn contacts_require_a_bearer_token() {
    let app = test_app().await;

    let missing = app.get("/api/contacts", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["detail"], messages::UNAUTHORIZED);

    let forged = app.get("/api/contacts", Some("not.a.token")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn crud_round_trip() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;

    let created = app
        .post_json(
            "/api/contacts",
            Some(&token),
            contact_body("Bob", "bob@example.com", "555-0100-01"),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let id = created.body["id"].as_i64().unwrap();
    assert_eq!(created.body["first_name"], "Bob");
    assert_eq!(created.body["info"], "met at a conference");

    let fetched = app.get(&format!("/api/contacts/{id}"), Some(&token)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["email"], "bob@example.com");

    let mut update = contact_body("Robert", "bob@example.com", "555-0100-01");
    update["birth_date"] = json!("1990-05-17");
    let updated = app
        .put_json(&format!("/api/contacts/{id}"), Some(&token), update)
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["first_name"], "Robert");
    assert_eq!(updated.body["birth_date"], "1990-05-17");

    let removed = app.delete(&format!("/api/contacts/{id}"), Some(&token)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["first_name"], "Robert");

    let gone = app.get(&format!("/api/contacts/{id}"), Some(&token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["detail"], messages::CONTACT_NOT_FOUND);
}

#[tokio::test]
async fn contacts_of_other_users_are_invisible() {
    let app = test_app().await;
    let alice = app.signed_in("alice").await;
    let mallory = app.signed_in("mallory").await;

    let created = app
        .post_json(
            "/api/contacts",
            Some(&alice),
            contact_body("Bob", "bob@example.com", "555-0100-01"),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/api/contacts/{id}");

    assert_eq!(app.get(&uri, Some(&mallory)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put_json(&uri, Some(&mallory), contact_body("Eve", "eve@example.com", "555-0100-99"))
            .await
            .status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&uri, Some(&mallory)).await.status, StatusCode::NOT_FOUND);

    let listed = app.get("/api/contacts", Some(&mallory)).await;
    assert_eq!(listed.body, json!([]));

    assert_eq!(app.get(&uri, Some(&alice)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_or_phone_is_a_bad_request() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;
    app.post_json(
        "/api/contacts",
        Some(&token),
        contact_body("Bob", "bob@example.com", "555-0100-01"),
    )
    .await;

    let same_email = app
        .post_json(
            "/api/contacts",
            Some(&token),
            contact_body("Bobby", "bob@example.com", "555-0100-02"),
        )
        .await;
    assert_eq!(same_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        same_email.body["detail"],
        messages::contact_exists("bob@example.com", "555-0100-02")
    );

    let same_phone = app
        .post_json(
            "/api/contacts",
            Some(&token),
            contact_body("Bobby", "bobby@example.com", "555-0100-01"),
        )
        .await;
    assert_eq!(same_phone.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_fields_are_unprocessable() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;

    let short_name = app
        .post_json(
            "/api/contacts",
            Some(&token),
            contact_body("B", "bob@example.com", "555-0100-01"),
        )
        .await;
    assert_eq!(short_name.status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad_email = app
        .post_json(
            "/api/contacts",
            Some(&token),
            contact_body("Bob", "not-an-email", "555-0100-01"),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing_fields = app
        .post_json("/api/contacts", Some(&token), json!({ "first_name": "Bob" }))
        .await;
    assert_eq!(missing_fields.status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad_id = app.get("/api/contacts/abc", Some(&token)).await;
    assert_eq!(bad_id.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_filters_by_substring_and_paginates() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;
    for (i, name) in ["Anna", "Annabel", "Bert", "Carla"].iter().enumerate() {
        let response = app
            .post_json(
                "/api/contacts",
                Some(&token),
                contact_body(name, &format!("{}@example.com", name.to_lowercase()), &format!("555-0100-0{i}")),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let all = app.get("/api/contacts", Some(&token)).await;
    assert_eq!(all.body.as_array().unwrap().len(), 4);

    let trailing_slash = app.get("/api/contacts/", Some(&token)).await;
    assert_eq!(trailing_slash.body.as_array().unwrap().len(), 4);

    let annas = app.get("/api/contacts?first_name=Anna", Some(&token)).await;
    let names: Vec<&str> = annas
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Anna", "Annabel"]);

    let combined = app
        .get("/api/contacts?first_name=Anna&email=bel", Some(&token))
        .await;
    assert_eq!(combined.body.as_array().unwrap().len(), 1);

    let page = app.get("/api/contacts?skip=1&limit=2", Some(&token)).await;
    let names: Vec<&str> = page
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Annabel", "Bert"]);
}

/// Birth date in 1992 whose anniversary is `offset` days from today
fn born_days_from_now(offset: u64) -> NaiveDate {
    let day = Local::now().date_naive().checked_add_days(Days::new(offset)).unwrap();
    day.with_year(1992).unwrap()
}

#[tokio::test]
async fn birthdays_within_the_window_soonest_first() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;
    let other = app.signed_in("bob").await;

    let cases = [
        ("Later", 5, &token, "555-0100-01"),
        ("Sooner", 1, &token, "555-0100-02"),
        ("Faraway", 40, &token, "555-0100-03"),
        ("Foreign", 2, &other, "555-0100-04"),
    ];
    for (name, offset, owner, phone) in cases {
        let mut body = contact_body(name, &format!("{}@example.com", name.to_lowercase()), phone);
        body["birth_date"] = json!(born_days_from_now(offset).to_string());
        let response = app.post_json("/api/contacts", Some(owner), body).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    app.post_json(
        "/api/contacts",
        Some(&token),
        contact_body("Undated", "undated@example.com", "555-0100-05"),
    )
    .await;

    let week = app.get("/api/contacts/birthdays", Some(&token)).await;
    assert_eq!(week.status, StatusCode::OK);
    let names: Vec<&str> = week
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Sooner", "Later"]);

    let two_days = app.get("/api/contacts/birthdays?days=2", Some(&token)).await;
    assert_eq!(two_days.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn birthdays_window_must_be_positive() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;

    for days in ["0", "-3", "soon"] {
        let response = app
            .get(&format!("/api/contacts/birthdays?days={days}"), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "days={days}");
    }
}

#[tokio::test]
async fn pagination_beyond_signed_range_is_unprocessable() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;

    for query in ["skip=18446744073709551615", "limit=9223372036854775808"] {
        let response = app.get(&format!("/api/contacts?{query}"), Some(&token)).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{query}");
        let field = query.split('=').next().unwrap();
        assert!(response.body["detail"].as_str().unwrap().starts_with(field));
    }

    let largest = app
        .get("/api/contacts?skip=9223372036854775807&limit=9223372036854775807", Some(&token))
        .await;
    assert_eq!(largest.status, StatusCode::OK);
    assert!(largest.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_birthday_window_returns_every_dated_contact() {
    let app = test_app().await;
    let token = app.signed_in("alice").await;

    for (name, offset, phone) in [("Sooner", 1, "555-0100-01"), ("Faraway", 200, "555-0100-02")] {
        let mut body = contact_body(name, &format!("{}@example.com", name.to_lowercase()), phone);
        body["birth_date"] = json!(born_days_from_now(offset).to_string());
        let response = app.post_json("/api/contacts", Some(&token), body).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    for days in ["4294967295", "5000000000"] {
        let response = app
            .get(&format!("/api/contacts/birthdays?days={days}"), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK, "days={days}");
        let names: Vec<&str> = response
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["first_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Sooner", "Faraway"], "days={days}");
    }
}
