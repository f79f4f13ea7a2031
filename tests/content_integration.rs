//! Content routes against a live Postgres.
//!
//! Database-backed tests need the Postgres from `configuration.yaml`; each
//! one creates and migrates its own database.

mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use blog_api::configuration::get_configuration;
use common::{configure_database, spawn_app, spawn_app_with_pool, TestApp};

async fn spawn_app_with_database() -> (TestApp, String) {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    let pool = configure_database(&configuration.database).await;

    let app = spawn_app_with_pool(pool).await;
    let token = app.login().await;
    (app, token)
}

async fn create_tag(app: &TestApp, token: &str, name: &str) -> i64 {
    let response = app
        .client
        .post(app.url("/admin/tag"))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::CREATED, response.status());

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_i64().unwrap()
}

async fn create_article(app: &TestApp, token: &str, body: Value) -> i64 {
    let response = app
        .client
        .post(app.url("/admin/article"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::CREATED, response.status());

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_i64().unwrap()
}

async fn get_json(app: &TestApp, path: &str) -> (StatusCode, Value) {
    let response = app
        .client
        .get(app.url(path))
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status();
    (status, response.json().await.unwrap())
}

// --- Articles ---

#[tokio::test]
async fn article_lifecycle() {
    let (app, token) = spawn_app_with_database().await;
    let rust = create_tag(&app, &token, "rust").await;
    let web = create_tag(&app, &token, "web").await;

    let id = create_article(
        &app,
        &token,
        json!({
            "title": "Hello",
            "desc": "first post",
            "content": "body",
            "img": "cover.png",
            "tag": [rust, web],
        }),
    )
    .await;

    let (status, body) = get_json(&app, &format!("/article/{}", id)).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(body["data"]["title"], "Hello");
    assert_eq!(body["data"]["content"], "body");
    assert_eq!(body["data"]["tag"].as_array().unwrap().len(), 2);

    // Empty desc/img and tag list keep the stored values
    let response = app
        .client
        .put(app.url(&format!("/admin/article/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "title": "Hello again", "content": "new body" }))
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());

    let (_, body) = get_json(&app, &format!("/article/{}", id)).await;
    assert_eq!(body["data"]["title"], "Hello again");
    assert_eq!(body["data"]["desc"], "first post");
    assert_eq!(body["data"]["img"], "cover.png");
    assert_eq!(body["data"]["tag"].as_array().unwrap().len(), 2);

    // A non-empty tag list replaces the associations
    app.client
        .put(app.url(&format!("/admin/article/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "title": "Hello again", "content": "new body", "tag": [web] }))
        .send()
        .await
        .unwrap();
    let (_, body) = get_json(&app, &format!("/article/{}", id)).await;
    assert_eq!(body["data"]["tag"], json!([{ "id": web, "name": "web" }]));

    let response = app
        .client
        .delete(app.url(&format!("/admin/article/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());

    let (status, body) = get_json(&app, &format!("/article/{}", id)).await;
    assert_eq!(StatusCode::NOT_FOUND, status);
    assert_eq!(body["code"], "ARTICLE_NOT_FOUND");
}

#[tokio::test]
async fn article_list_is_paginated_newest_first() {
    let (app, token) = spawn_app_with_database().await;
    for n in 1..=3 {
        create_article(
            &app,
            &token,
            json!({ "title": format!("Post {}", n), "content": "body" }),
        )
        .await;
    }

    let (status, body) = get_json(&app, "/articles?pageSize=2&pageOffset=1").await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(body["data"]["total"], 3);
    let list = body["data"]["articles"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["title"], "Post 3");
    assert!(list[0].get("content").is_none());

    let (_, body) = get_json(&app, "/articles?pageSize=2&pageOffset=2").await;
    let list = body["data"]["articles"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Post 1");
}

#[tokio::test]
async fn article_with_unknown_tag_is_rejected() {
    let (app, token) = spawn_app_with_database().await;

    let response = app
        .client
        .post(app.url("/admin/article"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Hello", "content": "body", "tag": [999] }))
        .send()
        .await
        .unwrap();

    assert_eq!(StatusCode::NOT_FOUND, response.status());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "TAG_NOT_FOUND");

    let (_, body) = get_json(&app, "/articles").await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn updating_missing_article_returns_404() {
    let (app, token) = spawn_app_with_database().await;

    let response = app
        .client
        .put(app.url("/admin/article/42"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Hello", "content": "body" }))
        .send()
        .await
        .unwrap();

    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

// --- Tags ---

#[tokio::test]
async fn duplicate_tag_is_a_conflict() {
    let (app, token) = spawn_app_with_database().await;
    create_tag(&app, &token, "rust").await;

    let response = app
        .client
        .post(app.url("/admin/tag"))
        .bearer_auth(&token)
        .json(&json!({ "name": "rust" }))
        .send()
        .await
        .unwrap();

    assert_eq!(StatusCode::CONFLICT, response.status());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "TAG_EXISTS");
}

#[tokio::test]
async fn tag_list_counts_live_articles() {
    let (app, token) = spawn_app_with_database().await;
    let rust = create_tag(&app, &token, "rust").await;
    create_tag(&app, &token, "unused").await;
    create_article(&app, &token, json!({ "title": "A", "content": "a", "tag": [rust] })).await;
    let gone =
        create_article(&app, &token, json!({ "title": "B", "content": "b", "tag": [rust] })).await;
    app.client
        .delete(app.url(&format!("/admin/article/{}", gone)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    let body: Value = app
        .client
        .get(app.url("/admin/tag"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["data"],
        json!([
            { "id": rust, "name": "rust", "article_count": 1 },
            { "id": rust + 1, "name": "unused", "article_count": 0 },
        ])
    );
}

#[tokio::test]
async fn deleting_tag_detaches_it_from_articles() {
    let (app, token) = spawn_app_with_database().await;
    let rust = create_tag(&app, &token, "rust").await;
    let id = create_article(&app, &token, json!({ "title": "A", "content": "a", "tag": [rust] })).await;

    let response = app
        .client
        .delete(app.url(&format!("/admin/tag/{}", rust)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());

    let (_, body) = get_json(&app, &format!("/article/{}", id)).await;
    assert_eq!(body["data"]["tag"], json!([]));

    let response = app
        .client
        .delete(app.url(&format!("/admin/tag/{}", rust)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

// --- Says ---

#[tokio::test]
async fn say_lifecycle() {
    let (app, token) = spawn_app_with_database().await;

    let response = app
        .client
        .post(app.url("/admin/say"))
        .bearer_auth(&token)
        .json(&json!({ "content": "hello world" }))
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::CREATED, response.status());
    let body: Value = response.json().await.unwrap();
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = get_json(&app, "/say").await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["says"][0]["content"], "hello world");

    let response = app
        .client
        .delete(app.url(&format!("/admin/say/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());

    let (_, body) = get_json(&app, "/say").await;
    assert_eq!(body["data"]["total"], 0);

    let response = app
        .client
        .put(app.url(&format!("/admin/say/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "content": "again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

// --- Extractor errors (rejected before the database is touched) ---

#[tokio::test]
async fn non_numeric_page_is_invalid() {
    let app = spawn_app().await;

    let (status, body) = get_json(&app, "/say?pageSize=ten").await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn non_numeric_article_id_is_invalid() {
    let app = spawn_app().await;

    let (status, body) = get_json(&app, "/article/first").await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(body["code"], "INVALID_REQUEST");
}
