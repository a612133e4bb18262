mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn created_cook_echoes_input_and_is_listed() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();

    let res = client
        .post(server.url("/api/cooks"))
        .json(&json!({ "name": "Julia", "desc": "French cooking", "path": "/images/julia" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cook: Value = res.json().await?;
    assert_eq!(cook["name"], "Julia");
    assert_eq!(cook["desc"], "French cooking");
    assert_eq!(cook["path"], "/images/julia");
    assert!(cook["id"].is_string());

    let cooks: Vec<Value> = client.get(server.url("/api/cooks")).send().await?.json().await?;
    assert_eq!(cooks, vec![cook]);
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_stored_empty() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();

    let cook: Value = client
        .post(server.url("/api/cooks"))
        .json(&json!({ "name": "Only a name" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(cook["desc"], "");
    assert_eq!(cook["path"], "");
    Ok(())
}

#[tokio::test]
async fn update_overwrites_every_field() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();
    let cook = server.create_cook(&client, "Before").await?;
    let id = cook["id"].as_str().unwrap();

    let res = client
        .put(server.url(&format!("/api/cooks/{}", id)))
        .json(&json!({ "name": "After" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let updated: Value = res.json().await?;
    assert_eq!(updated["id"], cook["id"]);
    assert_eq!(updated["name"], "After");
    assert_eq!(updated["desc"], "");
    assert_eq!(updated["path"], "");
    Ok(())
}

#[tokio::test]
async fn updating_unknown_cook_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();

    for id in [uuid::Uuid::new_v4().to_string(), "not-an-id".to_string()] {
        let res = client
            .put(server.url(&format!("/api/cooks/{}", id)))
            .json(&json!({ "name": "Ghost" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = res.json().await?;
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "NOT_FOUND");
    }
    Ok(())
}

#[tokio::test]
async fn delete_succeeds_whether_or_not_cook_exists() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();
    let cook = server.create_cook(&client, "Doomed").await?;
    let url = server.url(&format!("/api/cooks/{}", cook["id"].as_str().unwrap()));

    assert_eq!(client.delete(&url).send().await?.status(), StatusCode::OK);
    assert_eq!(client.delete(&url).send().await?.status(), StatusCode::OK);

    let cooks: Vec<Value> = client.get(server.url("/api/cooks")).send().await?.json().await?;
    assert!(cooks.is_empty());
    Ok(())
}

#[tokio::test]
async fn bodyless_create_makes_an_empty_cook() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();

    let res = client.post(server.url("/api/cooks")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cook: Value = res.json().await?;
    assert_eq!(cook["name"], "");
    assert_eq!(cook["desc"], "");
    assert_eq!(cook["path"], "");
    Ok(())
}

#[tokio::test]
async fn wrongly_typed_cook_is_a_bad_request() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = Client::new();

    let res = client
        .post(server.url("/api/cooks"))
        .json(&json!({ "name": ["not", "a", "string"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let cooks: Vec<Value> = client.get(server.url("/api/cooks")).send().await?.json().await?;
    assert!(cooks.is_empty());
    Ok(())
}
