mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = reqwest::get(server.url("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Recipes API");
    assert!(body["data"]["endpoints"].get("favorites").is_some());
    Ok(())
}

#[tokio::test]
async fn health_reports_database_status() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = reqwest::get(server.url("/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = reqwest::get(server.url("/api/nothing")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
