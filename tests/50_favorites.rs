mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;

async fn favorites(server: &common::TestServer, client: &Client) -> Result<Vec<Value>> {
    let res = client.get(server.url("/api/users/recipes")).send().await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "list favorites failed: {}", res.status());
    Ok(res.json().await?)
}

fn id(value: &Value) -> &str {
    value["id"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn favorites_keep_order_and_duplicates() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (client, _) = server.register("julia", "butter").await?;
    let cook = server.create_cook(&client, "Julia").await?;
    let first = server.create_recipe(&client, id(&cook), "First").await?;
    let second = server.create_recipe(&client, id(&cook), "Second").await?;

    for recipe in [&second, &first, &second] {
        let res = client
            .post(server.url(&format!("/api/users/add/{}", id(recipe))))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(favorites(&server, &client).await?, vec![second.clone(), first, second]);

    let me: Value = client.get(server.url("/api/users")).send().await?.json().await?;
    assert_eq!(me["user"]["recipes"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn adding_unknown_recipe_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (client, _) = server.register("julia", "butter").await?;

    for target in [uuid::Uuid::new_v4().to_string(), "garbage".to_string()] {
        let res = client
            .post(server.url(&format!("/api/users/add/{}", target)))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    assert!(favorites(&server, &client).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn remove_drops_every_occurrence() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (client, _) = server.register("julia", "butter").await?;
    let cook = server.create_cook(&client, "Julia").await?;
    let keep = server.create_recipe(&client, id(&cook), "Keep").await?;
    let drop = server.create_recipe(&client, id(&cook), "Drop").await?;

    for recipe in [&drop, &keep, &drop] {
        client
            .post(server.url(&format!("/api/users/add/{}", id(recipe))))
            .send()
            .await?;
    }

    let res = client
        .delete(server.url(&format!("/api/users/remove/{}", id(&drop))))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(favorites(&server, &client).await?, vec![keep]);
    Ok(())
}

#[tokio::test]
async fn removing_absent_favorite_is_ok() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (client, _) = server.register("julia", "butter").await?;
    let cook = server.create_cook(&client, "Julia").await?;
    let kept = server.create_recipe(&client, id(&cook), "Kept").await?;
    client
        .post(server.url(&format!("/api/users/add/{}", id(&kept))))
        .send()
        .await?;

    for target in [uuid::Uuid::new_v4().to_string(), "garbage".to_string()] {
        let res = client
            .delete(server.url(&format!("/api/users/remove/{}", target)))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(favorites(&server, &client).await?, vec![kept]);
    Ok(())
}

#[tokio::test]
async fn deleted_recipes_drop_out_of_the_list() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (client, _) = server.register("julia", "butter").await?;
    let cook = server.create_cook(&client, "Julia").await?;
    let gone = server.create_recipe(&client, id(&cook), "Gone").await?;
    let kept = server.create_recipe(&client, id(&cook), "Kept").await?;

    for recipe in [&gone, &kept] {
        client
            .post(server.url(&format!("/api/users/add/{}", id(recipe))))
            .send()
            .await?;
    }
    client
        .delete(server.url(&format!("/api/cooks/{}/recipes/{}", id(&cook), id(&gone))))
        .send()
        .await?;

    assert_eq!(favorites(&server, &client).await?, vec![kept]);
    Ok(())
}

#[tokio::test]
async fn favorites_are_per_user() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let (julia, _) = server.register("julia", "butter").await?;
    let (paul, _) = server.register("paul", "salt").await?;
    let cook = server.create_cook(&julia, "Julia").await?;
    let recipe = server.create_recipe(&julia, id(&cook), "Omelette").await?;

    julia
        .post(server.url(&format!("/api/users/add/{}", id(&recipe))))
        .send()
        .await?;

    assert_eq!(favorites(&server, &julia).await?, vec![recipe]);
    assert!(favorites(&server, &paul).await?.is_empty());
    Ok(())
}
