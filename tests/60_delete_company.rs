mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn delete_returns_handle_and_removes_company() -> Result<()> {
    let app = common::TestApp::seeded().await?;
    let token = common::token();

    let res = app.send(Method::DELETE, "/companies/c1", Some(&token), None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "deleted": "c1" }));

    let res = app.get("/companies/c1").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/companies").await?;
    assert_eq!(res.body["companies"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn delete_missing_company_is_not_found() -> Result<()> {
    let app = common::TestApp::seeded().await?;

    let res = app
        .send(Method::DELETE, "/companies/ghost", Some(&common::token()), None)
        .await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "No company: ghost");
    Ok(())
}

#[tokio::test]
async fn second_delete_is_not_found() -> Result<()> {
    let app = common::TestApp::seeded().await?;
    let token = common::token();

    let first = app.send(Method::DELETE, "/companies/c2", Some(&token), None).await?;
    let second = app.send(Method::DELETE, "/companies/c2", Some(&token), None).await?;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    Ok(())
}
