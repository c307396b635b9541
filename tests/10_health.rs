mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn health_endpoint_reports_ok() -> Result<()> {
    let app = common::TestApp::new();

    let res = app.get("/health").await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let app = common::TestApp::new();

    let res = app.get("/").await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Companies API");
    assert!(res.body["endpoints"]["list"].as_str().unwrap().starts_with("GET /companies"));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let app = common::TestApp::new();

    let res = app.get("/nope").await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}
