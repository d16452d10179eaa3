mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn users_requires_login() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::Client::new().get(server.url("/users")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], 401);
    assert_eq!(body["message"], "error");
    assert_eq!(body["data"]["error"], "You are not logged in");

    Ok(())
}

#[tokio::test]
async fn bearer_header_and_cookie_both_authenticate() -> Result<()> {
    let server = common::start_server().await?;
    common::register(&server, "jane@example.com", "secret123").await?;

    // Cookie only: the browser client keeps what login set.
    let browser = common::browser();
    let token = common::login(&browser, &server, "jane@example.com", "secret123").await?;
    let res = browser.get(server.url("/me")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Header only: a plain client with no cookies.
    let res = reqwest::Client::new()
        .get(server.url("/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["user"]["email"], "jane@example.com");

    Ok(())
}

#[tokio::test]
async fn header_takes_precedence_over_cookie() -> Result<()> {
    let server = common::start_server().await?;
    common::register(&server, "jane@example.com", "secret123").await?;

    let browser = common::browser();
    common::login(&browser, &server, "jane@example.com", "secret123").await?;

    // A valid cookie does not rescue a bad header.
    let res = browser
        .get(server.url("/me"))
        .bearer_auth("garbage")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["error"], "token is malformed");

    Ok(())
}

#[tokio::test]
async fn deleted_user_token_is_rejected() -> Result<()> {
    let server = common::start_server().await?;
    let id = common::register(&server, "gone@example.com", "secret123").await?;
    let client = reqwest::Client::new();
    let token = common::login(&client, &server, "gone@example.com", "secret123").await?;

    let res = client
        .delete(server.url(&format!("/user/delete/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/me")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["error"], "The user belonging to this token no longer exists");

    Ok(())
}

#[tokio::test]
async fn member_can_not_create_level() -> Result<()> {
    let server = common::start_server().await?;
    common::register(&server, "member@example.com", "secret123").await?;
    let client = reqwest::Client::new();
    let token = common::login(&client, &server, "member@example.com", "secret123").await?;

    let res = client
        .post(server.url("/level/create"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Staff", "acronym": "STF" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["error"], "You are not permitted to access this module");

    Ok(())
}

#[tokio::test]
async fn body_token_accepted_only_when_enabled() -> Result<()> {
    let mut config = common::test_config();
    config.auth.accept_body_token = true;
    let server = common::start_server_with(config).await?;
    let id = common::register(&server, "jane@example.com", "secret123").await?;

    let client = reqwest::Client::new();
    let token = common::login(&client, &server, "jane@example.com", "secret123").await?;

    let res = client
        .put(server.url(&format!("/user/update/{}", id)))
        .json(&json!({
            "access_token": token,
            "name": "Jane D.",
            "email": "jane@example.com",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["user"]["name"], "Jane D.");

    let default_server = common::start_server().await?;
    let res = client
        .put(default_server.url(&format!("/user/update/{}", id)))
        .json(&json!({ "access_token": token, "name": "x", "email": "jane@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
