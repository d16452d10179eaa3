mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn login_returns_token_and_sets_cookies() -> Result<()> {
    let server = common::start_server().await?;
    let id = common::register(&server, "jane@example.com", "secret123").await?;

    let res = reqwest::Client::new()
        .post(server.url("/user/auth"))
        .json(&json!({ "email": "jane@example.com", "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookies = common::set_cookies(&res);
    let access = common::find_cookie(&cookies, "access_token").expect("access cookie");
    let refresh = common::find_cookie(&cookies, "refresh_token").expect("refresh cookie");
    let flag = common::find_cookie(&cookies, "logged_in").expect("logged_in cookie");

    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Max-Age=900"));
    assert!(access.contains("Path=/"));
    assert!(access.contains("Domain=localhost"));
    assert!(refresh.contains("HttpOnly"));
    assert!(refresh.contains("Max-Age=3600"));
    assert!(flag.starts_with("logged_in=true"));
    assert!(!flag.contains("HttpOnly"));

    let body: Value = res.json().await?;
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "success");
    let token = body["data"]["access_token"].as_str().expect("token in body");
    assert_eq!(server.state.tokens.validate_access(token)?, id);

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = common::start_server().await?;
    common::register(&server, "jane@example.com", "secret123").await?;

    let res = reqwest::Client::new()
        .post(server.url("/user/auth"))
        .json(&json!({ "email": "jane@example.com", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(common::find_cookie(&common::set_cookies(&res), "access_token").is_none());

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["error"], "Invalid password");

    Ok(())
}

#[tokio::test]
async fn unknown_email_is_unauthorized() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::Client::new()
        .post(server.url("/user/auth"))
        .json(&json!({ "email": "nobody@example.com", "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["error"], "Email is not registered");

    Ok(())
}

#[tokio::test]
async fn refresh_uses_the_refresh_cookie() -> Result<()> {
    let server = common::start_server().await?;
    let id = common::register(&server, "jane@example.com", "secret123").await?;

    let browser = common::browser();
    common::login(&browser, &server, "jane@example.com", "secret123").await?;

    let res = browser.post(server.url("/user/refresh")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cookies = common::set_cookies(&res);
    assert!(common::find_cookie(&cookies, "access_token").is_some());
    assert!(common::find_cookie(&cookies, "logged_in").is_some());
    assert!(common::find_cookie(&cookies, "refresh_token").is_none());

    let body: Value = res.json().await?;
    let token = body["data"]["access_token"].as_str().expect("token in body");
    assert_eq!(server.state.tokens.validate_access(token)?, id);

    Ok(())
}

#[tokio::test]
async fn refresh_without_cookie_is_forbidden() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::Client::new().post(server.url("/user/refresh")).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(common::set_cookies(&res).is_empty());

    Ok(())
}

#[tokio::test]
async fn refresh_with_access_token_in_refresh_cookie_is_forbidden() -> Result<()> {
    let server = common::start_server().await?;
    common::register(&server, "jane@example.com", "secret123").await?;
    let client = reqwest::Client::new();
    let access = common::login(&client, &server, "jane@example.com", "secret123").await?;

    let res = client
        .post(server.url("/user/refresh"))
        .header(reqwest::header::COOKIE, format!("refresh_token={}", access))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(common::find_cookie(&common::set_cookies(&res), "access_token").is_none());

    Ok(())
}

#[tokio::test]
async fn logout_clears_cookies() -> Result<()> {
    let server = common::start_server().await?;
    common::register(&server, "jane@example.com", "secret123").await?;

    let browser = common::browser();
    common::login(&browser, &server, "jane@example.com", "secret123").await?;

    let res = browser.get(server.url("/user/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cookies = common::set_cookies(&res);
    for name in ["access_token", "refresh_token", "logged_in"] {
        let cookie = common::find_cookie(&cookies, name).expect("cleared cookie");
        assert!(cookie.starts_with(&format!("{}=;", name)), "{}", cookie);
        assert!(cookie.contains("Max-Age=0"), "{}", cookie);
    }

    // The browser dropped its cookies, so it is logged out.
    let res = browser.get(server.url("/me")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
