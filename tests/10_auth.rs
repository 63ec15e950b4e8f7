mod common;

use anyhow::Result;
use httpmock::Method::{GET, POST};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde_json::json;

use smartflex_admin::session::Session;

// base64url without padding, enough to build a syntactically valid JWT;
// the console never verifies the signature.
fn b64url(data: &str) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    URL_SAFE_NO_PAD.encode(data)
}

fn upstream_token(sub: &str) -> String {
    format!(
        "{}.{}.{}",
        b64url(r#"{"alg":"HS256","typ":"JWT"}"#),
        b64url(&format!(r#"{{"sub":"{}","exp":4102444800}}"#, sub)),
        b64url("sig")
    )
}

#[tokio::test]
async fn login_requires_username_and_password() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "maria" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().get(SET_COOKIE).is_none());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "username and password are required");
    Ok(())
}

#[tokio::test]
async fn login_mints_session_cookie() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let login = server
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/admin/api/login");
            then.status(200).header("content-type", "application/json").json_body(json!({
                "access_token": upstream_token("maria"),
                "token_type": "bearer",
            }));
        })
        .await;
    let user_info = server
        .backend
        .mock_async(|when, then| {
            when.method(GET).path("/admin/api/settings/user-info");
            then.status(200).header("content-type", "application/json").json_body(json!({
                "username": "maria",
                "role": "admin",
                "email": null,
                "full_name": null,
            }));
        })
        .await;

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "maria", "password": "secret" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    login.assert_async().await;
    user_info.assert_async().await;

    let cookie = res
        .headers()
        .get(SET_COOKIE)
        .expect("session cookie set")
        .to_str()?
        .to_string();
    assert!(cookie.starts_with("smartflex_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    // the cookie value round-trips to the minted session
    let value = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.splitn(2, '=').nth(1))
        .expect("cookie value");
    let session = Session::decode(value).expect("decodable session");
    assert_eq!(session.username, "maria");
    assert_eq!(session.role, "admin");

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "maria");
    assert_eq!(body["user"]["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn login_passes_upstream_error_through() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    server
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/admin/api/login");
            then.status(401)
                .header("content-type", "application/json").json_body(json!({ "detail": "bad credentials" }));
        })
        .await;

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "maria", "password": "wrong" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(SET_COOKIE).is_none());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "bad credentials");
    Ok(())
}

#[tokio::test]
async fn login_defaults_role_to_viewer_when_lookup_fails() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    server
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/admin/api/login");
            then.status(200)
                .header("content-type", "application/json").json_body(json!({ "access_token": upstream_token("maria") }));
        })
        .await;
    server
        .backend
        .mock_async(|when, then| {
            when.method(GET).path("/admin/api/settings/user-info");
            then.status(500).header("content-type", "application/json").json_body(json!({ "detail": "boom" }));
        })
        .await;

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "maria", "password": "secret" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["user"]["role"], "viewer");
    Ok(())
}

#[tokio::test]
async fn login_rejects_undecodable_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    server
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/admin/api/login");
            then.status(200)
                .header("content-type", "application/json").json_body(json!({ "access_token": "not-a-jwt" }));
        })
        .await;

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "maria", "password": "secret" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().get(SET_COOKIE).is_none());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "invalid token");
    Ok(())
}

#[tokio::test]
async fn session_requires_cookie() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/session", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "unauthorized");
    Ok(())
}

#[tokio::test]
async fn session_echoes_identity() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/session", server.base_url))
        .header(COOKIE, server.session_cookie("admin"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["username"], "testuser");
    assert_eq!(body["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn malformed_cookie_is_unauthorized() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/session", server.base_url))
        .header(COOKIE, "smartflex_session=%%%broken")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_expires_the_cookie() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}/api/auth/session", server.base_url))
        .header(COOKIE, server.session_cookie("viewer"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(SET_COOKIE)
        .expect("expiring cookie")
        .to_str()?;
    assert!(cookie.starts_with("smartflex_session=;"));
    assert!(cookie.contains("Max-Age=0"));

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    Ok(())
}
