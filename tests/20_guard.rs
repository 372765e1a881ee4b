mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;
use studyhall_api_rust::database::models::Role;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // We consider OK or SERVICE_UNAVAILABLE acceptable as a basic liveness check
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    // Should be valid JSON
    let _body = res.json::<Value>().await?;
    Ok(())
}

#[tokio::test]
async fn anonymous_premium_route_gets_sign_in_prompt() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/quizzes", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "SIGN_IN_REQUIRED");
    assert_eq!(body["redirect"], "/auth/login");
    Ok(())
}

#[tokio::test]
async fn student_premium_route_gets_upgrade_prompt() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token = common::token_for(users.student, "Ada", vec![Role::Student]);

    let res = client
        .get(format!("{}/api/quizzes", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UPGRADE_REQUIRED");
    assert_eq!(body["redirect"], "/subscriptions/upgrade");
    Ok(())
}

#[tokio::test]
async fn teacher_passes_the_guard() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token = common::token_for(users.teacher, "Mrs Bello", vec![Role::Teacher]);

    let res = client
        .get(format!("{}/api/quizzes", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;

    // The guard let the request through; without a database the handler
    // itself may degrade, but never to an entitlement refusal
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn anonymous_forum_reads_pass_the_guard() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/forum/threads", server.base_url))
        .send()
        .await?;

    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_surface_rejects_non_admins() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let client = reqwest::Client::new();

    // Anonymous: no token at all
    let res = client
        .post(format!("{}/api/admin/subscriptions/sweep", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Teacher role bypasses feature gates, but not the admin surface
    let token = common::token_for(users.teacher, "Mrs Bello", vec![Role::Teacher]);
    let res = client
        .post(format!("{}/api/admin/subscriptions/sweep", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn expired_tokens_read_as_anonymous_on_guarded_routes() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/quizzes", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;

    // Invalid credentials fail closed into the sign-in path
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "SIGN_IN_REQUIRED");
    Ok(())
}
