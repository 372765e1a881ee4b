mod common;

use anyhow::Result;
use serde_json::Value;
use studyhall_api_rust::database::models::Role;

async fn fetch_report(
    base_url: &str,
    feature: &str,
    token: Option<String>,
) -> Result<Value> {
    let client = reqwest::Client::new();
    let mut request = client.get(format!("{}/api/access/{}", base_url, feature));

    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let body: Value = request.send().await?.json().await?;
    Ok(body["data"].clone())
}

#[tokio::test]
async fn anonymous_forum_access_is_allowed_without_bypass() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;

    let report = fetch_report(&server.base_url, "forum", None).await?;

    assert_eq!(report["outcome"], "allowed");
    assert_eq!(report["allowed"], true);
    assert_eq!(report["bypass"], false);
    assert_eq!(report["grant"], "free-feature");
    assert!(report["redirect"].is_null());
    Ok(())
}

#[tokio::test]
async fn anonymous_quizzes_access_is_unauthenticated() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;

    let report = fetch_report(&server.base_url, "quizzes", None).await?;

    assert_eq!(report["outcome"], "unauthenticated");
    assert_eq!(report["allowed"], false);
    assert_eq!(report["redirect"], "/auth/login");
    Ok(())
}

#[tokio::test]
async fn student_without_subscription_is_denied_with_upgrade_prompt() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let token = common::token_for(users.student, "Ada", vec![Role::Student]);

    let report = fetch_report(&server.base_url, "quizzes", Some(token)).await?;

    // Denied, not unauthenticated: the account exists but lacks the tier
    assert_eq!(report["outcome"], "denied");
    assert_eq!(report["redirect"], "/subscriptions/upgrade");
    Ok(())
}

#[tokio::test]
async fn teacher_bypasses_premium_features() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let token = common::token_for(users.teacher, "Mrs Bello", vec![Role::Teacher]);

    let report = fetch_report(&server.base_url, "quizzes", Some(token)).await?;

    assert_eq!(report["outcome"], "allowed");
    assert_eq!(report["bypass"], true);
    assert_eq!(report["grant"], "role-bypass");
    Ok(())
}

#[tokio::test]
async fn premium_subscription_to_one_subject_opens_every_premium_feature() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let token = common::token_for(users.premium_student, "Chidi", vec![Role::Student]);

    // Subscription is for "BST"; flashcards are not scoped per subject
    let report = fetch_report(&server.base_url, "flashcards", Some(token)).await?;

    assert_eq!(report["outcome"], "allowed");
    assert_eq!(report["bypass"], false);
    assert_eq!(report["grant"], "premium-subscription");
    Ok(())
}

#[tokio::test]
async fn unknown_feature_names_are_premium_required() -> Result<()> {
    let (server, users) = common::spawn_server().await?;

    let anonymous = fetch_report(&server.base_url, "shiny-new-page", None).await?;
    assert_eq!(anonymous["outcome"], "unauthenticated");

    let token = common::token_for(users.student, "Ada", vec![Role::Student]);
    let student = fetch_report(&server.base_url, "shiny-new-page", Some(token)).await?;
    assert_eq!(student["outcome"], "denied");
    Ok(())
}

#[tokio::test]
async fn catalog_lists_the_default_free_features() -> Result<()> {
    let (server, _users) = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/access", server.base_url))
        .send()
        .await?
        .json()
        .await?;

    let table = body["data"].as_array().expect("classification table");
    assert_eq!(table.len(), 9);

    let tier_of = |name: &str| {
        table
            .iter()
            .find(|entry| entry["feature"] == name)
            .map(|entry| entry["tier"].clone())
    };

    assert_eq!(tier_of("subject-browsing"), Some(Value::from("free")));
    assert_eq!(tier_of("forum"), Some(Value::from("free")));
    assert_eq!(tier_of("quizzes"), Some(Value::from("premium")));
    assert_eq!(tier_of("student-dashboard"), Some(Value::from("premium")));
    Ok(())
}

#[tokio::test]
async fn repeated_checks_are_deterministic() -> Result<()> {
    let (server, users) = common::spawn_server().await?;
    let token = common::token_for(users.student, "Ada", vec![Role::Student]);

    let first = fetch_report(&server.base_url, "resources", Some(token.clone())).await?;
    let second = fetch_report(&server.base_url, "resources", Some(token)).await?;

    assert_eq!(first, second);
    Ok(())
}
