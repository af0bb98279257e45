mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};

use gamecafe::handlers::register_all;
use gamecafe::types::Role;
use gamecafe::views::ViewRegistry;

use common::TestApp;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/health", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json()?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn anonymous_admin_page_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/users", None).await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.template()?, "pages/404.html");
    Ok(())
}

#[tokio::test]
async fn minimum_role_is_enforced_by_rank() -> Result<()> {
    let app = TestApp::new();
    let user = app.create_user("player", Role::User).await?;
    let editor = app.create_user("editor", Role::Editor).await?;
    let admin = app.create_user("admin", Role::Admin).await?;

    let cases = [
        ("/users", &user, StatusCode::NOT_FOUND),
        ("/users", &editor, StatusCode::NOT_FOUND),
        ("/users", &admin, StatusCode::OK),
        ("/reports", &user, StatusCode::NOT_FOUND),
        ("/reports", &editor, StatusCode::OK),
        ("/reports", &admin, StatusCode::OK),
        ("/collections/new", &user, StatusCode::NOT_FOUND),
        ("/collections/new", &editor, StatusCode::OK),
    ];

    for (path, who, expected) in cases {
        let token = app.token_for(who)?;
        let res = app.get(path, Some(&token)).await?;
        assert_eq!(res.status, expected, "{} as {}", path, who.username);
    }
    Ok(())
}

#[tokio::test]
async fn admin_page_lists_users_ten_at_a_time() -> Result<()> {
    let app = TestApp::new();
    let admin = app.create_user("admin", Role::Admin).await?;
    for i in 0..11 {
        app.create_user(&format!("player{}", i), Role::User).await?;
    }

    let res = app.get("/users", Some(&app.token_for(&admin)?)).await?;
    assert_eq!(res.template()?, "pages/users.html");
    let context = res.context()?;
    assert_eq!(context["page"]["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(context["page"]["page_count"], 2);
    assert_eq!(context["user"]["username"], "admin");
    assert!(context["page"]["items"][0].get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn bearer_token_is_accepted() -> Result<()> {
    let app = TestApp::new();
    let admin = app.create_user("admin", Role::Admin).await?;
    let token = app.token_for(&admin)?;

    let request = axum::http::Request::builder()
        .uri("/users")
        .header("Authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())?;
    assert_eq!(app.send(request).await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn bad_or_orphaned_sessions_are_anonymous() -> Result<()> {
    let app = TestApp::new();
    let admin = app.create_user("admin", Role::Admin).await?;
    let token = app.token_for(&admin)?;

    let res = app.get("/users", Some("not-a-token")).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    app.state.db.users.delete(admin.id.unwrap_or_default()).await?;
    let res = app.get("/users", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unsupported_verbs_are_rejected() -> Result<()> {
    let app = TestApp::new();
    let res = app.empty(Method::PUT, "/login", None).await?;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn denied_requests_do_not_reveal_unsupported_verbs() -> Result<()> {
    let app = TestApp::new();
    let res = app.empty(Method::PUT, "/users", None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn denied_callers_never_have_their_body_read() -> Result<()> {
    let app = TestApp::new();
    let player = app.create_user("player", Role::User).await?;
    let admin = app.create_user("admin", Role::Admin).await?;
    let oversized = vec![b'x'; 3 * 1024 * 1024];

    let denied = axum::http::Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/users/{}", admin.id.unwrap_or_default()))
        .header("Authorization", format!("Bearer {}", app.token_for(&player)?))
        .body(axum::body::Body::from(oversized.clone()))?;
    let res = app.send(denied).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.template()?, "pages/404.html");

    let admitted = axum::http::Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/users/{}", player.id.unwrap_or_default()))
        .header("Authorization", format!("Bearer {}", app.token_for(&admin)?))
        .body(axum::body::Body::from(oversized))?;
    assert_eq!(app.send(admitted).await?.status, StatusCode::PAYLOAD_TOO_LARGE);
    Ok(())
}

#[test]
fn route_table_is_stable_and_idempotent() {
    let mut once = ViewRegistry::new();
    register_all(&mut once);

    let mut twice = ViewRegistry::new();
    register_all(&mut twice);
    register_all(&mut twice);

    assert_eq!(once.entries(), twice.entries());

    let paths: Vec<_> = once.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths[0], "/");
    assert!(paths.contains(&"/api/users"));
    assert!(paths.contains(&"/api/users/:key"));
    assert!(paths.contains(&"/collections/:collection_id/edit"));

    let mut unique = paths.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), paths.len());
}
