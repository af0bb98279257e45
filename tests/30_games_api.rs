mod common;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use serde_json::{json, Value};

use gamecafe::services::{CatalogService, GameInput};
use gamecafe::types::TagType;

use common::{test_config, TestApp};

async fn seed_games(app: &TestApp, count: i64) -> Result<()> {
    let catalog = CatalogService::new(app.state.db.clone());
    for n in 1..=count {
        catalog
            .add_game(GameInput { bgg_id: 1000 + n, name: format!("Game {:02}", n), ..Default::default() })
            .await?;
    }
    Ok(())
}

fn ids(page: &Value) -> Vec<i64> {
    page["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|g| g["id"].as_i64()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn first_and_last_page_of_twenty_five() -> Result<()> {
    let app = TestApp::new();
    seed_games(&app, 25).await?;

    let first = app.get("/api/games", None).await?;
    assert_eq!(first.status, StatusCode::OK);
    let page = first.json()?["data"].clone();
    assert_eq!(ids(&page), (1..=12).collect::<Vec<_>>());
    assert_eq!(page["page_count"], 3);
    assert_eq!(page["previous_page"], Value::Null);
    assert_eq!(page["next_page"], 2);

    let last = app.get("/api/games?p=3", None).await?;
    let page = last.json()?["data"].clone();
    assert_eq!(ids(&page), vec![25]);
    assert_eq!(page["next_page"], Value::Null);
    assert_eq!(page["previous_page"], 2);
    Ok(())
}

#[tokio::test]
async fn page_size_and_page_number_are_sanitized() -> Result<()> {
    let app = TestApp::new();
    seed_games(&app, 25).await?;

    let res = app.get("/api/games?per_page=5&p=-4", None).await?;
    let page = res.json()?["data"].clone();
    assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
    assert_eq!(page["page_count"], 5);
    assert_eq!(page["current_page"], 1);

    let res = app.get("/api/games?per_page=500&p=banana", None).await?;
    let page = res.json()?["data"].clone();
    assert_eq!(ids(&page).len(), 25);
    assert_eq!(page["page_count"], 1);
    Ok(())
}

#[tokio::test]
async fn search_is_a_case_insensitive_regex() -> Result<()> {
    let app = TestApp::new();
    let catalog = CatalogService::new(app.state.db.clone());
    for (bgg_id, name) in [(13, "Catan"), (822, "Carcassonne"), (30549, "Pandemic"), (9209, "Ticket to Ride")] {
        catalog.add_game(GameInput { bgg_id, name: name.into(), ..Default::default() }).await?;
    }

    let res = app.get("/api/games?q=%5Eca", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let page = res.json()?["data"].clone();
    let names: Vec<_> = page["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|g| g["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Catan", "Carcassonne"]);
    assert_eq!(page["page_count"], 1);

    let res = app.get("/api/games?q=RIDE%24", None).await?;
    assert_eq!(ids(&res.json()?["data"]).len(), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_pattern_is_a_bad_request() -> Result<()> {
    let app = TestApp::new();
    seed_games(&app, 3).await?;

    let res = app.get("/api/games?q=%28unclosed", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["success"], false);
    Ok(())
}

#[tokio::test]
async fn read_resolves_publishers_and_tags() -> Result<()> {
    let app = TestApp::new();
    let game = CatalogService::new(app.state.db.clone())
        .add_game(GameInput {
            bgg_id: 13,
            name: "Catan".into(),
            publishers: vec![(37, "KOSMOS".into())],
            tags: vec![(1021, "Economic".into(), TagType::Category)],
            ..Default::default()
        })
        .await?;

    let res = app.get(&format!("/api/games/{}", game.id.unwrap_or_default()), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let data = res.json()?["data"].clone();
    assert_eq!(data["name"], "Catan");
    assert_eq!(data["publishers"][0]["name"], "KOSMOS");
    assert_eq!(data["tags"][0]["name"], "Economic");

    let missing = app.get("/api/games/999", None).await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()?, json!({ "success": false, "error": "Not Found" }));
    Ok(())
}

#[tokio::test]
async fn games_cannot_be_deleted_through_the_api() -> Result<()> {
    let app = TestApp::new();
    seed_games(&app, 1).await?;

    let res = app.empty(Method::DELETE, "/api/games/1", None).await?;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.json()?["error"], "Not Allowed");
    assert!(app.state.db.games.get_by_id(1).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn game_page_shows_twelve() -> Result<()> {
    let app = TestApp::new();
    seed_games(&app, 13).await?;

    let res = app.get("/games?p=2", None).await?;
    assert_eq!(res.template()?, "pages/games.html");
    let page = res.context()?["page"].clone();
    assert_eq!(ids(&page), vec![13]);
    assert_eq!(page["previous_page"], 1);
    Ok(())
}

#[tokio::test]
async fn box_art_is_served_from_the_image_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("catan.png"), b"\x89PNG fake")?;

    let mut config = test_config();
    config.storage.image_root = dir.path().to_path_buf();
    let app = TestApp::with_config(config);

    let catalog = CatalogService::new(app.state.db.clone());
    catalog
        .add_game(GameInput { bgg_id: 13, name: "Catan".into(), image_path: Some("catan.png".into()), ..Default::default() })
        .await?;
    catalog
        .add_game(GameInput { bgg_id: 822, name: "Carcassonne".into(), image_path: Some("gone.png".into()), ..Default::default() })
        .await?;

    let res = app.get("/games/13/image", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()), Some("image/png"));
    assert_eq!(&res.body[..], b"\x89PNG fake");

    assert_eq!(app.get("/games/822/image", None).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/games/404/image", None).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() -> Result<()> {
    let app = TestApp::new();
    seed_games(&app, 25).await?;

    let api = app.get("/api/games?p=9223372036854775807&per_page=50", None).await?;
    assert_eq!(api.status, StatusCode::OK);
    let page = api.json()?["data"].clone();
    assert!(ids(&page).is_empty());
    assert_eq!(page["next_page"], Value::Null);
    assert_eq!(page["page_count"], 1);

    let html = app.get("/games?p=9223372036854775807", None).await?;
    assert_eq!(html.status, StatusCode::OK);
    let page = html.context()?["page"].clone();
    assert!(ids(&page).is_empty());
    assert_eq!(page["next_page"], Value::Null);
    Ok(())
}
