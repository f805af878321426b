mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::user_with_role;
use deckshow_be::{
    auth::generate_jwt,
    config::AppConfig,
    create_app,
    db::MemoryStore,
    models::{User, user::Role},
    state::AppState,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn app(store: Arc<MemoryStore>) -> Router {
    create_app(AppState::new(store, AppConfig::for_tests(SECRET)))
}

fn token(user: &User) -> String {
    generate_jwt(user, SECRET, 1).unwrap()
}

fn request(method: &str, uri: &str, user: Option<&User>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user)));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, _) = send(&app, request("GET", "/seasons", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_returns_working_token() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/users",
            None,
            Some(json!({ "name": "Pat", "email": "pat@example.com" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "HOST");

    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    let bearer = body["token"].as_str().unwrap().to_string();
    let req = Request::builder()
        .uri(format!("/users/{user_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "pat@example.com");
}

#[tokio::test]
async fn test_hosts_cannot_create_seasons() {
    let store = Arc::new(MemoryStore::new());
    let host = user_with_role(&store, Role::Host).await;
    let app = app(store);

    let (status, _) = send(
        &app,
        request("POST", "/seasons", Some(&host), Some(json!({ "name": "S1" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_live_round_over_http() {
    let store = Arc::new(MemoryStore::new());
    let producer = user_with_role(&store, Role::Producer).await;
    let host = user_with_role(&store, Role::Host).await;
    let app = app(store);

    let (status, season) = send(
        &app,
        request("POST", "/seasons", Some(&producer), Some(json!({ "name": "S1" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let season_id = season["id"].as_str().unwrap().to_string();

    let (status, card) = send(
        &app,
        request(
            "POST",
            &format!("/seasons/{season_id}/decks/easy/cards"),
            Some(&producer),
            Some(json!({ "question": "Q", "correctAnswer": "A" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["cardNumber"], 1);
    assert_eq!(card["difficulty"], "EASY");

    let (status, drawn) = send(
        &app,
        request(
            "POST",
            &format!("/seasons/{season_id}/decks/EASY/draw"),
            Some(&host),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drawn["usageCount"], 1);
    assert!(drawn["lastUsed"].is_string());

    let (status, attempt) = send(
        &app,
        request(
            "POST",
            "/attempts",
            Some(&host),
            Some(json!({
                "cardId": drawn["id"],
                "contestantName": "Ann",
                "givenAnswer": "a"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attempt["isCorrect"], true);

    let (status, stats) = send(
        &app,
        request(
            "GET",
            &format!("/analytics/seasons/{season_id}/cards"),
            Some(&host),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats[0]["totalAttempts"], 1);
    assert_eq!(stats[0]["correctAttempts"], 1);
    assert_eq!(stats[0]["successRate"], 100.0);

    let (status, history) = send(
        &app,
        request(
            "GET",
            &format!("/attempts?seasonId={season_id}&limit=5"),
            Some(&host),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["total"], 1);
    assert_eq!(history["limit"], 5);
    assert_eq!(history["items"][0]["card"]["cardNumber"], 1);
}

#[tokio::test]
async fn test_deck_errors_map_to_status_codes() {
    let store = Arc::new(MemoryStore::new());
    let producer = user_with_role(&store, Role::Producer).await;
    let app = app(store);

    let (_, season) = send(
        &app,
        request("POST", "/seasons", Some(&producer), Some(json!({ "name": "S1" }))),
    )
    .await;
    let season_id = season["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/seasons/{season_id}/decks/impossible/draw"),
            Some(&producer),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/seasons/{season_id}/decks/hard/draw"),
            Some(&producer),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let card = json!({ "cardNumber": 4, "question": "Q", "correctAnswer": "A" });
    let uri = format!("/seasons/{season_id}/decks/hard/cards");
    let (status, _) = send(&app, request("POST", &uri, Some(&producer), Some(card.clone()))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request("POST", &uri, Some(&producer), Some(card))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/seasons/{}", uuid::Uuid::new_v4()),
            Some(&producer),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admins_manage_roles() {
    let store = Arc::new(MemoryStore::new());
    let admin = user_with_role(&store, Role::Admin).await;
    let host = user_with_role(&store, Role::Host).await;
    let app = app(store);

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/users/{}/role", admin.id),
            Some(&host),
            Some(json!({ "role": "ADMIN" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/users/{}/role", host.id),
            Some(&admin),
            Some(json!({ "role": "PRODUCER" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "PRODUCER");

    // The fresh role applies to the old token immediately
    let (status, _) = send(
        &app,
        request("POST", "/seasons", Some(&host), Some(json!({ "name": "S9" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) =
        send(&app, request("GET", "/users/stats/roles", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["producer"], 1);
    assert_eq!(stats["total"], 2);
}
