//! HTTP-level tests over the excursion routes, running against the in-memory
//! store with the real middleware, extractors, and error envelope.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use actix_web::http::header;
use actix_web::{test, web, App};
use backend::adapters::ownership_memory::MemoryOwnershipStore;
use backend::auth::jwt::mint_access_token;
use backend::middleware::request_trace::RequestTrace;
use backend::repos::ownership::OwnershipStore;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use serde_json::{json, Value};
use uuid::Uuid;

const TEST_SECRET: &[u8] = b"api-test-secret";

fn test_state() -> (Arc<MemoryOwnershipStore>, AppState) {
    let store = Arc::new(MemoryOwnershipStore::new());
    let state = AppState::without_db(store.clone(), SecurityConfig::new(TEST_SECRET));
    (store, state)
}

fn bearer(user_id: Uuid) -> (header::HeaderName, String) {
    let token = mint_access_token(
        &user_id.to_string(),
        "hiker@example.com",
        SystemTime::now(),
        &SecurityConfig::new(TEST_SECRET),
    )
    .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestTrace)
                .app_data(web::Data::new($state))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_token_is_401_with_envelope() {
    let (_store, state) = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/excursions").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    assert!(resp.headers().get("x-request-id").is_some());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], true);
    assert!(body["data"].is_null());
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn inbound_request_id_is_echoed_back() {
    let (_store, state) = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/excursions/all")
        .insert_header(("x-request-id", "trace-from-proxy"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let echoed = resp.headers().get("x-request-id").unwrap();
    assert_eq!(echoed.to_str().unwrap(), "trace-from-proxy");
}

#[actix_web::test]
async fn expired_token_is_401() {
    let (store, state) = test_state();
    let app = init_app!(state);
    let user = store.insert_user("Ada", "Trail", "ada@example.com");

    let stale = mint_access_token(
        &user.id.to_string(),
        "ada@example.com",
        SystemTime::now() - Duration::from_secs(20 * 60),
        &SecurityConfig::new(TEST_SECRET),
    )
    .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/excursions")
        .insert_header((header::AUTHORIZATION, format!("Bearer {stale}")))
        .set_json(json!({ "name": "Zion" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    assert!(store.list_all_excursions().await.unwrap().is_empty());
}

#[actix_web::test]
async fn create_returns_201_with_refreshed_view() {
    let (store, state) = test_state();
    let app = init_app!(state);
    let user = store.insert_user("Zee", "Canyon", "zee@example.com");

    let req = test::TestRequest::post()
        .uri("/api/excursions")
        .insert_header(bearer(user.id))
        .set_json(json!({ "name": "Zion" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], false);
    assert_eq!(body["message"], "Successfully added new excursion.");
    assert_eq!(body["data"]["first_name"], "Zee");
    assert_eq!(body["data"]["excursions"][0]["name"], "Zion");
    assert_eq!(body["data"]["excursions"][0]["item_refs"], json!([]));
}

#[actix_web::test]
async fn delete_returns_view_without_the_excursion() {
    let (store, state) = test_state();
    let app = init_app!(state);
    let user = store.insert_user("Zee", "Canyon", "zee@example.com");

    let req = test::TestRequest::post()
        .uri("/api/excursions")
        .insert_header(bearer(user.id))
        .set_json(json!({ "name": "Zion" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let excursion_id = body["data"]["excursions"][0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/excursions/{excursion_id}"))
        .insert_header(bearer(user.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], false);
    assert_eq!(body["data"]["excursions"], json!([]));

    let id: Uuid = excursion_id.parse().unwrap();
    assert!(store.get_excursion(id).await.unwrap().is_none());
}

#[actix_web::test]
async fn public_listing_requires_no_token() {
    let (store, state) = test_state();
    let app = init_app!(state);
    store.create_excursion("Anyone can see this").await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/excursions/all")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["error"], false);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn unknown_excursion_is_404() {
    let (_store, state) = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/excursions/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], true);
}

#[actix_web::test]
async fn rename_is_token_gated() {
    let (store, state) = test_state();
    let app = init_app!(state);
    let user = store.insert_user("Zee", "Canyon", "zee@example.com");
    let excursion = store.create_excursion("Draft").await.unwrap();

    // No token: rejected.
    let req = test::TestRequest::put()
        .uri(&format!("/api/excursions/{}", excursion.id))
        .set_json(json!({ "name": "Final" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // With token: renamed.
    let req = test::TestRequest::put()
        .uri(&format!("/api/excursions/{}", excursion.id))
        .insert_header(bearer(user.id))
        .set_json(json!({ "name": "Final" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["error"], false);
    assert_eq!(body["data"]["name"], "Final");
}

#[actix_web::test]
async fn blank_name_is_400() {
    let (store, state) = test_state();
    let app = init_app!(state);
    let user = store.insert_user("Zee", "Canyon", "zee@example.com");

    let req = test::TestRequest::post()
        .uri("/api/excursions")
        .insert_header(bearer(user.id))
        .set_json(json!({ "name": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    assert!(store.list_all_excursions().await.unwrap().is_empty());
}

#[actix_web::test]
async fn health_reports_ok_without_db() {
    let (_store, state) = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "none");
}
