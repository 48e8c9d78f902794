//! HTTP API tests - the full router over the in-memory store.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use common::{bearer_for, seed_citizen, seed_ngo, TEST_JWT_ISSUER, TEST_JWT_SECRET};
use rescue_core::domains::auth::JwtService;
use rescue_core::kernel::{MemoryCaseStore, ServerDeps};
use rescue_core::server::app::build_app;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(store: &Arc<MemoryCaseStore>) -> Router {
    let jwt_service = Arc::new(JwtService::new(
        TEST_JWT_SECRET,
        TEST_JWT_ISSUER.to_string(),
    ));
    build_app(ServerDeps::new(store.clone(), 5.0), jwt_service, &[])
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", token);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn case_body(title: &str, severity: &str, latitude: f64) -> Value {
    json!({
        "title": title,
        "description": "Seen near the bus stop",
        "type": "INJURED",
        "severity": severity,
        "latitude": latitude,
        "longitude": 77.5946,
        "tags": "dog, injured",
    })
}

#[tokio::test]
async fn test_health() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["status"], "ok");
}

#[tokio::test]
async fn test_writes_require_authentication() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/cases",
        None,
        Some(case_body("Dog", "Urgent", 12.97)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/cases",
        Some("Bearer not-a-token"),
        Some(case_body("Dog", "Urgent", 12.97)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Reads are public
    let (status, body) = send(&app, Method::GET, "/cases", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_case_validation_and_shape() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);
    let citizen = seed_citizen(&store, "Asha").await;
    let token = bearer_for(&citizen);

    let (status, body) = send(
        &app,
        Method::POST,
        "/cases",
        Some(&token),
        Some(json!({ "title": "Dog", "type": "INJURED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title and description are required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/cases",
        Some(&token),
        Some(case_body("Dog under a car", "Critical", 12.98)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "INJURED");
    assert_eq!(body["severity"], "Critical");
    assert_eq!(body["status"], "Reported");
    assert_eq!(body["tags"], json!(["dog", "injured"]));
    assert_eq!(body["reportedById"], citizen.id.to_string());
    assert_eq!(body["assignedNgoId"], Value::Null);
    assert_eq!(body["assignedNgo"], Value::Null);

    let id = body["id"].as_str().unwrap().to_string();
    let (status, fetched) = send(&app, Method::GET, &format!("/cases/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Dog under a car");
}

#[tokio::test]
async fn test_claim_flow_over_http() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);
    let citizen = seed_citizen(&store, "Ravi").await;
    let (ngo, _) = seed_ngo(&store, "Bengaluru Paws").await;
    let (rival, _) = seed_ngo(&store, "Jayanagar Rescue").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/cases",
        Some(&bearer_for(&citizen)),
        Some(case_body("Cat on ledge", "Urgent", 12.975)),
    )
    .await;
    let status_uri = format!("/cases/{}/status", created["id"].as_str().unwrap());

    // Citizens cannot touch status
    let (status, body) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(&bearer_for(&citizen)),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient role");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(&bearer_for(&ngo)),
        Some(json!({ "status": "Pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid status"));

    // Empty body claims
    let (status, claimed) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(&bearer_for(&ngo)),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claimed["status"], "InProgress");
    assert_eq!(claimed["assignedNgo"]["id"], ngo.id.to_string());
    assert_eq!(claimed["assignedNgo"]["name"], "Bengaluru Paws");
    assert_eq!(claimed["assignedNgo"]["email"], ngo.email);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(&bearer_for(&rival)),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, resolved) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(&bearer_for(&ngo)),
        Some(json!({ "status": "Resolved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "Resolved");
}

#[tokio::test]
async fn test_reporter_update_ignores_status() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);
    let citizen = seed_citizen(&store, "Meera").await;
    let other = seed_citizen(&store, "Kiran").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/cases",
        Some(&bearer_for(&citizen)),
        Some(case_body("Calf in drain", "Moderate", 12.972)),
    )
    .await;
    let uri = format!("/cases/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&bearer_for(&other)),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only the case creator can update this case");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&bearer_for(&citizen)),
        Some(json!({ "title": "Calf rescued from drain", "status": "Closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Calf rescued from drain");
    assert_eq!(updated["status"], "Reported");
}

#[tokio::test]
async fn test_nearby_cases() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);
    let citizen = seed_citizen(&store, "Divya").await;
    let (ngo, _) = seed_ngo(&store, "Whitefield Rescue").await;
    let token = bearer_for(&citizen);

    for (title, severity, latitude) in [
        ("Low nearby", "Low", 12.9720),
        ("Critical further", "Critical", 12.9900),
        ("Out of range", "Critical", 13.5000),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/cases",
            Some(&token),
            Some(case_body(title, severity, latitude)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/ngo/nearby-cases?lat=12.9716&lng=77.5946",
        Some(&bearer_for(&ngo)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Critical further", "Low nearby"]);

    let (status, body) = send(
        &app,
        Method::GET,
        "/ngo/nearby-cases?lng=77.5946",
        Some(&bearer_for(&ngo)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "lat and lng are required");

    let (status, _) = send(
        &app,
        Method::GET,
        "/ngo/nearby-cases?lat=12.9716&lng=77.5946",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_adoptions_and_deletes() {
    let store = Arc::new(MemoryCaseStore::new());
    let app = app(&store);
    let citizen = seed_citizen(&store, "Arun").await;
    let (ngo, _) = seed_ngo(&store, "Koramangala Rescue").await;

    let (status, listing) = send(
        &app,
        Method::POST,
        "/adoptions",
        Some(&bearer_for(&citizen)),
        Some(json!({
            "title": "Two kittens",
            "description": "Litter trained",
            "type": "INJURED",
            "severity": "Critical",
            "latitude": 12.97,
            "longitude": 77.59,
            "animalCount": "2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(listing["type"], "ADOPTION");
    assert_eq!(listing["severity"], Value::Null);
    assert_eq!(listing["animalCount"], 2);

    let (_, adoptions) = send(&app, Method::GET, "/adoptions", None, None).await;
    assert_eq!(adoptions.as_array().unwrap().len(), 1);
    let (_, cases) = send(&app, Method::GET, "/cases", None, None).await;
    assert!(cases.as_array().unwrap().is_empty());

    let (_, created) = send(
        &app,
        Method::POST,
        "/cases",
        Some(&bearer_for(&citizen)),
        Some(case_body("Abandoned dog", "Urgent", 12.973)),
    )
    .await;
    let case_id = created["id"].as_str().unwrap().to_string();

    // Not an adoption
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/adoptions/{case_id}"),
        Some(&bearer_for(&ngo)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Adoption not found");

    send(
        &app,
        Method::PATCH,
        &format!("/cases/{case_id}/status"),
        Some(&bearer_for(&ngo)),
        None,
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/cases/{case_id}"),
        Some(&bearer_for(&ngo)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/cases/{case_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/cases/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
