use std::sync::{Arc, Mutex};

use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

use super::*;
use crate::environment::queries;

type Captured = Arc<Mutex<Option<Value>>>;

async fn api_for(router: Router) -> Api {
    let _ = env_logger::builder().is_test(true).try_init();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Api::new(Url::parse(&format!("http://{addr}")).unwrap()).unwrap()
}

fn instance_json(id: &str) -> Value {
    json!({
        "id": id,
        "medium": "physical",
        "reader": { "id": "r-1", "name": "Alex" },
        "book": { "id": "b-1", "title": "The Dispossessed" },
        "location": { "lat": 52.52, "lng": 13.4 }
    })
}

fn reader_json() -> Value {
    json!({
        "id": "r-1",
        "name": "Alex",
        "email": "alex@example.com",
        "photos": ["photo.jpg"]
    })
}

#[tokio::test]
async fn me_classifies_401_as_unauthorized() {
    let app = Router::new().route("/api/graph", post(|| async { StatusCode::UNAUTHORIZED }));
    let api = api_for(app).await;

    let error = api.me(Some("expired")).await.unwrap_err();

    assert!(matches!(error, ApiError::Unauthorized));
}

#[tokio::test]
async fn my_feed_classifies_401_as_unauthorized() {
    let app = Router::new().route("/api/graph", post(|| async { StatusCode::UNAUTHORIZED }));
    let api = api_for(app).await;

    let error = api.my_feed(None).await.unwrap_err();

    assert!(matches!(error, ApiError::Unauthorized));
}

#[tokio::test]
async fn a_transport_error_passes_through_unmodified() {
    // Nothing listens on port 1.
    let api = Api::new(Url::parse("http://127.0.0.1:1").unwrap()).unwrap();

    let error = api.me(Some("token")).await.unwrap_err();

    match error {
        ApiError::Transport(e) => assert!(e.is_connect() || e.is_request()),
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn me_unwraps_the_profile_payload() {
    let app = Router::new().route(
        "/api/graph",
        post(|| async { Json(json!({ "data": { "me": reader_json() } })) }),
    );
    let api = api_for(app).await;

    let me = api.me(Some("token")).await.unwrap();

    assert_eq!(me.id, "r-1");
    assert_eq!(me.email.as_deref(), Some("alex@example.com"));
}

#[tokio::test]
async fn book_instances_sends_null_optionals_and_unwraps_the_list() {
    let captured: Captured = Arc::default();
    let seen = captured.clone();
    let app = Router::new().route(
        "/api/graph",
        post(move |Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = Some(body);
                Json(json!({
                    "data": { "bookInstances": [instance_json("bi-1"), instance_json("bi-2")] }
                }))
            }
        }),
    );
    let api = api_for(app).await;

    let instances = api
        .book_instances(None, None, Coordinate::new(52.52, 13.4), None)
        .await
        .unwrap();

    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].id, "bi-1");

    let body = captured.lock().unwrap().take().unwrap();
    assert_eq!(body["query"], json!(queries::BOOK_INSTANCES));
    assert_eq!(
        body["variables"],
        json!({ "term": null, "lat": 52.52, "lng": 13.4, "offerings": null })
    );
}

#[tokio::test]
async fn post_book_sends_the_exact_document_and_variables() {
    let captured: Captured = Arc::default();
    let seen = captured.clone();
    let app = Router::new().route(
        "/api/graph",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *seen.lock().unwrap() = Some(json!({ "auth": auth, "body": body }));
                Json(json!({ "data": { "postBook": instance_json("bi-1") } }))
            }
        }),
    );
    let api = api_for(app).await;

    let offerings = vec!["lend".to_string(), "swap".to_string()];
    let posted = api
        .post_book(
            Some("secret"),
            "book-1",
            Coordinate::new(52.52, 13.4),
            &offerings,
            Medium::Physical,
        )
        .await
        .unwrap();
    assert_eq!(posted.id, "bi-1");

    let seen = captured.lock().unwrap().take().unwrap();
    assert_eq!(seen["auth"], json!("Bearer secret"));
    assert_eq!(seen["body"]["query"], json!(queries::POST_BOOK));
    assert_eq!(
        seen["body"]["variables"],
        json!({
            "bookId": "book-1",
            "lat": 52.52,
            "lng": 13.4,
            "offerings": ["lend", "swap"],
            "medium": "physical"
        })
    );
}

#[tokio::test]
async fn my_feed_unwraps_the_nested_feed_path() {
    let app = Router::new().route(
        "/api/graph",
        post(|| async {
            Json(json!({
                "data": { "me": {
                    "id": "r-1",
                    "feed": { "edges": [ { "node": {
                        "id": "i-1",
                        "title": "A Wizard of Earthsea",
                        "ref": "isbn:9780547773742",
                        "type": "book",
                        "insertedAt": "2021-01-01T00:00:00Z",
                        "user": { "id": "r-2", "name": "Kim", "username": "kim" },
                        "creators": { "edges": [ { "node": { "id": "a-1", "name": "Ursula K. Le Guin" } } ] }
                    } } ] }
                } }
            }))
        }),
    );
    let api = api_for(app).await;

    let feed = api.my_feed(Some("token")).await.unwrap();

    assert_eq!(feed.len(), 1);
    let interest = &feed.edges[0].node;
    assert_eq!(interest.id, "i-1");
    assert_eq!(interest.kind.as_deref(), Some("book"));
    assert!(interest.inserted_at.is_some());
}

#[tokio::test]
async fn my_activity_unwraps_all_three_connections() {
    let app = Router::new().route(
        "/api/graph",
        post(|| async {
            Json(json!({
                "data": { "me": {
                    "inquiries": { "edges": [ { "node": { "id": "inq-1", "offering": "lend" } } ] },
                    "requests": { "edges": [] },
                    "interests": { "edges": [ { "node": { "id": "i-1", "title": "T" } } ] }
                } }
            }))
        }),
    );
    let api = api_for(app).await;

    let activity = api.my_activity(Some("token")).await.unwrap();

    assert_eq!(activity.inquiries.len(), 1);
    assert!(activity.requests.is_empty());
    assert_eq!(activity.interests.len(), 1);
}

#[tokio::test]
async fn a_payload_without_data_is_malformed() {
    let app = Router::new().route(
        "/api/graph",
        post(|| async { Json(json!({ "errors": [ { "message": "boom" } ] })) }),
    );
    let api = api_for(app).await;

    let error = api.me(Some("token")).await.unwrap_err();

    assert!(matches!(error, ApiError::Malformed(_)));
}

#[tokio::test]
async fn inquire_posts_the_rest_body() {
    let captured: Captured = Arc::default();
    let seen = captured.clone();
    let app = Router::new().route(
        "/api/inquiries",
        post(move |Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = Some(body);
                Json(json!({ "id": "inq-1", "offering": "lend" }))
            }
        }),
    );
    let api = api_for(app).await;

    let inquiry = api
        .inquire(Some("token"), "bi-9", InquiryKind::Request)
        .await
        .unwrap();
    assert_eq!(inquiry.id, "inq-1");

    let body = captured.lock().unwrap().take().unwrap();
    assert_eq!(
        body,
        json!({ "book_instance_id": "bi-9", "type": "request" })
    );
}

#[tokio::test]
async fn upload_photo_sends_the_multipart_parts() {
    type Parts = Arc<Mutex<Vec<(String, Option<String>, Vec<u8>)>>>;
    let captured: Parts = Arc::default();
    let seen = captured.clone();
    let app = Router::new().route(
        "/api/graph",
        post(move |mut multipart: Multipart| {
            let seen = seen.clone();
            async move {
                let mut parts = Vec::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(|f| f.to_string());
                    let bytes = field.bytes().await.unwrap().to_vec();
                    parts.push((name, file_name, bytes));
                }
                *seen.lock().unwrap() = parts;
                Json(json!({ "data": { "updateProfile": reader_json() } }))
            }
        }),
    );
    let api = api_for(app).await;

    let reader = api
        .upload_photo(Some("token"), "me.jpg", b"JPEGDATA".to_vec())
        .await
        .unwrap();
    assert_eq!(reader.id, "r-1");

    let parts = captured.lock().unwrap().clone();
    assert_eq!(parts.len(), 3);

    let (name, file_name, bytes) = &parts[0];
    assert_eq!(name, "photoFile");
    assert_eq!(file_name.as_deref(), Some("me.jpg"));
    assert_eq!(bytes, b"JPEGDATA");

    let (name, _, bytes) = &parts[1];
    assert_eq!(name, "query");
    assert_eq!(bytes, queries::UPDATE_PROFILE.as_bytes());

    let (name, _, bytes) = &parts[2];
    assert_eq!(name, "variables");
    assert_eq!(bytes, br#"{"photo":"photoFile"}"#);
}
