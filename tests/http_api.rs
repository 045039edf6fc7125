//! HTTP tests for the subscriber routes.
//!
//! The router is driven with `oneshot` against an in-memory store, so these
//! run without a database. Coverage: every route, the success envelopes, and
//! each error status (400, 404, 405, 408, 409, 503).

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;
use subscribers_api::{
    app, AppError, AppState, NewSubscriber, Subscriber, SubscriberChanges, SubscriberStore,
};
use tower::ServiceExt;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory store with auto-increment indices.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<Subscriber>>,
    next_index: Mutex<u16>,
    unavailable: bool,
    /// Added latency on `list`.
    delay: Option<Duration>,
}

impl MemoryStore {
    fn seeded() -> Self {
        let store = MemoryStore::default();
        for (email, first, last) in [
            ("marcanthonyconcepcion@gmail.com", "Marc Anthony", "Concepcion"),
            ("marcanthonyconcepcion@email.com", "Marc", "Concepcion"),
            ("kevin.andrews@email.com", "Kevin", "Andrews"),
        ] {
            store.insert(&NewSubscriber {
                email_address: email.into(),
                first_name: first.into(),
                last_name: last.into(),
            });
        }
        store
    }

    fn unavailable() -> Self {
        MemoryStore {
            unavailable: true,
            ..Default::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        MemoryStore {
            delay: Some(delay),
            ..MemoryStore::seeded()
        }
    }

    fn insert(&self, candidate: &NewSubscriber) -> Subscriber {
        let mut next = self.next_index.lock().unwrap();
        *next += 1;
        let row = Subscriber {
            index: *next,
            email_address: candidate.email_address.clone(),
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            activation_flag: false,
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable {
            return Err(AppError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    async fn create(&self, candidate: &NewSubscriber) -> Result<Subscriber, AppError> {
        self.check()?;
        let duplicate = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| !candidate.email_address.is_empty() && r.email_address == candidate.email_address);
        if duplicate {
            return Err(AppError::Constraint("duplicate email_address".into()));
        }
        Ok(self.insert(candidate))
    }

    async fn retrieve(&self, index: u16) -> Result<Subscriber, AppError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.index == index)
            .cloned()
            .ok_or(AppError::NotFound(index))
    }

    async fn update(&self, index: u16, changes: &SubscriberChanges) -> Result<Subscriber, AppError> {
        self.check()?;
        if changes.is_empty() {
            return Err(AppError::MalformedInput("No recognized fields to update.".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.index == index)
            .ok_or(AppError::NotFound(index))?;
        changes.apply_to(row);
        Ok(row.clone())
    }

    async fn activate(&self, index: u16, flag: bool) -> Result<u64, AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.index == index) {
            Some(row) => {
                row.activation_flag = flag;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, index: u16) -> Result<u64, AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.index != index);
        Ok((before - rows.len()) as u64)
    }

    async fn list(&self) -> Result<Vec<Subscriber>, AppError> {
        self.check()?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(|r| r.index);
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

fn test_app(store: MemoryStore) -> Router {
    app(AppState::new(store), "subscribers", Duration::from_secs(5))
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn seeded_json() -> Value {
    json!([
        {
            "index": 1,
            "email_address": "marcanthonyconcepcion@gmail.com",
            "first_name": "Marc Anthony",
            "last_name": "Concepcion"
        },
        {
            "index": 2,
            "email_address": "marcanthonyconcepcion@email.com",
            "first_name": "Marc",
            "last_name": "Concepcion"
        },
        {
            "index": 3,
            "email_address": "kevin.andrews@email.com",
            "first_name": "Kevin",
            "last_name": "Andrews"
        }
    ])
}

// =============================================================================
// List / Retrieve
// =============================================================================

#[tokio::test]
async fn list_returns_all_records_in_index_order() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "GET", "/subscribers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, seeded_json());
}

#[tokio::test]
async fn list_of_empty_table_is_empty_array() {
    let app = test_app(MemoryStore::default());
    let (status, body) = send(&app, "GET", "/subscribers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn retrieve_returns_single_record() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "GET", "/subscribers/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, seeded_json()[1]);
}

#[tokio::test]
async fn retrieve_missing_index_is_404() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "GET", "/subscribers/40").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Subscriber #40 does not exist." }));
}

#[tokio::test]
async fn malformed_index_is_400_on_every_route() {
    let app = test_app(MemoryStore::seeded());
    for (method, uri) in [
        ("GET", "/subscribers/abc"),
        ("PUT", "/subscribers/-1?first_name=X"),
        ("PATCH", "/subscribers/70000?activation_flag=true"),
        ("DELETE", "/subscribers/1.5"),
    ] {
        let (status, body) = send(&app, method, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert!(body["error"].is_string());
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_echoes_stored_record() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(
        &app,
        "POST",
        "/subscribers?email_address=riseofskywalker%40starwars.com&first_name=Rey&last_name=Palpatine",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "message": "Record created",
            "updates": {
                "index": 4,
                "email_address": "riseofskywalker@starwars.com",
                "first_name": "Rey",
                "last_name": "Palpatine"
            }
        })
    );

    let (_, list) = send(&app, "GET", "/subscribers").await;
    assert_eq!(list.as_array().unwrap().len(), 4);
    assert_eq!(list[3], body["updates"]);
}

#[tokio::test]
async fn create_without_parameters_is_405() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "POST", "/subscribers").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body["error"],
        "HTTP command POST without providing parameters is not allowed. Please provide an acceptable HTTP command."
    );
}

#[tokio::test]
async fn create_constraint_violation_is_409() {
    let app = test_app(MemoryStore::seeded());
    let (status, _) = send(&app, "POST", "/subscribers?email_address=kevin.andrews%40email.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_changes_only_given_fields() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "PUT", "/subscribers/2?email_address=z%40x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record updated");
    assert_eq!(body["updates"]["email_address"], "z@x.com");
    assert_eq!(body["updates"]["first_name"], "Marc");

    let mut expected = seeded_json();
    expected[1]["email_address"] = json!("z@x.com");
    let (_, list) = send(&app, "GET", "/subscribers").await;
    assert_eq!(list, expected);
}

#[tokio::test]
async fn update_treats_empty_values_as_unset() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "PUT", "/subscribers/3?first_name=Kev&last_name=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updates"]["first_name"], "Kev");
    assert_eq!(body["updates"]["last_name"], "Andrews");
}

#[tokio::test]
async fn update_without_parameters_is_405() {
    let app = test_app(MemoryStore::seeded());
    let (status, _) = send(&app, "PUT", "/subscribers/1").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn update_with_no_recognized_field_is_400() {
    let app = test_app(MemoryStore::seeded());
    let (status, _) = send(&app, "PUT", "/subscribers/1?nickname=marc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_index_is_404() {
    let app = test_app(MemoryStore::seeded());
    let (status, _) = send(&app, "PUT", "/subscribers/9?first_name=X").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Activate
// =============================================================================

#[tokio::test]
async fn activate_then_deactivate() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "PATCH", "/subscribers/1?activation_flag=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "details": "Record #1 activated." }));

    let (_, row) = send(&app, "GET", "/subscribers/1").await;
    assert_eq!(row["activation_flag"], true);
    assert_eq!(row["first_name"], "Marc Anthony");

    let (status, body) = send(&app, "PATCH", "/subscribers/1?activation_flag=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"], "Record #1 deactivated.");
    let (_, row) = send(&app, "GET", "/subscribers/1").await;
    assert!(row.get("activation_flag").is_none());
}

#[tokio::test]
async fn activate_rejects_other_literals() {
    let app = test_app(MemoryStore::seeded());
    for uri in [
        "/subscribers/1?activation_flag=yes",
        "/subscribers/1?activation_flag=1",
        "/subscribers/1",
    ] {
        let (status, _) = send(&app, "PATCH", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn activate_missing_index_is_404() {
    let app = test_app(MemoryStore::seeded());
    let (status, _) = send(&app, "PATCH", "/subscribers/12?activation_flag=true").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_removes_record() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "DELETE", "/subscribers/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "success", "details": "Deleted record of subscriber #2" })
    );

    let (status, _) = send(&app, "GET", "/subscribers/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let expected = json!([seeded_json()[0], seeded_json()[2]]);
    let (_, list) = send(&app, "GET", "/subscribers").await;
    assert_eq!(list, expected);
}

#[tokio::test]
async fn delete_missing_index_is_not_an_error() {
    let app = test_app(MemoryStore::seeded());
    let (status, _) = send(&app, "DELETE", "/subscribers/99").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Storage failures and common routes
// =============================================================================

#[tokio::test]
async fn storage_unavailable_is_503() {
    let app = test_app(MemoryStore::unavailable());
    let (status, body) = send(&app, "GET", "/subscribers").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().starts_with("database unavailable"));

    let (status, body) = send(&app, "GET", "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "degraded", "store": "unreachable" }));
}

#[tokio::test]
async fn health_and_ready() {
    let app = test_app(MemoryStore::default());
    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(&app, "GET", "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "store": "reachable" }));
}

#[tokio::test]
async fn resource_segment_is_configurable() {
    let app = app(AppState::new(MemoryStore::seeded()), "members", Duration::from_secs(5));
    let (status, _) = send(&app, "GET", "/members/1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/subscribers/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Router fallbacks and deadline
// =============================================================================

#[tokio::test]
async fn slow_store_hits_request_deadline() {
    let app = app(
        AppState::new(MemoryStore::slow(Duration::from_millis(500))),
        "subscribers",
        Duration::from_millis(20),
    );
    let (status, body) = send(&app, "GET", "/subscribers").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("deadline"));

    // Routes that do not touch the slow path still answer.
    let (status, _) = send(&app, "GET", "/subscribers/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unsupported_method_has_error_body() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "POST", "/subscribers/1?email_address=a@b.c").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "HTTP method not allowed on this resource." }));

    let (status, body) = send(&app, "DELETE", "/subscribers").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "HTTP method not allowed on this resource.");
}

#[tokio::test]
async fn unknown_route_has_error_body() {
    let app = test_app(MemoryStore::seeded());
    let (status, body) = send(&app, "GET", "/nowhere/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "no route for /nowhere/1" }));
}
