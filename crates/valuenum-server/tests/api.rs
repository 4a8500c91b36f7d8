use std::sync::Arc;

use axum::{routing::post, Json, Router};
use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use valuenum_core::{Config, Database, Role, TokenSigner};
use valuenum_server::{app, state::AppState};

const SECRET: &str = "integration-secret";

struct TestServer {
    base: String,
    state: Arc<AppState>,
    client: Client,
}

impl TestServer {
    async fn start(mut config: Config) -> Self {
        config.auth.jwt_secret = SECRET.to_string();
        let db = Database::open_memory().expect("open in-memory database");
        let state = AppState::new(config, db);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let router = app(state.clone());
        tokio::spawn(async move { axum::serve(listener, router).await.expect("serve") });

        Self {
            base: format!("http://{addr}/api"),
            state,
            client: Client::new(),
        }
    }

    async fn with_defaults() -> Self {
        Self::start(Config::default()).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn token(&self, sub: &str) -> String {
        TokenSigner::new(SECRET)
            .expect("signer")
            .issue(sub, Role::User, Duration::minutes(10))
            .expect("issue token")
    }
}

fn s_body() -> Value {
    json!({
        "old_time": { "hours": 2, "minutes": 30 },
        "old_effort": 7,
        "training_time": { "hours": 1, "minutes": 0 },
        "new_effort": 4
    })
}

fn w_body() -> Value {
    json!({
        "old_time": { "hours": 2, "minutes": 30 },
        "old_effort": 7,
        "training_time": { "hours": 1, "minutes": 0 },
        "new_effort": 4,
        "old_cost": 1000,
        "new_cost": 300
    })
}

#[tokio::test]
async fn root_greets() {
    let server = TestServer::with_defaults().await;
    let resp = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Hello World");
}

#[tokio::test]
async fn anonymous_s_formula_calculation() {
    let server = TestServer::with_defaults().await;
    let resp = server
        .client
        .post(server.url("/calculate/s-formula"))
        .json(&s_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["value_number"], 0.5);
    assert_eq!(body["calculation_type"], "s_formula");
    assert_eq!(body["recommendation"], "no_go");
    assert!(body["explanation"].as_str().unwrap().contains("No Go"));
    assert!(body["id"].is_string());
    assert!(body["timestamp"].is_string());

    let stored = server.state.db.lock().await.recent_calculations(10).unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].caller_id.is_none());
}

#[tokio::test]
async fn authenticated_w_formula_lands_in_history() {
    let server = TestServer::with_defaults().await;
    let token = server.token("user-7");

    let resp = server
        .client
        .post(server.url("/calculate/w-formula"))
        .bearer_auth(&token)
        .json(&w_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: Value = resp.json().await.unwrap();
    assert_eq!(result["value_number"], 8.224);
    assert_eq!(result["recommendation"], "strong_go");

    let history: Vec<Value> = server
        .client
        .get(server.url("/calculations/history?limit=5"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], result["id"]);
    assert_eq!(history[0]["caller_id"], "user-7");
    assert_eq!(history[0]["inputs"]["old_cost"], 1000.0);

    let other: Vec<Value> = server
        .client
        .get(server.url("/calculations/history"))
        .bearer_auth(server.token("someone-else"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn history_limit_is_clamped() {
    let mut config = Config::default();
    config.history.max_page_size = 2;
    let server = TestServer::start(config).await;
    let token = server.token("user-1");

    for _ in 0..3 {
        let resp = server
            .client
            .post(server.url("/calculate/s-formula"))
            .bearer_auth(&token)
            .json(&s_body())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let history: Vec<Value> = server
        .client
        .get(server.url("/calculations/history?limit=50"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn history_requires_a_token() {
    let server = TestServer::with_defaults().await;
    let resp = server
        .client
        .get(server.url("/calculations/history"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn invalid_token_is_rejected_even_where_optional() {
    let server = TestServer::with_defaults().await;
    let forged = TokenSigner::new("other-secret")
        .unwrap()
        .issue("user-7", Role::Admin, Duration::minutes(10))
        .unwrap();

    let resp = server
        .client
        .post(server.url("/calculate/s-formula"))
        .bearer_auth(forged)
        .json(&s_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(server.state.db.lock().await.recent_calculations(10).unwrap().is_empty());
}

#[tokio::test]
async fn me_echoes_claims() {
    let server = TestServer::with_defaults().await;
    let body: Value = server
        .client
        .get(server.url("/me"))
        .bearer_auth(server.token("user-9"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["sub"], "user-9");
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn out_of_range_minutes_is_bad_request() {
    let server = TestServer::with_defaults().await;
    let mut body = s_body();
    body["old_time"]["minutes"] = json!(75);

    let resp = server
        .client
        .post(server.url("/calculate/s-formula"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: Value = resp.json().await.unwrap();
    assert!(detail["detail"].as_str().unwrap().contains("minutes"));
}

#[tokio::test]
async fn zero_effort_with_zero_training_is_rejected() {
    let server = TestServer::with_defaults().await;
    let mut body = s_body();
    body["training_time"] = json!({ "hours": 0, "minutes": 0 });
    body["new_effort"] = json!(0);

    let resp = server
        .client
        .post(server.url("/calculate/s-formula"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: Value = resp.json().await.unwrap();
    assert!(detail["detail"].as_str().unwrap().contains("new_effort"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = TestServer::with_defaults().await;
    let resp = server
        .client
        .post(server.url("/calculate/w-formula"))
        .header("content-type", "application/json")
        .body("{\"old_time\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_checks_round_trip() {
    let server = TestServer::with_defaults().await;
    for name in ["alpha", "beta"] {
        let resp = server
            .client
            .post(server.url("/status"))
            .json(&json!({ "client_name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let created: Value = resp.json().await.unwrap();
        assert_eq!(created["client_name"], name);
    }

    let listed: Vec<Value> = server
        .client
        .get(server.url("/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = listed
        .iter()
        .map(|c| c["client_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn concepts_access_is_stored_without_a_notifier() {
    let server = TestServer::with_defaults().await;
    let resp = server
        .client
        .post(server.url("/notify/concepts-access"))
        .json(&json!({ "fullname": "Test Two", "email": "test2@example.com", "zip": "77019" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["email_sent"], false);
    assert!(body["error"].is_string());

    let leads = server.state.db.lock().await.list_concept_access(10).unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(body["record_id"], leads[0].id.as_str());
}

#[tokio::test]
async fn concepts_access_posts_to_webhook() {
    let received: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = received.clone();
    let hook = Router::new().route(
        "/hook",
        post(move |Json(payload): Json<Value>| {
            let sink = sink.clone();
            async move {
                sink.lock().await.push(payload);
                "ok"
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let hook_addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, hook).await.expect("serve hook") });

    let mut config = Config::default();
    config.notify.webhook_url = Some(format!("http://{hook_addr}/hook"));
    let server = TestServer::start(config).await;

    let body: Value = server
        .client
        .post(server.url("/notify/concepts-access"))
        .json(&json!({ "fullname": "Ada Lovelace", "email": "ada@example.com", "zip": "77002" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["email_sent"], true);
    assert!(body["error"].is_null());

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["to"], "713Consulting@gmail.com");
    assert_eq!(received[0]["reply_to"], "ada@example.com");
    assert!(received[0]["subject"].as_str().unwrap().contains("Ada Lovelace"));
}

#[tokio::test]
async fn invalid_lead_email_is_rejected() {
    let server = TestServer::with_defaults().await;
    let resp = server
        .client
        .post(server.url("/notify/concepts-access"))
        .json(&json!({ "fullname": "Test", "email": "not-an-email", "zip": "77019" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("email"));
    assert!(server.state.db.lock().await.list_concept_access(10).unwrap().is_empty());
}
