//! HTTP API tests
//!
//! Drive the real router through `axum-test` with mock reasoners.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::mocks::MockReasoner;
use parley::{
    AppState, ParleyConfig, SessionStore,
    api::routes::create_router,
    utils::config::UnknownConversationPolicy,
};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

// ============= Test Helpers =============

struct TestApp {
    server: TestServer,
    sessions: Arc<SessionStore>,
}

fn create_test_app_with(reasoner: MockReasoner, config: ParleyConfig) -> TestApp {
    let state = AppState::new(config, Arc::new(reasoner));
    let sessions = state.sessions.clone();
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    TestApp { server, sessions }
}

fn create_test_app(reasoner: MockReasoner) -> TestApp {
    create_test_app_with(reasoner, ParleyConfig::default())
}

async fn send(server: &TestServer, body: Value) -> Value {
    let response = server.post("/chat").json(&body).await;
    response.assert_status_ok();
    response.json()
}

// ============= Health Check Tests =============

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(MockReasoner::echo());

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "status": "healthy",
        "storage": "operational",
        "reasoner": "operational"
    }));
}

#[tokio::test]
async fn test_root_banner() {
    let app = create_test_app(MockReasoner::echo());

    let response = app.server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "active");
}

// ============= Chat Tests =============

#[tokio::test]
async fn test_chat_creates_conversation() {
    let reasoner = MockReasoner::new("Hello! How can I help?");
    let app = create_test_app(reasoner.clone());

    let body = send(&app.server, json!({"message": "Hi"})).await;

    assert_eq!(body["status"], "success");
    assert_eq!(body["response"], "Hello! How can I help?");
    let id = body["conversation_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[0]["content"], "Hi");
    assert_eq!(history[1]["role"], "assistant");
    assert_eq!(history[1]["content"], "Hello! How can I help?");
    assert!(history[0]["timestamp"].is_string());

    let calls = reasoner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].history.is_empty());
    assert_eq!(calls[0].message, "Hi");
}

#[tokio::test]
async fn test_chat_without_id_always_returns_new_id() {
    let app = create_test_app(MockReasoner::echo());

    let mut seen = HashSet::new();
    for i in 0..5 {
        let body = send(&app.server, json!({"message": format!("msg {}", i)})).await;
        let id = body["conversation_id"].as_str().unwrap().to_string();
        assert!(seen.insert(id), "conversation id was reused");
    }
    assert_eq!(app.sessions.len(), 5);
}

#[tokio::test]
async fn test_chat_with_known_id_grows_history_by_two() {
    let reasoner = MockReasoner::echo();
    let app = create_test_app(reasoner.clone());

    let first = send(&app.server, json!({"message": "one"})).await;
    let id = first["conversation_id"].as_str().unwrap().to_string();

    let mut previous = 2;
    for message in ["two", "three", "four"] {
        let body = send(
            &app.server,
            json!({"conversation_id": id, "message": message}),
        )
        .await;

        assert_eq!(body["conversation_id"], id.as_str());
        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), previous + 2);
        assert_eq!(history[previous]["content"], message);
        assert_eq!(
            history[previous + 1]["content"],
            format!("Echo: {}", message)
        );
        previous = history.len();
    }

    // The reasoner sees the turns stored before the current message.
    let calls = reasoner.calls();
    assert_eq!(calls.last().unwrap().history.len(), 6);
}

#[tokio::test]
async fn test_chat_unknown_id_starts_new_conversation() {
    let mut config = ParleyConfig::default();
    config.chat.unknown_conversation = UnknownConversationPolicy::Create;
    let app = create_test_app_with(MockReasoner::echo(), config);

    let body = send(
        &app.server,
        json!({"conversation_id": "does-not-exist", "message": "Hi"}),
    )
    .await;

    let id = body["conversation_id"].as_str().unwrap();
    assert_ne!(id, "does-not-exist");
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert!(!app.sessions.contains("does-not-exist"));
    assert!(app.sessions.contains(id));
}

#[tokio::test]
async fn test_chat_unknown_id_rejected_by_default() {
    let reasoner = MockReasoner::echo();
    let app = create_test_app(reasoner.clone());

    let response = app
        .server
        .post("/chat")
        .json(&json!({"conversation_id": "does-not-exist", "message": "Hi"}))
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
    assert!(reasoner.calls().is_empty());
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_chat_rejects_missing_message() {
    let app = create_test_app(MockReasoner::echo());

    let response = app
        .server
        .post("/chat")
        .json(&json!({"conversation_id": "abc"}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let app = create_test_app(MockReasoner::echo());

    let response = app.server.post("/chat").json(&json!({"message": "   "})).await;

    response.assert_status_bad_request();
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_chat_rejects_malformed_json() {
    let app = create_test_app(MockReasoner::echo());

    let response = app
        .server
        .post("/chat")
        .text("{\"message\": ")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_chat_upstream_failure() {
    let app = create_test_app(MockReasoner::failing());

    let response = app.server.post("/chat").json(&json!({"message": "Hi"})).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Mock LLM failure"));
    // No half-created conversation is left behind.
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_chat_upstream_failure_keeps_existing_history() {
    let app = create_test_app(MockReasoner::failing());
    let id = app.sessions.create();
    app.sessions
        .append(&id, parley::types::Turn::user("earlier"))
        .await
        .unwrap();

    let response = app
        .server
        .post("/chat")
        .json(&json!({"conversation_id": id, "message": "Hi"}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let turns = app.sessions.get(&id).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].content, "earlier");
}

#[tokio::test]
async fn test_concurrent_chats_on_one_conversation_stay_paired() {
    let app = create_test_app(MockReasoner::echo().with_delay(Duration::from_millis(20)));

    let first = send(&app.server, json!({"message": "start"})).await;
    let id = first["conversation_id"].as_str().unwrap().to_string();

    let (a, b, c, d) = tokio::join!(
        async {
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "a"}))
                .await
        },
        async {
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "b"}))
                .await
        },
        async {
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "c"}))
                .await
        },
        async {
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "d"}))
                .await
        },
    );
    for response in [a, b, c, d] {
        response.assert_status_ok();
    }

    let turns = app.sessions.get(&id).await.unwrap();
    assert_eq!(turns.len(), 10);
    for pair in turns.chunks(2) {
        assert_eq!(pair[1].content, format!("Echo: {}", pair[0].content));
    }
}

#[tokio::test]
async fn test_delete_during_chat_is_ordered_after_it() {
    let app = create_test_app(MockReasoner::echo().with_delay(Duration::from_millis(100)));

    let first = send(&app.server, json!({"message": "start"})).await;
    let id = first["conversation_id"].as_str().unwrap().to_string();
    let started = Instant::now();

    let (chat, (delete, delete_done)) = tokio::join!(
        async {
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "more"}))
                .await
        },
        async {
            sleep(Duration::from_millis(30)).await;
            let response = app.server.delete(&format!("/conversation/{}", id)).await;
            (response, started.elapsed())
        },
    );

    chat.assert_status_ok();
    let body: Value = chat.json();
    assert_eq!(body["history"].as_array().unwrap().len(), 4);
    delete.assert_status_ok();
    // The delete waited for the reasoner call already holding the conversation.
    assert!(
        delete_done >= Duration::from_millis(90),
        "delete finished after {:?}",
        delete_done
    );

    app.server
        .get(&format!("/conversation/{}", id))
        .await
        .assert_status_not_found();
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_chat_queued_behind_delete_is_not_found() {
    let reasoner = MockReasoner::echo().with_delay(Duration::from_millis(100));
    let app = create_test_app(reasoner.clone());

    let first = send(&app.server, json!({"message": "start"})).await;
    let id = first["conversation_id"].as_str().unwrap().to_string();

    // Order of arrival: chat A, then the delete, then chat B, all while A is
    // still waiting on the reasoner.
    let (a, delete, b) = tokio::join!(
        async {
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "a"}))
                .await
        },
        async {
            sleep(Duration::from_millis(20)).await;
            app.server.delete(&format!("/conversation/{}", id)).await
        },
        async {
            sleep(Duration::from_millis(50)).await;
            app.server
                .post("/chat")
                .json(&json!({"conversation_id": id, "message": "b"}))
                .await
        },
    );

    a.assert_status_ok();
    delete.assert_status_ok();
    b.assert_status_not_found();

    let messages: Vec<String> = reasoner.calls().into_iter().map(|c| c.message).collect();
    assert_eq!(messages, vec!["start", "a"]);
    assert!(app.sessions.is_empty());
}

// ============= Conversation Tests =============

#[tokio::test]
async fn test_get_conversation_returns_turns_in_order() {
    let app = create_test_app(MockReasoner::echo());

    let first = send(&app.server, json!({"message": "one"})).await;
    let id = first["conversation_id"].as_str().unwrap().to_string();
    send(&app.server, json!({"conversation_id": id, "message": "two"})).await;

    let response = app.server.get(&format!("/conversation/{}", id)).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["conversation_id"], id.as_str());
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["one", "Echo: one", "two", "Echo: two"]);
}

#[tokio::test]
async fn test_get_unknown_conversation() {
    let app = create_test_app(MockReasoner::echo());

    let response = app.server.get("/conversation/nope").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_unknown_conversation() {
    let app = create_test_app(MockReasoner::echo());

    let response = app.server.delete("/conversation/nope").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_full_conversation_lifecycle() {
    let app = create_test_app(MockReasoner::echo());

    // POST /chat {message: "Hi"}
    let first = send(&app.server, json!({"message": "Hi"})).await;
    let id = first["conversation_id"].as_str().unwrap().to_string();
    let first_history = first["history"].as_array().unwrap().clone();
    assert_eq!(first_history.len(), 2);
    assert_eq!(first_history[0]["role"], "user");
    assert_eq!(first_history[0]["content"], "Hi");
    assert_eq!(first_history[1]["role"], "assistant");

    // POST /chat {conversation_id: C1, message: "More"}
    let second = send(&app.server, json!({"conversation_id": id, "message": "More"})).await;
    let second_history = second["history"].as_array().unwrap();
    assert_eq!(second_history.len(), 4);
    assert_eq!(&second_history[..2], &first_history[..]);

    // DELETE /conversation/C1
    let response = app.server.delete(&format!("/conversation/{}", id)).await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "status": "success",
        "message": "Conversation deleted successfully"
    }));

    // GET /conversation/C1
    let response = app.server.get(&format!("/conversation/{}", id)).await;
    response.assert_status_not_found();
}
