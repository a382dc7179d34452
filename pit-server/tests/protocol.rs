//! End-to-end tests of the invocation protocol.
//!
//! Drives the full axum app in-process with `oneshot` requests and checks
//! status codes, JSON bodies and the calls observed by the agent.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pit_agent::{Agent, AgentError, GameState, GameType, MoveResponse};
use pit_agent::bots::{engine_bot, simple_bot};
use pit_agent::io::engine::EngineSettings;
use pit_agent::test_support::{Call, RecordingAgent};
use pit_server::{AppState, app};
use serde_json::{Value, json};
use tokio::task::JoinSet;
use tower::ServiceExt;

fn server(agent: impl Agent + 'static) -> Router {
    app(AppState::new(Box::new(agent)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).expect("serialize body")),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("build request");
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

#[tokio::test]
async fn health_is_always_ok() {
    let app = server(RecordingAgent::new());
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn info_reports_agent_identity() {
    let app = server(simple_bot(Some(1)));
    let (status, body) = send(&app, "GET", "/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "Simple Bot",
            "description": "A basic chess bot for testing",
            "gameType": "chess"
        })
    );
}

#[tokio::test]
async fn heuristic_bot_takes_the_capture() {
    let app = server(simple_bot(Some(5)));
    let game_state = json!({
        "validMoves": [
            {"from": "e2", "to": "e4", "san": "e4"},
            {"from": "d2", "to": "d4", "san": "dxe5"}
        ]
    });
    for _ in 0..10 {
        let (status, body) =
            send(&app, "POST", "/move", Some(json!({"gameState": game_state}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], json!({"from": "d2", "to": "d4"}));
        if let Some(talk) = body.get("trashTalk") {
            assert!(!talk.as_str().expect("string").is_empty());
        }
    }
}

#[tokio::test]
async fn empty_moves_fail_without_taking_the_server_down() {
    let app = server(simple_bot(Some(2)));
    let (status, body) = send(
        &app,
        "POST",
        "/move",
        Some(json!({"gameState": {"validMoves": []}})),
    )
    .await;
    assert!(!status.is_success());
    let error = body["error"].as_str().expect("error string");
    assert!(!error.is_empty());
    assert!(body.get("action").is_none());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn malformed_bodies_are_reported_as_errors() {
    let app = server(RecordingAgent::new());

    let request = Request::builder()
        .method("POST")
        .uri("/move")
        .body(Body::from("{not json"))
        .expect("build request");
    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("error").contains("not valid JSON"));

    let (status, body) = send(&app, "POST", "/game-end", Some(json!({"gameState": {}}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("error").contains("missing `result`"));

    let (status, _) = send(&app, "POST", "/game-start", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_routes_and_methods_are_not_found() {
    let app = server(RecordingAgent::new());
    for (method, uri) in [
        ("GET", "/unknown"),
        ("POST", "/health"),
        ("GET", "/move"),
        ("DELETE", "/game-end"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, json!({"error": "Not found"}));
    }
}

#[tokio::test]
async fn lifecycle_hooks_reach_the_agent_in_order() {
    let agent = RecordingAgent::new();
    let calls = agent.calls();
    let app = server(agent);
    let game_state = json!({"yourColor": "white", "validMoves": [{"from": "e2", "to": "e4"}]});

    let start = json!({"gameState": game_state});
    let (status, body) = send(&app, "POST", "/game-start", Some(start)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    for _ in 0..3 {
        let request = json!({"gameState": game_state});
        let (status, _) = send(&app, "POST", "/move", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let end = json!({"result": {"winner": "white"}});
    let (status, body) = send(&app, "POST", "/game-end", Some(end)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let recorded = calls.lock().expect("calls").clone();
    assert_eq!(
        recorded,
        vec![Call::GameStart, Call::Move, Call::Move, Call::Move, Call::GameEnd]
    );
}

#[tokio::test]
async fn moves_out_of_sequence_are_still_dispatched() {
    let agent = RecordingAgent::new();
    let calls = agent.calls();
    let app = server(agent);

    let (status, _) = send(&app, "POST", "/move", Some(json!({"gameState": {}}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/game-end", Some(json!({"result": {}}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/move", Some(json!({"gameState": {}}))).await;
    assert_eq!(status, StatusCode::OK);

    let recorded = calls.lock().expect("calls").clone();
    assert_eq!(recorded, vec![Call::Move, Call::GameEnd, Call::Move]);
}

#[tokio::test]
async fn oversized_bodies_get_a_json_error() {
    let app = server(RecordingAgent::new());
    let padding = "x".repeat(3 * 1024 * 1024);
    let (status, body) = send(
        &app,
        "POST",
        "/move",
        Some(json!({"gameState": {"padding": padding}})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("error").starts_with("malformed request"));
}

/// Agent that counts `make_move` calls which started while another was running.
struct ExclusiveAgent {
    busy: Arc<AtomicBool>,
    overlaps: Arc<AtomicUsize>,
}

impl Agent for ExclusiveAgent {
    fn name(&self) -> &str {
        "Exclusive"
    }

    fn description(&self) -> &str {
        "Detects overlapping calls"
    }

    fn game_type(&self) -> GameType {
        GameType::Chess
    }

    fn make_move(&mut self, _state: &GameState) -> Result<MoveResponse, AgentError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        thread::sleep(Duration::from_millis(20));
        self.busy.store(false, Ordering::SeqCst);
        Ok(MoveResponse::new(json!({"from": "e2", "to": "e4"})))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_overlap_inside_the_agent() {
    let overlaps = Arc::new(AtomicUsize::new(0));
    let app = server(ExclusiveAgent {
        busy: Arc::new(AtomicBool::new(false)),
        overlaps: Arc::clone(&overlaps),
    });

    let mut requests = JoinSet::new();
    for _ in 0..8 {
        let app = app.clone();
        requests.spawn(async move {
            let request = json!({"gameState": {"validMoves": [{"from": "e2", "to": "e4"}]}});
            send(&app, "POST", "/move", Some(request)).await
        });
    }
    while let Some(joined) = requests.join_next().await {
        let (status, _) = joined.expect("request task");
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn hung_engine_still_yields_an_action() {
    let settings = EngineSettings {
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            "sleep 5; echo 'bestmove e2e4'".to_string(),
        ],
        timeout_ms: 200,
        ..EngineSettings::default()
    };
    let app = server(engine_bot(settings, Some(4)));
    let game_state = json!({
        "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "validMoves": [
            {"from": "e2", "to": "e4", "san": "e4"},
            {"from": "g1", "to": "f3", "san": "Nf3"}
        ]
    });

    let started = Instant::now();
    let request = json!({"gameState": game_state});
    let (status, body) = send(&app, "POST", "/move", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(3));
    let from = body["action"]["from"].as_str().expect("action.from");
    assert!(from == "e2" || from == "g1");

    // The agent lock was released, so the next call is served too.
    let (status, _) = send(&app, "POST", "/game-end", Some(json!({"result": {}}))).await;
    assert_eq!(status, StatusCode::OK);
}
