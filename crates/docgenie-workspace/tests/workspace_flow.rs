//! End-to-end controller flows against a mock DocGenie server.

use std::time::Duration;

use docgenie_core::api::{ApiClient, ChatMessage, Role};
use docgenie_core::config::Config;
use docgenie_core::upload::SelectedFile;
use docgenie_workspace::events::UiEvent;
use docgenie_workspace::{NotifyLevel, ViewState, WorkspaceRuntime};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runtime(server: &MockServer) -> WorkspaceRuntime {
    let mut config = Config::default();
    config.server.base_url = server.uri();
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    WorkspaceRuntime::with_client(&config, api)
}

async fn settle(runtime: &mut WorkspaceRuntime) {
    tokio::time::timeout(Duration::from_secs(10), runtime.run_until_idle())
        .await
        .expect("runtime did not settle");
}

async fn mount_session(server: &MockServer, id: &str, filename: &str, markdown: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/sessions/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session": {
                "id": id,
                "filename": filename,
                "markdown_content": markdown,
                "file_path": null
            },
            "messages": []
        })))
        .mount(server)
        .await;
}

async fn mount_list(server: &MockServer, sessions: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessions": sessions })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn drop_upload_process_and_load() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"status": "success", "session_id": "s1", "filename": "report.pdf"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([{"id": "s1", "filename": "report.pdf"}])).await;
    mount_session(&server, "s1", "report.pdf", "# Title\nBody").await;

    let mut runtime = runtime(&server);
    runtime.dispatch(UiEvent::DropFiles {
        files: vec![SelectedFile::new("report.pdf", vec![7_u8; 300_000])],
    });
    assert_eq!(runtime.state.view.view_state, ViewState::Uploading);

    let mut percents = Vec::new();
    let mut saw_processing = false;
    tokio::time::timeout(
        Duration::from_secs(10),
        runtime.run_until_idle_with(|state| {
            if let Some(p) = state.upload.progress() {
                percents.push(p);
            }
            saw_processing |= state.view.view_state == ViewState::Processing;
        }),
    )
    .await
    .unwrap();

    assert_eq!(percents.first(), Some(&0));
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert!(saw_processing);

    assert_eq!(runtime.state.view.view_state, ViewState::Loaded);
    assert_eq!(runtime.state.view.current_session_id(), Some("s1"));
    assert!(runtime.state.sessions.contains("s1"));

    let view = runtime.view();
    let document = view.document.unwrap();
    assert_eq!(document.structure.len(), 1);
    assert_eq!(document.structure[0].text, "Title");
    assert!(view.progress.is_none());
}

#[tokio::test]
async fn last_file_failure_fails_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"status": "success", "session_id": "s1", "filename": "a.pdf"},
                {"status": "error", "error": "Unsupported layout", "filename": "b.pdf"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sessions/s1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut runtime = runtime(&server);
    runtime.dispatch(UiEvent::DropFiles {
        files: vec![
            SelectedFile::new("a.pdf", "a"),
            SelectedFile::new("b.pdf", "b"),
        ],
    });
    settle(&mut runtime).await;

    assert_eq!(runtime.state.view.view_state, ViewState::Error);
    assert!(runtime.state.view.current_session.is_none());
    assert!(runtime.view().drop_zone_visible);
    let notes = runtime.state.take_notifications();
    assert!(
        notes
            .iter()
            .any(|n| n.level == NotifyLevel::Error && n.message.contains("Unsupported layout"))
    );
}

#[tokio::test]
async fn cancelled_upload_restores_previous_view() {
    let server = MockServer::start().await;
    mount_session(&server, "s0", "old.pdf", "# Old").await;
    Mock::given(method("POST"))
        .and(path("/convert/batch"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let mut runtime = runtime(&server);
    runtime.dispatch(UiEvent::PickSession {
        session_id: "s0".to_string(),
    });
    settle(&mut runtime).await;
    assert_eq!(runtime.state.view.view_state, ViewState::Loaded);

    runtime.dispatch(UiEvent::DropFiles {
        files: vec![SelectedFile::new("new.docx", "PK")],
    });
    assert!(runtime.state.view.current_session.is_none());
    runtime.dispatch(UiEvent::CancelUpload);
    settle(&mut runtime).await;

    assert_eq!(runtime.state.view.view_state, ViewState::Loaded);
    assert_eq!(runtime.state.view.current_session_id(), Some("s0"));
    assert!(!runtime.state.upload_in_flight());
    assert!(
        runtime
            .state
            .take_notifications()
            .iter()
            .any(|n| n.message == "Upload cancelled")
    );
}

#[tokio::test]
async fn chat_round_trip_appends_reply_after_user_message() {
    let server = MockServer::start().await;
    mount_session(&server, "s1", "report.pdf", "# Title\nBody").await;
    Mock::given(method("POST"))
        .and(path("/sessions/s1/chat"))
        .and(body_json(json!({"query": "What is this about?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "It is about X."})))
        .expect(1)
        .mount(&server)
        .await;

    let mut runtime = runtime(&server);
    runtime.dispatch(UiEvent::PickSession {
        session_id: "s1".to_string(),
    });
    settle(&mut runtime).await;

    runtime.dispatch(UiEvent::SendChat {
        text: "What is this about?".to_string(),
    });
    assert_eq!(
        runtime.state.chat.transcript().last(),
        Some(&ChatMessage::user("What is this about?"))
    );
    assert!(runtime.view().chat_pending);

    settle(&mut runtime).await;
    let roles: Vec<Role> = runtime
        .state
        .chat
        .transcript()
        .iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Ai]);
    assert_eq!(
        runtime.state.chat.transcript()[2],
        ChatMessage::ai("It is about X.")
    );
    assert!(!runtime.view().chat_pending);
}

#[tokio::test]
async fn deleting_the_open_session_resets_and_refreshes() {
    let server = MockServer::start().await;
    mount_session(&server, "s1", "report.pdf", "# Title").await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([])).await;

    let mut runtime = runtime(&server);
    runtime.dispatch(UiEvent::PickSession {
        session_id: "s1".to_string(),
    });
    settle(&mut runtime).await;

    runtime.dispatch(UiEvent::DeleteSession {
        session_id: "s1".to_string(),
    });
    settle(&mut runtime).await;

    assert_eq!(runtime.state.view.view_state, ViewState::Idle);
    assert!(runtime.state.view.current_session.is_none());
    assert!(runtime.state.sessions.list().is_empty());
}

#[tokio::test]
async fn start_fills_sidebar_and_filter_narrows_it() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        json!([
            {"id": "s2", "filename": "Budget.xlsx.pdf", "created_at": "2025-02-01T10:00:00"},
            {"id": "s1", "filename": "notes.docx", "created_at": "2025-01-01T10:00:00"}
        ]),
    )
    .await;

    let mut runtime = runtime(&server);
    runtime.start();
    settle(&mut runtime).await;
    assert_eq!(runtime.view().sidebar.len(), 2);

    runtime.dispatch(UiEvent::FilterSessions {
        query: "budget".to_string(),
    });
    let sidebar = runtime.view().sidebar;
    assert_eq!(sidebar.len(), 1);
    assert_eq!(sidebar[0].id, "s2");
    assert_eq!(sidebar[0].label_html, "<mark>Budget</mark>.xlsx.pdf");
}

#[tokio::test]
async fn missing_session_is_reported_without_losing_view() {
    let server = MockServer::start().await;
    mount_session(&server, "s1", "report.pdf", "# Title").await;
    Mock::given(method("GET"))
        .and(path("/sessions/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Session not found"})))
        .mount(&server)
        .await;

    let mut runtime = runtime(&server);
    runtime.dispatch(UiEvent::PickSession {
        session_id: "s1".to_string(),
    });
    settle(&mut runtime).await;
    runtime.dispatch(UiEvent::PickSession {
        session_id: "gone".to_string(),
    });
    settle(&mut runtime).await;

    assert_eq!(runtime.state.view.view_state, ViewState::Error);
    assert_eq!(runtime.state.view.current_session_id(), Some("s1"));
    assert!(
        runtime
            .state
            .take_notifications()
            .iter()
            .any(|n| n.message.contains("Session not found: gone"))
    );
}
