use crate::helpers::{Backends, controller_with_turn};

use chatroom_core::session::{Acknowledgment, Disclosure, Notice, SendOutcome};
use chatroom_core::error::SessionError;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Load session
// ============================================================================

/// **VALUE**: The scenario from the model picker: both options present, current selected.
#[tokio::test]
async fn given_two_models_when_loading_session_then_current_model_selected() {
    // GIVEN: Backend reports llama3 and qwen2 with llama3 current
    let backends = Backends::start().await;
    backends.mount_models(&["llama3", "qwen2"], "llama3").await;
    backends
        .mount_tools(json!([{ "name": "search", "description": "Web search" }]))
        .await;

    // WHEN: Loading the session
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    // THEN: Both models listed, llama3 selected, tools loaded, no notice
    let state = controller.snapshot().await;
    assert_eq!(state.models().models(), ["llama3", "qwen2"]);
    assert_eq!(state.models().selected(), Some("llama3"));
    assert_eq!(state.tools().len(), 1);
    assert_eq!(state.tools()[0].name, "search");
    assert_eq!(state.notice(), None);
}

/// **VALUE**: One failing list does not block the other.
///
/// **BUG THIS CATCHES**: Would catch `try_join!`-style loading where the first
/// error discards the other list.
#[tokio::test]
async fn given_tools_endpoint_failing_when_loading_session_then_models_still_loaded() {
    // GIVEN: Models succeed, tools fail
    let backends = Backends::start().await;
    backends.mount_models(&["llama3"], "llama3").await;
    Mock::given(method("GET"))
        .and(path("/api/tools"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.chat)
        .await;

    // WHEN: Loading the session
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    // THEN: Models loaded, tools empty, tool notice raised
    let state = controller.snapshot().await;
    assert_eq!(state.models().selected(), Some("llama3"));
    assert!(state.tools().is_empty());
    assert_eq!(state.notice(), Some(Notice::ToolListUnavailable));
}

#[tokio::test]
async fn given_models_endpoint_failing_when_loading_session_then_tools_still_loaded() {
    let backends = Backends::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backends.chat)
        .await;
    backends.mount_tools(json!([{ "name": "search" }])).await;

    let controller = backends.controller();
    controller.load_session().await.unwrap();

    let state = controller.snapshot().await;
    assert!(state.models().is_empty());
    assert_eq!(state.models().selected(), None);
    assert_eq!(state.tools().len(), 1);
    assert_eq!(state.notice(), Some(Notice::ModelListUnavailable));
}

// ============================================================================
// Send message
// ============================================================================

/// **VALUE**: The send scenario: one turn with reply and one collapsed tool result.
#[tokio::test]
async fn given_reply_with_tool_result_when_sending_hello_then_one_turn_with_collapsed_result() {
    // GIVEN: A chat endpoint expecting "hello" exactly once
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "hi there",
            "toolResults": [{ "toolName": "search", "result": "3 hits" }]
        })))
        .expect(1)
        .mount(&backends.chat)
        .await;

    // WHEN: Sending "hello"
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();
    let outcome = controller.send_message().await.unwrap();

    // THEN: One turn, reply text, one collapsed "search" result, draft cleared
    assert_eq!(outcome, SendOutcome::Sent);
    let state = controller.snapshot().await;
    assert_eq!(state.transcript().len(), 1);

    let turn = &state.transcript().turns()[0];
    assert_eq!(turn.user, "hello");
    assert_eq!(turn.assistant, "hi there");
    assert_eq!(turn.tool_results.len(), 1);
    assert_eq!(turn.tool_results[0].tool_name, "search");
    assert_eq!(turn.tool_results[0].result, "3 hits");
    assert_eq!(turn.tool_results[0].disclosure, Disclosure::Collapsed);

    assert_eq!(state.draft(), "");
    assert!(!state.is_loading());
}

/// **VALUE**: Blank drafts never reach the backend.
#[tokio::test]
async fn given_blank_draft_when_sending_then_no_request_and_transcript_unchanged() {
    // GIVEN: A chat endpoint that must not be called
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "?" })))
        .expect(0)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();

    for draft in ["", "   ", "\n"] {
        // WHEN: Sending a blank draft
        controller.set_draft(draft).await.unwrap();
        let outcome = controller.send_message().await.unwrap();

        // THEN: Nothing sent, nothing appended
        assert_eq!(outcome, SendOutcome::EmptyDraft);
        assert!(controller.snapshot().await.transcript().is_empty());
    }
}

/// **VALUE**: A failed send keeps the draft so the user can retry.
///
/// **BUG THIS CATCHES**: Would catch clearing the draft in a `finally`-style
/// path, losing what the user typed.
#[tokio::test]
async fn given_failing_chat_when_sending_then_draft_kept_and_notice_raised() {
    // GIVEN: A failing chat endpoint
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .expect(1)
        .mount(&backends.chat)
        .await;

    // WHEN: Sending
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();
    let outcome = controller.send_message().await.unwrap();

    // THEN: Failed, draft kept, transcript empty, notice raised, not loading
    assert_eq!(outcome, SendOutcome::Failed);
    let state = controller.snapshot().await;
    assert_eq!(state.draft(), "hello");
    assert!(state.transcript().is_empty());
    assert_eq!(state.notice(), Some(Notice::ReplyUnavailable));
    assert!(!state.is_loading());
}

/// **VALUE**: Only one send may be in flight.
///
/// **WHY THIS MATTERS**: Two concurrent sends would append turns in reply order
/// instead of send order.
#[tokio::test]
async fn given_send_in_flight_when_sending_again_then_busy_and_single_request() {
    // GIVEN: A slow chat endpoint that must be called exactly once
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "reply": "slow" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.set_draft("first").await.unwrap();

    let background = controller.clone();
    let first = tokio::spawn(async move { background.send_message().await });

    // Wait until the first send holds the slot
    while !controller.snapshot().await.is_loading() {
        tokio::task::yield_now().await;
    }

    // WHEN: Sending again while the first is in flight
    let second = controller.send_message().await.unwrap();

    // THEN: Second is rejected, first completes, one turn total
    assert_eq!(second, SendOutcome::Busy);
    assert_eq!(first.await.unwrap().unwrap(), SendOutcome::Sent);
    assert_eq!(controller.snapshot().await.transcript().len(), 1);
}

#[tokio::test]
async fn given_several_sends_when_completed_then_transcript_in_send_order() {
    let backends = Backends::start().await;
    backends.mount_chat_reply(json!({ "reply": "ok" })).await;
    let controller = backends.controller();

    for text in ["one", "two", "three"] {
        controller.set_draft(text).await.unwrap();
        assert_eq!(controller.send_message().await.unwrap(), SendOutcome::Sent);
    }

    let state = controller.snapshot().await;
    let users: Vec<_> = state
        .transcript()
        .turns()
        .iter()
        .map(|t| t.user.as_str())
        .collect();
    assert_eq!(users, ["one", "two", "three"]);
}

// ============================================================================
// New chat
// ============================================================================

#[tokio::test]
async fn given_transcript_when_new_chat_succeeds_then_transcript_empty() {
    // GIVEN: One turn in the transcript and a working reset endpoint
    let backends = Backends::start().await;
    let controller = controller_with_turn(&backends, "hello", json!({ "reply": "hi" })).await;
    Mock::given(method("POST"))
        .and(path("/api/chat/new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backends.chat)
        .await;
    assert_eq!(controller.snapshot().await.transcript().len(), 1);

    // WHEN: Starting a new chat
    controller.new_chat().await.unwrap();

    // THEN: Transcript empty
    assert!(controller.snapshot().await.transcript().is_empty());
}

/// **VALUE**: A failed reset leaves the transcript as it was and reports the error.
///
/// **BUG THIS CATCHES**: Would catch clearing locally before the backend
/// confirmed, which makes the client show a fresh chat the server never started.
#[tokio::test]
async fn given_transcript_when_new_chat_fails_then_error_and_transcript_unchanged() {
    // GIVEN: One turn and a failing reset endpoint
    let backends = Backends::start().await;
    let controller = controller_with_turn(&backends, "hello", json!({ "reply": "hi" })).await;
    Mock::given(method("POST"))
        .and(path("/api/chat/new"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.chat)
        .await;

    // WHEN: Starting a new chat
    let result = controller.new_chat().await;

    // THEN: Error returned, transcript kept, reset slot released
    assert!(matches!(result, Err(SessionError::Api(_))));
    let state = controller.snapshot().await;
    assert_eq!(state.transcript().len(), 1);
    assert_eq!(state.transcript().turns()[0].user, "hello");
}

/// **VALUE**: A reply pending when the user asks for a new chat never lands in
/// the new conversation.
///
/// **BUG THIS CATCHES**: Would catch admitting the reset under an in-flight
/// send: the transcript is cleared, then the old reply is appended to it.
#[tokio::test]
async fn given_send_in_flight_when_new_chat_then_refused_and_reply_kept() {
    // GIVEN: A slow chat endpoint and a reset endpoint that must not be called
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "reply": "hi there" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&backends.chat)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();

    let background = controller.clone();
    let send = tokio::spawn(async move { background.send_message().await });
    while !controller.snapshot().await.is_loading() {
        tokio::task::yield_now().await;
    }

    // WHEN: Starting a new chat while the reply is pending
    let reset = controller.new_chat().await;

    // THEN: Reset refused, the reply arrives into the same conversation
    assert!(matches!(
        reset,
        Err(SessionError::Busy {
            kind: chatroom_core::session::RequestKind::Send,
            ..
        })
    ));
    assert_eq!(send.await.unwrap().unwrap(), SendOutcome::Sent);

    let state = controller.snapshot().await;
    assert_eq!(state.transcript().len(), 1);
    assert_eq!(state.transcript().turns()[0].assistant, "hi there");
    assert!(!state.is_busy(chatroom_core::session::RequestKind::Reset));
}

#[tokio::test]
async fn given_reset_in_flight_when_sending_then_busy_and_draft_kept() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/new"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&backends.chat)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "?" })))
        .expect(0)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();

    let background = controller.clone();
    let reset = tokio::spawn(async move { background.new_chat().await });
    while !controller
        .snapshot()
        .await
        .is_busy(chatroom_core::session::RequestKind::Reset)
    {
        tokio::task::yield_now().await;
    }

    controller.set_draft("hello").await.unwrap();
    let outcome = controller.send_message().await.unwrap();

    assert_eq!(outcome, SendOutcome::Busy);
    assert_eq!(controller.snapshot().await.draft(), "hello");
    reset.await.unwrap().unwrap();
    assert!(controller.snapshot().await.transcript().is_empty());
}

// ============================================================================
// Select model
// ============================================================================

/// **VALUE**: The selection updates before the backend acknowledges it.
#[tokio::test]
async fn given_slow_select_endpoint_when_selecting_then_selection_visible_immediately() {
    // GIVEN: Loaded models and a slow select endpoint
    let backends = Backends::start().await;
    backends.mount_models(&["llama3", "qwen2"], "llama3").await;
    backends.mount_tools(json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/model/select"))
        .and(body_json(json!({ "model": "qwen2" })))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    // WHEN: Selecting qwen2 in the background
    let background = controller.clone();
    let select = tokio::spawn(async move { background.select_model(Some("qwen2")).await });

    // THEN: The selection flips while the request is still pending
    let flipped = tokio::time::timeout(Duration::from_millis(400), async {
        while controller.snapshot().await.models().selected() != Some("qwen2") {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(flipped.is_ok(), "Selection should change before the backend answers");
    assert!(!select.is_finished());

    select.await.unwrap().unwrap();
}

#[tokio::test]
async fn given_failing_select_endpoint_when_selecting_then_notice_and_no_rollback() {
    let backends = Backends::start().await;
    backends.mount_models(&["llama3", "qwen2"], "llama3").await;
    backends.mount_tools(json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/model/select"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    controller.select_model(Some("qwen2")).await.unwrap();

    let state = controller.snapshot().await;
    assert_eq!(state.models().selected(), Some("qwen2"));
    assert_eq!(state.notice(), Some(Notice::ModelSwitchFailed));
}

#[tokio::test]
async fn given_unknown_model_when_selecting_then_error_and_no_request() {
    let backends = Backends::start().await;
    backends.mount_models(&["llama3"], "llama3").await;
    backends.mount_tools(json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/model/select"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    let result = controller.select_model(Some("mistral")).await;

    assert!(matches!(result, Err(SessionError::UnknownModel { .. })));
    assert_eq!(controller.snapshot().await.models().selected(), Some("llama3"));
}

#[tokio::test]
async fn given_selected_model_when_selecting_none_then_cleared_and_backend_told() {
    let backends = Backends::start().await;
    backends.mount_models(&["llama3"], "llama3").await;
    backends.mount_tools(json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/model/select"))
        .and(body_json(json!({ "model": null })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    controller.select_model(None).await.unwrap();

    assert_eq!(controller.snapshot().await.models().selected(), None);
}

// ============================================================================
// Upload
// ============================================================================

/// **VALUE**: The upload scenario: acknowledgment names the file and both counts.
#[tokio::test]
async fn given_ingesting_backend_when_uploading_pdf_then_acknowledgment_has_name_and_counts() {
    // GIVEN: A PDF on disk and an ingesting backend
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 2,
            "fail": 1,
            "filename": "doc.pdf"
        })))
        .expect(1)
        .mount(&backends.retrieval)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("doc.pdf");
    std::fs::write(&file, b"%PDF-1.4").unwrap();

    // WHEN: Uploading it
    let controller = backends.controller();
    let ack = controller.upload_file(Some(&file)).await.unwrap().unwrap();

    // THEN: Accepted, and the text carries name and counts
    assert_eq!(
        ack,
        Acknowledgment::UploadAccepted {
            filename: "doc.pdf".to_string(),
            success: 2,
            fail: 1,
        }
    );
    let text = ack.to_string();
    assert!(text.contains("doc.pdf"));
    assert!(text.contains('2'));
    assert!(text.contains('1'));
}

#[tokio::test]
async fn given_rejecting_backend_when_uploading_then_acknowledgment_has_error_only() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "unsupported format" })),
        )
        .mount(&backends.retrieval)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("scan.pdf");
    std::fs::write(&file, b"garbage").unwrap();

    let controller = backends.controller();
    let ack = controller.upload_file(Some(&file)).await.unwrap().unwrap();

    let text = ack.to_string();
    assert!(text.contains("unsupported format"));
    assert!(!text.contains("succeeded"));
    assert!(!text.contains("failed"));
}

#[tokio::test]
async fn given_no_file_when_uploading_then_nothing_happens() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backends.retrieval)
        .await;

    let controller = backends.controller();

    assert_eq!(controller.upload_file(None).await.unwrap(), None);
}

/// **VALUE**: Files outside the accepted types are refused locally.
#[tokio::test]
async fn given_unsupported_file_when_uploading_then_failure_acknowledged_without_request() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backends.retrieval)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("photo.png");
    std::fs::write(&file, b"png").unwrap();

    let controller = backends.controller();
    let ack = controller.upload_file(Some(&file)).await.unwrap().unwrap();

    assert!(matches!(ack, Acknowledgment::UploadFailed { .. }));
    assert!(ack.to_string().starts_with("File upload failed"));
    assert!(!controller.snapshot().await.is_busy(chatroom_core::session::RequestKind::Upload));
}

#[tokio::test]
async fn given_failing_backend_when_uploading_then_failure_acknowledged_with_status() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&backends.retrieval)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"hello").unwrap();

    let controller = backends.controller();
    let ack = controller.upload_file(Some(&file)).await.unwrap().unwrap();

    assert_eq!(
        ack,
        Acknowledgment::UploadFailed {
            message: "HTTP 500 - disk full".to_string()
        }
    );
}

/// **VALUE**: A second upload while one is running is refused, not interleaved.
#[tokio::test]
async fn given_upload_in_flight_when_uploading_again_then_busy() {
    // GIVEN: A slow ingestion endpoint
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": 1, "fail": 0, "filename": "a.txt" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&backends.retrieval)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, b"a").unwrap();

    let controller = backends.controller();
    let background = controller.clone();
    let background_file = file.clone();
    let first = tokio::spawn(async move { background.upload_file(Some(&background_file)).await });

    while !controller
        .snapshot()
        .await
        .is_busy(chatroom_core::session::RequestKind::Upload)
    {
        tokio::task::yield_now().await;
    }

    // WHEN: Uploading again
    let second = controller.upload_file(Some(&file)).await.unwrap().unwrap();

    // THEN: Busy, and the first upload still succeeds
    assert_eq!(
        second,
        Acknowledgment::Busy(chatroom_core::session::RequestKind::Upload)
    );
    let first = first.await.unwrap().unwrap().unwrap();
    assert!(matches!(first, Acknowledgment::UploadAccepted { success: 1, .. }));
}

// ============================================================================
// Remember
// ============================================================================

#[tokio::test]
async fn given_turn_when_remembering_by_index_then_posts_question_and_answer() {
    // GIVEN: One turn and a remember endpoint expecting that turn's text
    let backends = Backends::start().await;
    let controller = controller_with_turn(&backends, "hello", json!({ "reply": "hi there" })).await;
    Mock::given(method("POST"))
        .and(path("/remember"))
        .and(body_json(json!({
            "text": "User: hello\nAI: hi there",
            "type": "fact",
            "tag": ["manual"],
            "domain": "chat",
            "user": "user1"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backends.retrieval)
        .await;

    // WHEN: Remembering turn 0
    let ack = controller.remember_turn_at(0).await.unwrap();

    // THEN: Saved
    assert_eq!(ack, Acknowledgment::Remembered);
    assert_eq!(ack.to_string(), "Answer saved");
}

#[tokio::test]
async fn given_failing_backend_when_remembering_then_generic_failure_acknowledged() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/remember"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.retrieval)
        .await;

    let controller = backends.controller();
    let ack = controller.remember_turn("some fact").await.unwrap();

    assert_eq!(ack, Acknowledgment::RememberFailed);
}

#[tokio::test]
async fn given_empty_transcript_when_remembering_by_index_then_unknown_turn() {
    let backends = Backends::start().await;
    let controller = backends.controller();

    let result = controller.remember_turn_at(0).await;

    assert!(matches!(result, Err(SessionError::UnknownTurn { index: 0, .. })));
}

// ============================================================================
// Tool-result disclosure
// ============================================================================

#[tokio::test]
async fn given_tool_result_when_toggled_twice_then_back_to_collapsed() {
    let backends = Backends::start().await;
    let controller = controller_with_turn(
        &backends,
        "hello",
        json!({
            "reply": "hi there",
            "toolResults": [{ "toolName": "search", "result": "3 hits" }]
        }),
    )
    .await;

    let first = controller.toggle_tool_result(0, 0).await.unwrap();
    let second = controller.toggle_tool_result(0, 0).await.unwrap();

    assert_eq!(first, Disclosure::Expanded);
    assert_eq!(second, Disclosure::Collapsed);
}

#[tokio::test]
async fn given_missing_indices_when_toggling_then_specific_errors() {
    let backends = Backends::start().await;
    let controller = controller_with_turn(&backends, "hello", json!({ "reply": "hi" })).await;

    let no_result = controller.toggle_tool_result(0, 0).await;
    let no_turn = controller.toggle_tool_result(4, 0).await;

    assert!(matches!(
        no_result,
        Err(SessionError::UnknownToolResult { turn: 0, result: 0, .. })
    ));
    assert!(matches!(no_turn, Err(SessionError::UnknownTurn { index: 4, .. })));
}

#[tokio::test]
async fn given_notice_when_dismissed_then_cleared() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();
    controller.send_message().await.unwrap();
    assert!(controller.snapshot().await.notice().is_some());

    controller.dismiss_notice().await.unwrap();

    assert_eq!(controller.snapshot().await.notice(), None);
}
