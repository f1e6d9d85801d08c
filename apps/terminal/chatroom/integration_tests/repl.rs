use crate::helpers::{Backends, reply_with_search, run_repl};

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Lists
// ============================================================================

/// **VALUE**: Loaded models and tools are shown as the backend reported them.
#[tokio::test]
async fn given_loaded_session_when_listing_then_models_and_tools_printed() {
    // GIVEN: A loaded session
    let backends = Backends::start().await;
    backends.mount_session().await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    // WHEN: Listing models and tools
    let output = run_repl(controller, "/models\n/tools\n").await;

    // THEN: Selection marker and description placeholder present
    assert!(output.contains("* llama3"));
    assert!(output.contains("    qwen2"));
    assert!(output.contains("search - Web search"));
    assert!(output.contains("calc - No description"));
    assert!(output.contains("[llama3] > "));
}

#[tokio::test]
async fn given_unreachable_models_when_repl_starts_then_notice_printed() {
    let backends = Backends::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    let output = run_repl(controller, "/dismiss\n").await;

    // Tools also fail (no mock), so the later notice is the one shown
    assert!(output.contains("! Unable to fetch"));
    assert_eq!(output.matches("! Unable to fetch").count(), 1);
}

// ============================================================================
// Messages
// ============================================================================

/// **VALUE**: A typed line goes to the backend and the reply is printed.
#[tokio::test]
async fn given_text_line_when_sent_then_reply_and_collapsed_result_printed() {
    // GIVEN: A chat backend expecting "hello"
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_search()))
        .expect(1)
        .mount(&backends.chat)
        .await;

    // WHEN: Typing "hello" and closing input
    let output = run_repl(backends.controller(), "hello\n").await;

    // THEN: The turn is printed with its collapsed tool result
    assert!(output.contains("[1] You: hello"));
    assert!(output.contains("AI: hi there"));
    assert!(output.contains("▸ search (1.1)"));
    assert!(!output.contains("3 hits"));
}

#[tokio::test]
async fn given_failing_chat_when_sent_then_notice_printed() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();

    let output = run_repl(controller.clone(), "hello\n").await;

    assert!(output.contains("! Unable to get AI reply"));
    assert_eq!(controller.snapshot().await.draft(), "hello");
}

/// **VALUE**: `/quit` waits for a pending reply instead of dropping it.
#[tokio::test]
async fn given_pending_reply_when_quitting_then_reply_still_recorded() {
    // GIVEN: A slow chat backend
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply_with_search())
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();

    // WHEN: Sending and immediately quitting
    let output = run_repl(controller.clone(), "hello\n/quit\n").await;

    // THEN: The reply was awaited and printed
    assert!(output.contains("AI: hi there"));
    assert_eq!(controller.snapshot().await.transcript().len(), 1);
}

// ============================================================================
// Turn actions
// ============================================================================

#[tokio::test]
async fn given_turn_when_toggling_then_result_expanded() {
    let backends = Backends::start().await;
    backends.mount_chat_reply(reply_with_search()).await;
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();
    controller.send_message().await.unwrap();

    let output = run_repl(controller, "/toggle 1 1\n").await;

    assert!(output.contains("▾ search (1.1)"));
    assert!(output.contains("        3 hits"));
}

/// **VALUE**: Remember is confirmed with a blocking acknowledgment.
#[tokio::test]
async fn given_turn_when_remembering_then_boxed_acknowledgment_waits_for_enter() {
    // GIVEN: One answered turn and a memory backend expecting it
    let backends = Backends::start().await;
    backends.mount_chat_reply(reply_with_search()).await;
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
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();
    controller.send_message().await.unwrap();

    // WHEN: Remembering turn 1, then pressing Enter
    let output = run_repl(controller, "/remember 1\n\n").await;

    // THEN: Boxed confirmation and continue prompt
    assert!(output.contains("| Answer saved |"));
    assert!(output.contains("Press Enter to continue"));
}

#[tokio::test]
async fn given_no_turns_when_remembering_then_error_printed_without_request() {
    let backends = Backends::start().await;
    Mock::given(method("POST"))
        .and(path("/remember"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backends.retrieval)
        .await;

    let output = run_repl(backends.controller(), "/remember 2\n").await;

    assert!(output.contains("No turn 2"));
}

// ============================================================================
// Model, chat and upload commands
// ============================================================================

#[tokio::test]
async fn given_unknown_model_when_selecting_then_error_printed() {
    let backends = Backends::start().await;
    backends.mount_session().await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    let output = run_repl(controller, "/model mistral\n").await;

    assert!(output.contains("Unknown model 'mistral'"));
}

#[tokio::test]
async fn given_failing_reset_when_new_chat_then_conversation_kept_message() {
    let backends = Backends::start().await;
    backends.mount_chat_reply(reply_with_search()).await;
    Mock::given(method("POST"))
        .and(path("/api/chat/new"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backends.chat)
        .await;
    let controller = backends.controller();
    controller.set_draft("hello").await.unwrap();
    controller.send_message().await.unwrap();

    let output = run_repl(controller.clone(), "/new\n").await;

    assert!(output.contains("New chat failed, conversation kept: HTTP 503"));
    assert_eq!(controller.snapshot().await.transcript().len(), 1);
}

#[tokio::test]
async fn given_document_when_uploading_then_counts_acknowledged() {
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

    let input = format!("/upload {}\n\n", file.display());
    let output = run_repl(backends.controller(), &input).await;

    assert!(output.contains("File doc.pdf uploaded: 2 succeeded, 1 failed"));
}

#[tokio::test]
async fn given_bad_input_when_parsed_then_usage_printed_and_loop_continues() {
    let backends = Backends::start().await;
    backends.mount_session().await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    let output = run_repl(controller, "/frobnicate\n/toggle x\n/models\n").await;

    assert!(output.contains("Unknown command '/frobnicate'"));
    assert!(output.contains("Usage: /toggle <n> <m>"));
    assert!(output.contains("* llama3"));
}

#[tokio::test]
async fn given_quit_when_more_input_follows_then_rest_ignored() {
    let backends = Backends::start().await;
    backends.mount_session().await;
    let controller = backends.controller();
    controller.load_session().await.unwrap();

    let output = run_repl(controller, "/quit\n/models\n").await;

    assert!(!output.contains("* llama3"));
}
