// Unit tests for the backend wire types
// Field names must match the backends exactly

use crate::api::wire::{
    ChatRequest, ChatResponse, ModelsResponse, RememberRequest, SelectModelRequest,
    ToolsResponse, UploadOutcome, UploadResponse,
};

use serde_json::json;

#[test]
fn given_models_json_when_deserialized_then_reads_camel_case_current_model() {
    let response: ModelsResponse = serde_json::from_value(json!({
        "models": ["llama3", "qwen2"],
        "currentModel": "llama3"
    }))
    .unwrap();

    assert_eq!(response.models, vec!["llama3", "qwen2"]);
    assert_eq!(response.current_model.as_deref(), Some("llama3"));
}

#[test]
fn given_tools_json_with_null_or_missing_list_when_deserialized_then_empty() {
    let null: ToolsResponse = serde_json::from_value(json!({ "tools": null })).unwrap();
    let missing: ToolsResponse = serde_json::from_value(json!({})).unwrap();

    assert_eq!(null.tools.unwrap_or_default(), vec![]);
    assert_eq!(missing.tools.unwrap_or_default(), vec![]);
}

#[test]
fn given_chat_json_when_deserialized_then_reads_tool_results() {
    let response: ChatResponse = serde_json::from_value(json!({
        "reply": "hi there",
        "toolResults": [{ "toolName": "search", "result": "3 hits" }]
    }))
    .unwrap();

    let tool_results = response.tool_results.unwrap();
    assert_eq!(response.reply, "hi there");
    assert_eq!(tool_results[0].tool_name, "search");
    assert_eq!(tool_results[0].result_text(), "3 hits");
}

/// **VALUE**: Requests serialize to the exact bodies the backends expect.
///
/// **BUG THIS CATCHES**: Would catch a rename (e.g. `kind` leaking instead of
/// `type`) that makes the retrieval backend drop the memory entry.
#[test]
fn given_requests_when_serialized_then_match_backend_bodies() {
    assert_eq!(
        serde_json::to_value(ChatRequest { message: "hello" }).unwrap(),
        json!({ "message": "hello" })
    );
    assert_eq!(
        serde_json::to_value(SelectModelRequest { model: Some("qwen2") }).unwrap(),
        json!({ "model": "qwen2" })
    );
    assert_eq!(
        serde_json::to_value(SelectModelRequest { model: None }).unwrap(),
        json!({ "model": null })
    );
    assert_eq!(
        serde_json::to_value(RememberRequest::manual_fact("User: a\nAI: b", "chat", "user1"))
            .unwrap(),
        json!({
            "text": "User: a\nAI: b",
            "type": "fact",
            "tag": ["manual"],
            "domain": "chat",
            "user": "user1"
        })
    );
}

#[test]
fn given_upload_counts_when_converted_then_ingested() {
    let response = UploadResponse::from(json!({
        "success": 2,
        "fail": 1,
        "filename": "doc.pdf"
    }));

    assert_eq!(
        UploadOutcome::from(response),
        UploadOutcome::Ingested {
            filename: "doc.pdf".to_string(),
            success: 2,
            fail: 1,
        }
    );
}

#[test]
fn given_upload_without_counts_when_converted_then_defaults_to_zero_and_empty_name() {
    let response = UploadResponse::from(json!({}));

    assert_eq!(
        UploadOutcome::from(response),
        UploadOutcome::Ingested {
            filename: String::new(),
            success: 0,
            fail: 0,
        }
    );
}

/// **VALUE**: An `error` field wins over any counts in the same body.
#[test]
fn given_upload_error_when_converted_then_rejected() {
    let response = UploadResponse::from(json!({
        "error": "unsupported format",
        "success": 0
    }));

    assert_eq!(
        UploadOutcome::from(response),
        UploadOutcome::Rejected {
            message: "unsupported format".to_string()
        }
    );
}

#[test]
fn given_empty_or_null_upload_error_when_converted_then_not_rejected() {
    for error in [json!(null), json!(""), json!(false)] {
        let response = UploadResponse::from(json!({ "error": error, "success": 1 }));

        assert!(
            matches!(UploadOutcome::from(response), UploadOutcome::Ingested { success: 1, .. }),
            "error {error} should count as absent"
        );
    }
}

#[test]
fn given_structured_upload_error_when_converted_then_message_is_json_text() {
    let response = UploadResponse::from(json!({ "error": { "code": 415 } }));

    assert_eq!(
        UploadOutcome::from(response),
        UploadOutcome::Rejected {
            message: r#"{"code":415}"#.to_string()
        }
    );
}

/// **VALUE**: Loosely typed counts are still read.
///
/// **BUG THIS CATCHES**: Would catch `u64`-only decoding, which drops the `2.0`
/// counts Python services commonly send.
#[test]
fn given_float_and_string_counts_when_read_then_whole_numbers() {
    // GIVEN: Counts as float, numeric string and negative number
    let response = UploadResponse::from(json!({
        "success": 2.0,
        "fail": "3",
        "filename": "doc.pdf"
    }));
    let negative = UploadResponse::from(json!({ "success": -1, "fail": 1.7 }));

    // THEN: Whole non-negative counts
    assert_eq!(response.success, 2);
    assert_eq!(response.fail, 3);
    assert_eq!(negative.success, 0);
    assert_eq!(negative.fail, 1);
}

#[test]
fn given_empty_or_non_object_body_when_read_then_defaults() {
    let bodies: [&[u8]; 4] = [b"", b"OK", b"[1, 2]", b"null"];

    for body in bodies {
        let response = UploadResponse::from_body(body);

        assert_eq!(response, UploadResponse::default());
        assert!(matches!(
            UploadOutcome::from(response),
            UploadOutcome::Ingested { success: 0, fail: 0, .. }
        ));
    }
}
