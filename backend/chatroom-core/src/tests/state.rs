// Unit tests for the session reducer
// Every property here is checked without any network or runtime

use crate::session::model::{ChatTurn, Disclosure, ModelList, Tool, ToolResult};
use crate::session::notice::Notice;
use crate::session::state::{Action, RequestKind, SessionState};

fn state_with_models(models: &[&str], current: &str) -> SessionState {
    let list = ModelList::new(
        models.iter().map(|m| m.to_string()).collect(),
        Some(current.to_string()),
    );
    SessionState::new().reduce(Action::ModelsLoaded(list))
}

fn turn_with_search_result(user: &str) -> ChatTurn {
    let mut turn = ChatTurn::new(user, "hi there");
    turn.tool_results.push(ToolResult::new("search", "3 hits"));
    turn
}

fn sending(draft: &str) -> SessionState {
    SessionState::new()
        .reduce(Action::DraftChanged(draft.to_string()))
        .reduce(Action::RequestStarted(RequestKind::Send))
}

/// **VALUE**: A successful send appends exactly one turn and clears the draft.
///
/// **BUG THIS CATCHES**: Would catch a reducer that replaces the transcript,
/// forgets to clear the draft, or leaves the busy flag set.
#[test]
fn given_send_in_flight_when_reply_arrives_then_one_turn_appended_and_draft_cleared() {
    // GIVEN: One turn already in the transcript and a second send in flight
    let state = sending("first")
        .reduce(Action::SendSucceeded(ChatTurn::new("first", "one")))
        .reduce(Action::DraftChanged("hello".to_string()))
        .reduce(Action::RequestStarted(RequestKind::Send));
    assert!(state.is_loading());

    // WHEN: The reply arrives
    let state = state.reduce(Action::SendSucceeded(ChatTurn::new("hello", "hi there")));

    // THEN: Two turns in send order, empty draft, not loading
    assert_eq!(state.transcript().len(), 2);
    assert_eq!(state.transcript().turns()[0].user, "first");
    assert_eq!(state.transcript().turns()[1].user, "hello");
    assert_eq!(state.draft(), "");
    assert!(!state.is_loading());
}

/// **VALUE**: A failed send keeps the draft for a retry and leaves the transcript alone.
#[test]
fn given_send_in_flight_when_send_fails_then_draft_preserved_and_notice_raised() {
    // GIVEN: A send in flight
    let state = sending("hello");

    // WHEN: The send fails
    let state = state.reduce(Action::SendFailed);

    // THEN: Draft kept, transcript empty, notice shown, not loading
    assert_eq!(state.draft(), "hello");
    assert!(state.transcript().is_empty());
    assert_eq!(state.notice(), Some(Notice::ReplyUnavailable));
    assert!(!state.is_loading(), "User should be able to retry");
}

#[test]
fn given_blank_draft_when_send_requested_then_not_admitted() {
    for draft in ["", "   ", "\n\t "] {
        let state = SessionState::new()
            .reduce(Action::DraftChanged(draft.to_string()))
            .reduce(Action::RequestStarted(RequestKind::Send));

        assert!(!state.is_loading(), "Blank draft {draft:?} must not start a send");
    }
}

/// **VALUE**: While a send is in flight the send action is disabled.
///
/// **WHY THIS MATTERS**: The controller relies on `RequestStarted` being a
/// no-op for a taken slot to reject a second concurrent send.
#[test]
fn given_send_in_flight_when_second_send_requested_then_state_unchanged() {
    // GIVEN: A send in flight
    let before = sending("hello");
    assert!(before.is_loading());

    // WHEN: Another send is requested
    let after = before.clone().reduce(Action::RequestStarted(RequestKind::Send));

    // THEN: Nothing changes
    assert_eq!(before, after);
}

#[test]
fn given_transcript_when_chat_reset_then_transcript_empty() {
    let state = sending("a")
        .reduce(Action::SendSucceeded(ChatTurn::new("a", "b")))
        .reduce(Action::DraftChanged("c".to_string()))
        .reduce(Action::RequestStarted(RequestKind::Send))
        .reduce(Action::SendSucceeded(ChatTurn::new("c", "d")))
        .reduce(Action::RequestStarted(RequestKind::Reset));

    let state = state.reduce(Action::ChatReset);

    assert!(state.transcript().is_empty());
    assert!(!state.is_busy(RequestKind::Reset));
}

/// **VALUE**: A failed reset only releases the in-flight slot.
///
/// **BUG THIS CATCHES**: Would catch clearing the transcript before the backend
/// confirmed the reset, which lets the client diverge from the server.
#[test]
fn given_reset_in_flight_when_reset_fails_then_transcript_kept() {
    // GIVEN: A transcript and a reset in flight
    let state = sending("a")
        .reduce(Action::SendSucceeded(ChatTurn::new("a", "b")))
        .reduce(Action::RequestStarted(RequestKind::Reset));

    // WHEN: The reset fails
    let state = state.reduce(Action::RequestFinished(RequestKind::Reset));

    // THEN: Transcript untouched
    assert_eq!(state.transcript().len(), 1);
    assert!(!state.is_busy(RequestKind::Reset));
}

#[test]
fn given_models_loaded_when_selecting_listed_model_then_selection_changes() {
    let state = state_with_models(&["llama3", "qwen2"], "llama3");

    let state = state.reduce(Action::ModelSelected(Some("qwen2".to_string())));

    assert_eq!(state.models().selected(), Some("qwen2"));
}

/// **VALUE**: The selection never leaves the model list.
#[test]
fn given_models_loaded_when_selecting_unknown_model_then_selection_kept() {
    let state = state_with_models(&["llama3", "qwen2"], "llama3");

    let state = state.reduce(Action::ModelSelected(Some("mistral".to_string())));

    assert_eq!(state.models().selected(), Some("llama3"));
}

#[test]
fn given_selected_model_when_selecting_none_or_empty_then_selection_cleared() {
    let cleared = state_with_models(&["llama3"], "llama3").reduce(Action::ModelSelected(None));
    assert_eq!(cleared.models().selected(), None);

    let cleared = state_with_models(&["llama3"], "llama3")
        .reduce(Action::ModelSelected(Some(String::new())));
    assert_eq!(cleared.models().selected(), None);
}

/// **VALUE**: A failed list fetch degrades only that list.
///
/// **WHY THIS MATTERS**: Models and tools load independently; a failing tools
/// endpoint must not wipe an already loaded model list.
#[test]
fn given_models_loaded_when_tools_fail_then_models_kept_and_tools_empty() {
    // GIVEN: Models loaded and a stale tool list
    let state = state_with_models(&["llama3"], "llama3").reduce(Action::ToolsLoaded(vec![Tool {
        name: "search".to_string(),
        description: None,
    }]));

    // WHEN: The tool fetch fails
    let state = state.reduce(Action::ToolsFailed);

    // THEN: Tools empty, models untouched, tool notice shown
    assert!(state.tools().is_empty());
    assert_eq!(state.models().selected(), Some("llama3"));
    assert_eq!(state.notice(), Some(Notice::ToolListUnavailable));
}

#[test]
fn given_models_failed_then_list_empty_and_notice_raised() {
    let state = state_with_models(&["llama3"], "llama3").reduce(Action::ModelsFailed);

    assert!(state.models().is_empty());
    assert_eq!(state.models().selected(), None);
    assert_eq!(state.notice(), Some(Notice::ModelListUnavailable));
}

#[test]
fn given_notice_when_dismissed_then_cleared() {
    let state = SessionState::new()
        .reduce(Action::NoticeRaised(Notice::ModelSwitchFailed))
        .reduce(Action::NoticeDismissed);

    assert_eq!(state.notice(), None);
}

/// **VALUE**: Toggling a tool result twice is a round trip.
#[test]
fn given_collapsed_tool_result_when_toggled_twice_then_collapsed_again() {
    // GIVEN: A turn with one collapsed tool result
    let state = sending("hello").reduce(Action::SendSucceeded(turn_with_search_result("hello")));
    assert_eq!(state.disclosure(0, 0), Some(Disclosure::Collapsed));

    // WHEN: Toggled once, then again
    let once = state.clone().reduce(Action::ToolResultToggled { turn: 0, result: 0 });
    let twice = once.clone().reduce(Action::ToolResultToggled { turn: 0, result: 0 });

    // THEN: Expanded after one toggle, back to the original after two
    assert_eq!(once.disclosure(0, 0), Some(Disclosure::Expanded));
    assert_eq!(twice, state);
}

#[test]
fn given_missing_tool_result_when_toggled_then_state_unchanged() {
    let state = sending("hello").reduce(Action::SendSucceeded(turn_with_search_result("hello")));

    let after = state
        .clone()
        .reduce(Action::ToolResultToggled { turn: 0, result: 5 })
        .reduce(Action::ToolResultToggled { turn: 3, result: 0 });

    assert_eq!(after, state);
}

#[test]
fn given_upload_in_flight_then_send_still_allowed() {
    let state = SessionState::new()
        .reduce(Action::RequestStarted(RequestKind::Upload))
        .reduce(Action::DraftChanged("hello".to_string()));

    assert!(state.is_busy(RequestKind::Upload));
    assert_eq!(state.blocked_by(RequestKind::Send), None);
    assert!(state.reduce(Action::RequestStarted(RequestKind::Send)).is_loading());
}

/// **VALUE**: A reset cannot start while a message awaits its reply.
///
/// **BUG THIS CATCHES**: Would catch clearing the transcript under a pending
/// send, whose reply would then show up in the fresh conversation.
#[test]
fn given_send_in_flight_when_reset_requested_then_not_admitted() {
    // GIVEN: A send in flight
    let before = sending("hello");

    // WHEN: A reset is requested
    let after = before.clone().reduce(Action::RequestStarted(RequestKind::Reset));

    // THEN: Reset not admitted, blocked by the send
    assert_eq!(before, after);
    assert!(!after.is_busy(RequestKind::Reset));
    assert_eq!(after.blocked_by(RequestKind::Reset), Some(RequestKind::Send));
}

#[test]
fn given_reset_in_flight_when_send_requested_then_not_admitted() {
    let state = SessionState::new()
        .reduce(Action::RequestStarted(RequestKind::Reset))
        .reduce(Action::DraftChanged("hello".to_string()))
        .reduce(Action::RequestStarted(RequestKind::Send));

    assert!(!state.is_loading());
    assert_eq!(state.blocked_by(RequestKind::Send), Some(RequestKind::Reset));
    assert_eq!(state.draft(), "hello");
}
