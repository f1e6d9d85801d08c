// Unit tests for REPL input parsing

use crate::command::Command;
use crate::error::ChatroomError;

use std::path::PathBuf;

/// **VALUE**: Plain text is a message, sent as typed.
///
/// **BUG THIS CATCHES**: Would catch trimming the message body, which changes
/// what the backend receives.
#[test]
fn given_plain_text_when_parsed_then_send_with_text_unchanged() {
    // GIVEN/WHEN: A message with inner and leading spacing
    let command = Command::parse("  hello   world").unwrap();

    // THEN: Sent verbatim
    assert_eq!(command, Command::Send("  hello   world".to_string()));
}

#[test]
fn given_blank_line_when_parsed_then_empty() {
    assert_eq!(Command::parse("").unwrap(), Command::Empty);
    assert_eq!(Command::parse("   \t").unwrap(), Command::Empty);
}

#[test]
fn given_simple_commands_when_parsed_then_matching_variants() {
    assert_eq!(Command::parse("/models").unwrap(), Command::Models);
    assert_eq!(Command::parse("/tools").unwrap(), Command::Tools);
    assert_eq!(Command::parse("/new").unwrap(), Command::NewChat);
    assert_eq!(Command::parse("/dismiss").unwrap(), Command::Dismiss);
    assert_eq!(Command::parse("/help").unwrap(), Command::Help);
    assert_eq!(Command::parse("/quit").unwrap(), Command::Quit);
    assert_eq!(Command::parse(" /quit ").unwrap(), Command::Quit);
}

#[test]
fn given_model_argument_when_parsed_then_select_model() {
    assert_eq!(
        Command::parse("/model qwen2").unwrap(),
        Command::SelectModel(Some("qwen2".to_string()))
    );
    assert_eq!(
        Command::parse("/model none").unwrap(),
        Command::SelectModel(None)
    );
    assert!(Command::parse("/model").is_err());
}

#[test]
fn given_upload_with_and_without_path_when_parsed_then_optional_path() {
    assert_eq!(
        Command::parse("/upload ./docs/report final.pdf").unwrap(),
        Command::Upload(Some(PathBuf::from("./docs/report final.pdf")))
    );
    assert_eq!(Command::parse("/upload").unwrap(), Command::Upload(None));
}

/// **VALUE**: Users count turns from 1; the session indexes from 0.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one that remembers or toggles
/// the neighbouring turn.
#[test]
fn given_one_based_numbers_when_parsed_then_zero_based_indices() {
    // GIVEN/WHEN: Turn 1 and tool result 2 of turn 3
    let remember = Command::parse("/remember 1").unwrap();
    let toggle = Command::parse("/toggle 3 2").unwrap();

    // THEN: Shifted down by one
    assert_eq!(remember, Command::Remember(0));
    assert_eq!(toggle, Command::Toggle { turn: 2, result: 1 });
}

#[test]
fn given_bad_numbers_when_parsed_then_usage_error() {
    for line in [
        "/remember",
        "/remember 0",
        "/remember two",
        "/toggle 1",
        "/toggle 1 0",
        "/toggle 1 2 3",
    ] {
        let result = Command::parse(line);
        assert!(
            matches!(result, Err(ChatroomError::Command { .. })),
            "'{line}' should be rejected"
        );
    }
}

#[test]
fn given_unknown_command_when_parsed_then_error_names_it() {
    let err = Command::parse("/frobnicate now").unwrap_err();

    assert!(err.message().contains("/frobnicate"));
    assert!(err.message().contains("/help"));
}
