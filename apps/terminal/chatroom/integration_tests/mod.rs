// Integration tests for the chatroom terminal front end
// The REPL runs against wiremock backends with scripted input

mod helpers;
mod repl;
