use chatroom::repl::Repl;

use chatroom_core::api::{ChatApiClient, RetrievalClient};
use chatroom_core::config::RetrievalConfig;
use chatroom_core::session::SessionController;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct Backends {
    pub chat: MockServer,
    pub retrieval: MockServer,
}

impl Backends {
    pub async fn start() -> Self {
        Self {
            chat: MockServer::start().await,
            retrieval: MockServer::start().await,
        }
    }

    pub fn controller(&self) -> SessionController {
        let chat = ChatApiClient::new(&self.chat.uri()).expect("Failed to build chat client");
        let retrieval =
            RetrievalClient::new(&self.retrieval.uri()).expect("Failed to build retrieval client");
        SessionController::new(chat, retrieval, RetrievalConfig::default())
    }

    pub async fn mount_session(&self) {
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": ["llama3", "qwen2"],
                "currentModel": "llama3"
            })))
            .mount(&self.chat)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tools": [
                    { "name": "search", "description": "Web search" },
                    { "name": "calc" }
                ]
            })))
            .mount(&self.chat)
            .await;
    }

    pub async fn mount_chat_reply(&self, reply: Value) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .mount(&self.chat)
            .await;
    }
}

/// The reply used by most tests: one answer with one `search` result.
pub fn reply_with_search() -> Value {
    json!({
        "reply": "hi there",
        "toolResults": [{ "toolName": "search", "result": "3 hits" }]
    })
}

/// Run the REPL over `input` and return everything it printed.
pub async fn run_repl(controller: SessionController, input: &str) -> String {
    let mut repl = Repl::new(controller, input.as_bytes(), Vec::new());
    repl.run().await.expect("REPL failed");
    String::from_utf8(repl.into_output()).expect("REPL output is not UTF-8")
}
