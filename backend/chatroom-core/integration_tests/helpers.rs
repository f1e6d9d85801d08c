//! Test helpers for backend integration tests.
//!
//! Each test gets its own pair of wiremock servers standing in for the chat
//! API and the retrieval API.

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

    pub async fn mount_models(&self, models: &[&str], current: &str) {
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": models,
                "currentModel": current
            })))
            .mount(&self.chat)
            .await;
    }

    pub async fn mount_tools(&self, tools: Value) {
        Mock::given(method("GET"))
            .and(path("/api/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tools": tools })))
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

/// Controller with the given draft already sent and answered with `reply`.
pub async fn controller_with_turn(backends: &Backends, user: &str, reply: Value) -> SessionController {
    backends.mount_chat_reply(reply).await;
    let controller = backends.controller();
    controller.set_draft(user).await.expect("set_draft failed");
    controller.send_message().await.expect("send_message failed");
    controller
}
