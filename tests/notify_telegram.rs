//! Exercises the Telegram notifier against a mocked Bot API.

use time::macros::datetime;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use diwan::application::contact::ContactNotifier;
use diwan::config::TelegramSettings;
use diwan::domain::entities::MessageRecord;
use diwan::infra::notify::TelegramNotifier;

fn settings(server: &MockServer) -> TelegramSettings {
    TelegramSettings {
        api_base: format!("{}/", server.uri()).parse().expect("url"),
        bot_token: "123:abc".to_string(),
        chat_id: "42".to_string(),
    }
}

fn message() -> MessageRecord {
    MessageRecord {
        id: Uuid::new_v4(),
        name: "Lina".to_string(),
        email: "lina@example.com".to_string(),
        phone: None,
        body: "Interested in project work.".to_string(),
        read: false,
        created_at: datetime!(2025-06-01 12:00 UTC),
    }
}

#[tokio::test]
async fn send_message_hits_the_bot_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_partial_json(serde_json::json!({ "chat_id": "42" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        TelegramNotifier::new(reqwest::Client::new(), &settings(&server)).expect("notifier");
    notifier.notify(&message()).await.expect("delivered");
}

#[tokio::test]
async fn rejected_send_surfaces_the_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "description": "chat not found"
        })))
        .mount(&server)
        .await;

    let notifier =
        TelegramNotifier::new(reqwest::Client::new(), &settings(&server)).expect("notifier");
    let err = notifier.notify(&message()).await.expect_err("rejected");
    assert!(err.to_string().contains("chat not found"));
}
