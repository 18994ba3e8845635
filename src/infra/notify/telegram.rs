//! Telegram Bot API delivery of contact notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::application::contact::{ContactNotifier, NotifyError};
use crate::config::TelegramSettings;
use crate::domain::entities::MessageRecord;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: Url,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, settings: &TelegramSettings) -> Result<Self, NotifyError> {
        // The token contains a colon, so it cannot go through `Url::join`
        // (a `bot123:` prefix would parse as a scheme).
        let base = settings.api_base.as_str();
        let separator = if base.ends_with('/') { "" } else { "/" };
        let endpoint = format!("{base}{separator}bot{}/sendMessage", settings.bot_token);
        let endpoint = Url::parse(&endpoint)
            .map_err(|err| NotifyError::Configuration(format!("invalid bot endpoint: {err}")))?;

        Ok(Self {
            client,
            endpoint,
            chat_id: settings.chat_id.clone(),
        })
    }
}

#[async_trait]
impl ContactNotifier for TelegramNotifier {
    fn channel(&self) -> &'static str {
        "telegram"
    }

    async fn notify(&self, message: &MessageRecord) -> Result<(), NotifyError> {
        let phone = message.phone.as_deref().unwrap_or("-");
        let text = format!(
            "New portfolio message\nFrom: {}\nEmail: {}\nPhone: {}\n\n{}",
            message.name, message.email, phone, message.body
        );

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let status = response.status();
        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|err| NotifyError::Transport(format!("status {status}: {err}")))?;

        if !body.ok {
            return Err(NotifyError::Transport(
                body.description
                    .unwrap_or_else(|| format!("sendMessage rejected with status {status}")),
            ));
        }

        Ok(())
    }
}
