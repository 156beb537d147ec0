use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::Notifier;
use crate::error::{Error, Result};

const API_BASE: &str = "https://api.telegram.org";

/// Sends messages to one chat through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        let bot_token = bot_token.into();
        let chat_id = chat_id.into();
        if bot_token.is_empty() || chat_id.is_empty() {
            return Err(Error::Config(
                "telegram bot token and admin chat id are required".into(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
            bot_token,
            chat_id,
        })
    }

    /// Points the notifier at another Bot API server.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.send_message_url())
            .form(&[("chat_id", self.chat_id.as_str()), ("text", message)])
            .send()
            .await
            // The URL carries the bot token.
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = resp.status();
        let body: BotApiResponse = resp.json().await.unwrap_or(BotApiResponse {
            ok: false,
            description: None,
        });

        if !status.is_success() || !body.ok {
            let reason = body
                .description
                .unwrap_or_else(|| format!("status {status}"));
            tracing::warn!("Telegram rejected message: {}", reason);
            return Err(Error::Notify(reason));
        }

        tracing::debug!("Telegram notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new("123:abc", "42").unwrap();
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_requires_token_and_chat() {
        assert!(matches!(
            TelegramNotifier::new("", "42"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TelegramNotifier::new("123:abc", ""),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let notifier = TelegramNotifier::new("SECRET123:abc", "42")
            .unwrap()
            .with_api_base("http://127.0.0.1:1");

        let err = notifier.notify("hello").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("SECRET123"), "{err}");
        assert!(!format!("{err:?}").contains("SECRET123"), "{err:?}");
    }

    #[test]
    fn test_parse_bot_api_error() {
        let body: BotApiResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"chat not found"}"#)
                .unwrap();
        assert!(!body.ok);
        assert_eq!(body.description.as_deref(), Some("chat not found"));
    }
}
