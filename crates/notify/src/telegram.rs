use async_trait::async_trait;
use paisa_core::notify::error::NotifyError;
use paisa_core::notify::port::Notifier;
use serde::Serialize;
use std::time::Duration;

/// # Summary
/// A notifier implementation that sends messages via Telegram Bot API.
///
/// # Invariants
/// * `bot_token` must be valid.
/// * `chat_id` must be accessible by the bot.
/// * Messages are pre-formatted by the caller and sent as HTML.
pub struct TelegramNotifier {
    /// The Bot API token.
    bot_token: String,
    /// The target Chat ID.
    chat_id: String,
    /// The HTTP client used for requests.
    client: reqwest::Client,
}

/// # Summary
/// Payload structure for Telegram `sendMessage` API.
#[derive(Serialize)]
struct TelegramMessage {
    chat_id: String,
    text: String,
    parse_mode: String,
}

impl TelegramNotifier {
    /// # Summary
    /// Creates a new `TelegramNotifier`.
    ///
    /// # Logic
    /// Initializes the struct with provided credentials and an HTTP client
    /// with a 10 second timeout.
    ///
    /// # Arguments
    /// * `bot_token` - The Telegram Bot API token.
    /// * `chat_id` - The target chat ID to send messages to.
    ///
    /// # Returns
    /// * A new instance, or `NotifyError::Config` if the client cannot be built.
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Config(e.to_string()))?;

        Ok(Self {
            bot_token,
            chat_id,
            client,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// # Summary
    /// Delivers one pre-formatted message to the configured Telegram chat.
    ///
    /// # Logic
    /// 1. Constructs the Telegram API URL.
    /// 2. Sends a POST request with the HTML-formatted body.
    /// 3. Checks the response status and returns success or failure.
    ///
    /// # Arguments
    /// * `message` - The message body, already formatted with HTML tags.
    ///
    /// # Returns
    /// * `Ok(())` if the message was sent successfully.
    /// * `Err(NotifyError)` if a network error occurs or the API returns a non-success status.
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let payload = TelegramMessage {
            chat_id: self.chat_id.clone(),
            text: message.to_string(),
            parse_mode: "HTML".to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Platform(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        Ok(())
    }
}
