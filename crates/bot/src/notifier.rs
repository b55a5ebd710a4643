//! `Notifier` implementation over the Telegram API.

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId},
};
use tracing::debug;

use reelbot_core::{ApprovalPrompt, Notifier, NotifyError};

/// Sends core notifications through a Telegram bot.
pub struct TelegramNotifier {
    bot: Bot,
    http: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");
        Self { bot, http }
    }
}

/// Posters come as URLs; Telegram is happier with bytes.
pub(crate) async fn fetch_image(client: &reqwest::Client, url: &str) -> Option<Vec<u8>> {
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        debug!(url, status = %response.status(), "poster fetch failed");
        return None;
    }
    response.bytes().await.ok().map(|b| b.to_vec())
}

fn keyboard(prompt: &ApprovalPrompt) -> InlineKeyboardMarkup {
    // Approve variants side by side, decline on its own row.
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let mut approve_row = Vec::new();
    for action in &prompt.actions {
        let button = InlineKeyboardButton::callback(action.label.clone(), action.token.clone());
        if action.label.contains("Decline") || action.label.contains('❌') {
            rows.push(vec![button]);
        } else {
            approve_row.push(button);
        }
    }
    if !approve_row.is_empty() {
        rows.insert(0, approve_row);
    }
    InlineKeyboardMarkup::new(rows)
}

fn transport_err<E: std::fmt::Display>(e: E) -> NotifyError {
    NotifyError::Transport(e.to_string())
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn send_prompt(&self, chat_id: i64, prompt: &ApprovalPrompt) -> Result<(), NotifyError> {
        let markup = keyboard(prompt);

        let poster = match &prompt.poster_url {
            Some(url) => fetch_image(&self.http, url).await,
            None => None,
        };

        match poster {
            Some(bytes) => {
                self.bot
                    .send_photo(ChatId(chat_id), InputFile::memory(bytes))
                    .caption(prompt.caption.clone())
                    .reply_markup(markup)
                    .await
                    .map_err(transport_err)?;
            }
            None => {
                self.bot
                    .send_message(ChatId(chat_id), &prompt.caption)
                    .reply_markup(markup)
                    .await
                    .map_err(transport_err)?;
            }
        }
        Ok(())
    }

    async fn rewrite_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> Result<(), NotifyError> {
        let chat = ChatId(chat_id);
        let message = MessageId(message_id);

        // Photo cards take a caption edit; plain messages a text edit.
        let caption_edit = self
            .bot
            .edit_message_caption(chat, message)
            .caption(text.to_string())
            .await;
        if caption_edit.is_ok() {
            return Ok(());
        }

        self.bot
            .edit_message_text(chat, message, text)
            .await
            .map_err(transport_err)?;
        Ok(())
    }
}
