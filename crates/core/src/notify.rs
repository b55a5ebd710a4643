//! Notification sink boundary.
//!
//! The core calls out through this trait to reach the chat transport.
//! Deliveries are fire-and-forget: a failed call is logged by the caller,
//! never retried.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the transport when a delivery fails.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(String),
}

/// One action button on an approval prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalButton {
    pub label: String,
    /// Encoded [`crate::requests::ApprovalToken`].
    pub token: String,
}

/// An admin-facing approval prompt with its action buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalPrompt {
    pub caption: String,
    pub poster_url: Option<String>,
    pub actions: Vec<ApprovalButton>,
}

/// Outbound messaging as consumed by the core.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a plain text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;

    /// Send an approval prompt (poster if available, buttons attached).
    async fn send_prompt(&self, chat_id: i64, prompt: &ApprovalPrompt) -> Result<(), NotifyError>;

    /// Replace the text/caption of an existing message.
    async fn rewrite_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> Result<(), NotifyError>;
}
