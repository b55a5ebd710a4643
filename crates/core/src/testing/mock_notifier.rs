//! Mock notification sink for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notify::{ApprovalPrompt, Notifier, NotifyError};

/// A rewrite applied to an existing message.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRewrite {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
}

/// Mock implementation of the `Notifier` trait, recording every delivery.
#[derive(Debug, Default)]
pub struct MockNotifier {
    texts: Arc<RwLock<Vec<(i64, String)>>>,
    prompts: Arc<RwLock<Vec<(i64, ApprovalPrompt)>>>,
    rewrites: Arc<RwLock<Vec<RecordedRewrite>>>,
    fail_all: Arc<RwLock<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery fail until cleared.
    pub async fn set_fail_all(&self, fail: bool) {
        *self.fail_all.write().await = fail;
    }

    pub async fn sent_texts(&self) -> Vec<(i64, String)> {
        self.texts.read().await.clone()
    }

    pub async fn sent_prompts(&self) -> Vec<(i64, ApprovalPrompt)> {
        self.prompts.read().await.clone()
    }

    pub async fn rewrites(&self) -> Vec<RecordedRewrite> {
        self.rewrites.read().await.clone()
    }

    async fn maybe_fail(&self) -> Result<(), NotifyError> {
        if *self.fail_all.read().await {
            Err(NotifyError::Transport("mock delivery failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.maybe_fail().await?;
        self.texts.write().await.push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_prompt(&self, chat_id: i64, prompt: &ApprovalPrompt) -> Result<(), NotifyError> {
        self.maybe_fail().await?;
        self.prompts.write().await.push((chat_id, prompt.clone()));
        Ok(())
    }

    async fn rewrite_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> Result<(), NotifyError> {
        self.maybe_fail().await?;
        self.rewrites.write().await.push(RecordedRewrite {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }
}
