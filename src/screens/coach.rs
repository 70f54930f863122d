use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use super::{AsyncOp, ScreenScope};
use crate::error::ApiError;
use crate::gateway::FitnessApi;
use crate::models::{ChatMessage, Sender};
use crate::state::AppState;

pub const GREETING: &str = "Hi! I'm your AI fitness coach. I'm here to help you with nutrition \
advice, workout tips, and motivation. How can I assist you today?";

pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again later.";

pub const QUICK_QUESTIONS: [&str; 5] = [
    "What should I eat for breakfast?",
    "How do I lose weight faster?",
    "Best exercises for beginners?",
    "How much protein do I need?",
    "Tips for staying motivated?",
];

/// Wall-clock now, bumped past `last` so the transcript stays strictly ordered.
fn next_timestamp(last: Option<OffsetDateTime>) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    match last {
        Some(last) if now <= last => last + Duration::milliseconds(1),
        _ => now,
    }
}

pub struct CoachScreen {
    api: Arc<dyn FitnessApi>,
    scope: ScreenScope,
    messages: Vec<ChatMessage>,
    input: String,
    reply: AsyncOp<String>,
}

impl CoachScreen {
    pub fn new(state: &AppState) -> Self {
        let mut screen = Self {
            api: state.api.clone(),
            scope: ScreenScope::new(),
            messages: Vec::new(),
            input: String::new(),
            reply: AsyncOp::Idle,
        };
        screen.push(Sender::Ai, GREETING.to_string());
        screen
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.reply.is_pending()
    }

    /// Send is disabled for blank input and while a reply is pending.
    pub fn can_send(&self) -> bool {
        !self.is_loading() && !self.input.trim().is_empty()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn use_quick_question(&mut self, index: usize) {
        if let Some(q) = QUICK_QUESTIONS.get(index) {
            self.input = (*q).to_string();
        }
    }

    fn push(&mut self, sender: Sender, content: String) {
        let timestamp = next_timestamp(self.messages.last().map(|m| m.timestamp));
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            content,
            sender,
            timestamp,
        });
    }

    /// Appends the user's message at once, then the coach's reply or an
    /// apology when the call fails.
    pub async fn send(&mut self) {
        if !self.can_send() {
            return;
        }
        let content = self.input.trim().to_string();
        let context = self.messages.clone();
        self.push(Sender::User, content.clone());
        self.input.clear();
        self.reply.begin();

        let result = self
            .scope
            .run(self.api.get_chat_response(&content, &context))
            .await;
        match &result {
            Ok(reply) => self.push(Sender::Ai, reply.clone()),
            Err(ApiError::Cancelled) => {}
            Err(e) => {
                warn!(error = %e, "coach reply failed");
                self.push(Sender::Ai, FALLBACK_REPLY.to_string());
            }
        }
        self.reply.settle(result);
    }
}
