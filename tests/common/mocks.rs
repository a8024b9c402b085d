//! Mock implementations for testing.
//!
//! Fake reasoners that stand in for the hosted model so the HTTP layer can be
//! exercised without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use parley::types::{AppError, Result, Turn};
use parley::Reasoner;
use std::sync::Arc;
use std::time::Duration;

/// Mock reasoner with configurable behaviour.
///
/// # Examples
///
/// ```ignore
/// // Answers "Echo: <message>"
/// let reasoner = MockReasoner::echo();
///
/// // Always answers the same text
/// let reasoner = MockReasoner::new("Hello!");
///
/// // Always fails as if the upstream model were down
/// let reasoner = MockReasoner::failing();
/// ```
#[derive(Clone)]
pub struct MockReasoner {
    reply: Reply,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[derive(Clone)]
enum Reply {
    Fixed(String),
    Echo,
    Fail,
}

/// What the reasoner saw on one invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub history: Vec<Turn>,
    pub message: String,
}

impl MockReasoner {
    /// Create a reasoner that always returns `response`.
    pub fn new(response: &str) -> Self {
        Self::with_reply(Reply::Fixed(response.to_string()))
    }

    /// Create a reasoner that answers `Echo: <message>`.
    pub fn echo() -> Self {
        Self::with_reply(Reply::Echo)
    }

    /// Create a reasoner that always returns an upstream error.
    pub fn failing() -> Self {
        Self::with_reply(Reply::Fail)
    }

    /// Sleep before answering, to widen race windows in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every invocation so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Reasoner for MockReasoner {
    async fn respond(&self, history: &[Turn], message: &str) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            history: history.to_vec(),
            message: message.to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Fixed(response) => Ok(response.clone()),
            Reply::Echo => Ok(format!("Echo: {}", message)),
            Reply::Fail => Err(AppError::LLM("Mock LLM failure".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
