//! Reasoning pipeline.
//!
//! [`Reasoner`] is the capability the chat handler depends on: given the turns
//! exchanged so far and a new message, produce the assistant's reply.
//! [`ChainOfThought`] is the production implementation. It renders the history
//! into a context block, asks the model to reason step by step before
//! answering, and returns only the final answer.

use crate::llm::LLMClient;
use crate::types::{AppError, Result, Turn};
use async_trait::async_trait;
use tracing::debug;

/// Marker the model is asked to put in front of its final answer.
pub const ANSWER_MARKER: &str = "Answer:";

/// Marker the model is asked to put in front of its intermediate reasoning.
pub const REASONING_MARKER: &str = "Reasoning:";

/// Maps (prior turns, new message) to a response.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Generate the assistant's response to `message` given the prior turns.
    async fn respond(&self, history: &[Turn], message: &str) -> Result<String>;

    /// Identifier of the model behind this reasoner, for logging.
    fn model_name(&self) -> &str;
}

/// Chain-of-thought reasoner over any [`LLMClient`].
pub struct ChainOfThought {
    llm: Box<dyn LLMClient>,
}

impl ChainOfThought {
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You are a helpful conversational assistant.

You receive the previous conversation as context and the user's current question.
Think through the question step by step, taking all previous context into account.

Respond in exactly this format:
{REASONING_MARKER} <your step-by-step reasoning>
{ANSWER_MARKER} <your final answer to the user>"#
        )
    }
}

/// Renders turns as `role: content` lines, oldest first.
pub fn format_context(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| turn.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the user prompt that carries the context and the current question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Previous conversation:\n{}\n\nCurrent question: {}\n\nPlease consider all previous context when responding.",
        context, question
    )
}

/// Extracts the final answer from a chain-of-thought completion.
///
/// Returns the text after the last answer marker. Completions that ignore the
/// format are returned whole, minus a leading reasoning marker.
pub fn extract_answer(completion: &str) -> String {
    match completion.rfind(ANSWER_MARKER) {
        Some(idx) => completion[idx + ANSWER_MARKER.len()..].trim().to_string(),
        None => completion
            .trim()
            .trim_start_matches(REASONING_MARKER)
            .trim()
            .to_string(),
    }
}

#[async_trait]
impl Reasoner for ChainOfThought {
    async fn respond(&self, history: &[Turn], message: &str) -> Result<String> {
        let context = format_context(history);
        debug!(
            context_len = context.len(),
            turns = history.len(),
            model = self.llm.model_name(),
            "Processing message with full context"
        );

        let prompt = build_prompt(&context, message);
        let completion = self
            .llm
            .generate_with_system(&self.system_prompt(), &prompt)
            .await?;

        let answer = extract_answer(&completion);
        if answer.is_empty() {
            return Err(AppError::LLM("Model returned an empty answer".to_string()));
        }

        Ok(answer)
    }

    fn model_name(&self) -> &str {
        self.llm.model_name()
    }
}
