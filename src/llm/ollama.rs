use crate::llm::client::{LLMClient, ModelParams};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, request::ChatMessageRequest},
    models::ModelOptions,
};

const DEFAULT_OLLAMA_PORT: u16 = 11434;

pub struct OllamaClient {
    client: Ollama,
    model: String,
    temperature: Option<f32>,
    num_predict: Option<i32>,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: String) -> Result<Self> {
        Self::with_params(base_url, model, ModelParams::default())
    }

    pub fn with_params(base_url: &str, model: String, params: ModelParams) -> Result<Self> {
        let (host, port) = split_base_url(base_url)?;
        let client = Ollama::new(host, port);
        let num_predict = params
            .max_tokens
            .map(|max_tokens| {
                i32::try_from(max_tokens).map_err(|_| {
                    AppError::Configuration(format!(
                        "max_tokens {} is too large for Ollama (limit {})",
                        max_tokens,
                        i32::MAX
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            client,
            model,
            temperature: params.temperature,
            num_predict,
        })
    }

    fn options(&self) -> ModelOptions {
        let mut options = ModelOptions::default();
        if let Some(temperature) = self.temperature {
            options = options.temperature(temperature);
        }
        if let Some(num_predict) = self.num_predict {
            options = options.num_predict(num_predict);
        }
        options
    }
}

/// Splits `http://host:port` into the `(scheme://host, port)` pair `Ollama::new` expects.
fn split_base_url(base_url: &str) -> Result<(String, u16)> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| AppError::Configuration(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| AppError::Configuration(format!("Ollama URL '{}' has no host", base_url)))?;
    let port = url.port().unwrap_or(DEFAULT_OLLAMA_PORT);

    Ok((format!("{}://{}", url.scheme(), host), port))
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let messages = vec![
            ChatMessage::system(system.to_string()),
            ChatMessage::user(prompt.to_string()),
        ];

        let request =
            ChatMessageRequest::new(self.model.clone(), messages).options(self.options());

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        Ok(response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
