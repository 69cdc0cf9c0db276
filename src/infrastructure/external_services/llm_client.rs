use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::answer_synthesizer::{
    AnswerSynthesisError, AnswerSynthesizer, SynthesisPromptStyle, SynthesizedAnswer,
};
use crate::domain::value_objects::DocumentType;

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct RawAnswer {
    answer: String,
    #[serde(default)]
    justification: String,
    #[serde(default)]
    matched_clauses: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    pub service_url: String,
    pub api_key: String,
    pub model: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl LlmClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let service_url =
            env::var("LLM_SERVICE_URL").map_err(|_| "LLM_SERVICE_URL not set".to_string())?;
        let api_key = env::var("LLM_API_KEY").map_err(|_| "LLM_API_KEY not set".to_string())?;
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Self {
            service_url,
            api_key,
            model,
            max_retries: 3,
            timeout_secs: 60,
            backoff_factor: 1.5,
        })
    }
}

/// Chat-completions client that turns retrieved chunks into a structured
/// answer. Network failures are retried with backoff; a response that
/// does not parse is NOT retried here, that decision belongs to the
/// orchestrator's single strict-prompt retry.
pub struct HttpAnswerSynthesizer {
    client: Client,
    config: LlmClientConfig,
}

impl HttpAnswerSynthesizer {
    pub fn new(config: LlmClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = LlmClientConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, AnswerSynthesisError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.0,
        };

        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(content) => return Ok(content),
                Err(error) => {
                    if attempts > self.config.max_retries {
                        return Err(error);
                    }
                    let backoff = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tracing::warn!(
                        "LLM request failed (attempt {}): {}; retrying in {:?}",
                        attempts,
                        error,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn execute_request(&self, request: &ChatRequest) -> Result<String, AnswerSynthesisError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnswerSynthesisError::Timeout(e.to_string())
                } else {
                    AnswerSynthesisError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(AnswerSynthesisError::ApiError(format!(
                "LLM service returned {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnswerSynthesisError::ApiError(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AnswerSynthesisError::ApiError("LLM returned no choices".to_string())
            })
    }
}

fn system_prompt(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::PolicyWording => {
            "You are an insurance policy analyst. Answer strictly from the supplied \
             policy excerpts, citing the exact clauses that support your answer."
        }
        DocumentType::Legal => {
            "You are a contract analyst. Answer strictly from the supplied contract \
             excerpts, citing the exact clauses that support your answer."
        }
        DocumentType::Financial => {
            "You are a financial document analyst. Answer strictly from the supplied \
             excerpts, citing the figures and statements that support your answer."
        }
        DocumentType::Technical => {
            "You are a technical documentation analyst. Answer strictly from the \
             supplied excerpts, citing the sections that support your answer."
        }
        DocumentType::Medical => {
            "You are a medical records analyst. Answer strictly from the supplied \
             excerpts, citing the entries that support your answer."
        }
        DocumentType::Unknown => {
            "You are a document analyst. Answer strictly from the supplied excerpts, \
             citing the passages that support your answer."
        }
    }
}

fn user_prompt(question: &str, context_chunks: &[String], style: SynthesisPromptStyle) -> String {
    let context = context_chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[{}] {}", i + 1, chunk))
        .collect::<Vec<_>>()
        .join("\n\n");

    let format_instruction = match style {
        SynthesisPromptStyle::Standard => {
            "Respond as a JSON object with keys \"answer\", \"justification\" and \
             \"matched_clauses\" (an array of the quoted clauses you relied on)."
        }
        SynthesisPromptStyle::Strict => {
            "Respond with ONLY a JSON object and nothing else. No prose, no markdown \
             fences. Shape: {\"answer\": string, \"justification\": string, \
             \"matched_clauses\": [string]}. Any other output is an error."
        }
    };

    format!(
        "Excerpts:\n{}\n\nQuestion: {}\n\n{}",
        context, question, format_instruction
    )
}

/// Models wrap JSON in markdown fences often enough that stripping them
/// is cheaper than a retry round-trip.
fn parse_structured_answer(content: &str) -> Result<SynthesizedAnswer, AnswerSynthesisError> {
    let trimmed = content.trim();
    let without_fences = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.strip_suffix("```").unwrap_or(s))
        .unwrap_or(trimmed)
        .trim();

    let raw: RawAnswer = serde_json::from_str(without_fences)
        .map_err(|e| AnswerSynthesisError::UnparsableResponse(e.to_string()))?;

    Ok(SynthesizedAnswer {
        answer: raw.answer,
        justification: raw.justification,
        matched_clauses: raw.matched_clauses,
    })
}

#[async_trait]
impl AnswerSynthesizer for HttpAnswerSynthesizer {
    async fn synthesize(
        &self,
        question: &str,
        context_chunks: &[String],
        document_type: DocumentType,
        style: SynthesisPromptStyle,
    ) -> Result<SynthesizedAnswer, AnswerSynthesisError> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: system_prompt(document_type).to_string(),
            },
            ChatMessage {
                role: "user",
                content: user_prompt(question, context_chunks, style),
            },
        ];

        let content = self.complete(messages).await?;
        parse_structured_answer(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let answer = parse_structured_answer(
            r#"{"answer": "Yes", "justification": "Clause 4.2", "matched_clauses": ["Clause 4.2: knee surgery is covered"]}"#,
        )
        .unwrap();

        assert_eq!(answer.answer, "Yes");
        assert_eq!(answer.matched_clauses.len(), 1);
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "```json\n{\"answer\": \"No\", \"justification\": \"Excluded\"}\n```";
        let answer = parse_structured_answer(content).unwrap();

        assert_eq!(answer.answer, "No");
        assert!(answer.matched_clauses.is_empty());
    }

    #[test]
    fn test_parse_prose_fails() {
        let error = parse_structured_answer("The policy covers knee surgery.").unwrap_err();
        assert!(error.is_unparsable());
    }

    #[test]
    fn test_missing_answer_key_fails() {
        let error = parse_structured_answer(r#"{"justification": "because"}"#).unwrap_err();
        assert!(error.is_unparsable());
    }

    #[test]
    fn test_prompt_templates_vary_by_type() {
        assert!(system_prompt(DocumentType::PolicyWording).contains("insurance"));
        assert!(system_prompt(DocumentType::Medical).contains("medical"));
        assert_ne!(
            system_prompt(DocumentType::Legal),
            system_prompt(DocumentType::Unknown)
        );
    }

    #[test]
    fn test_strict_prompt_demands_json_only() {
        let prompt = user_prompt(
            "Does it cover?",
            &["clause".to_string()],
            SynthesisPromptStyle::Strict,
        );
        assert!(prompt.contains("ONLY a JSON object"));
    }
}
