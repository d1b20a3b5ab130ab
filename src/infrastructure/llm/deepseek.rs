use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, Usage,
};
use crate::infrastructure::logging::truncate_for_log;

const LOG_PREVIEW_LEN: usize = 2_000;

/// DeepSeek chat-completions provider (OpenAI-compatible wire format)
#[derive(Debug)]
pub struct DeepseekProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> DeepseekProvider<C> {
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<DeepseekMessage> = request
            .messages
            .iter()
            .map(DeepseekMessage::from_domain)
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    /// Extract the first choice's text.
    ///
    /// Only a `choices` value that is neither a list nor null is an error. Every
    /// other field is optional: a missing or mistyped value is skipped and the
    /// reply text falls back to an empty string.
    fn parse_response(&self, json: Value) -> Result<LlmResponse, DomainError> {
        let first_choice = match json.get("choices") {
            None | Some(Value::Null) => None,
            Some(Value::Array(choices)) => choices.first(),
            Some(other) => {
                return Err(DomainError::provider(
                    "deepseek",
                    format!(
                        "Failed to parse response: expected `choices` to be a list, got {}",
                        other
                    ),
                ));
            }
        };

        let content = first_choice
            .and_then(|c| c.pointer("/message/content"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut llm_response = LlmResponse::new(
            string_field(&json, "id"),
            string_field(&json, "model"),
            Message::assistant(content),
        );

        if let Some(reason) = first_choice
            .and_then(|c| c.get("finish_reason"))
            .and_then(Value::as_str)
        {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(reason));
        }

        if let Some(usage) = json.get("usage").filter(|u| u.is_object()) {
            llm_response = llm_response.with_usage(Usage::new(
                token_count(usage, "prompt_tokens"),
                token_count(usage, "completion_tokens"),
            ));
        }

        Ok(llm_response)
    }
}

fn string_field(json: &Value, key: &str) -> String {
    json.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn token_count(usage: &Value, key: &str) -> u32 {
    usage
        .get(key)
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or_default()
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for DeepseekProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await?;

        debug!(
            provider = "deepseek",
            raw_response = %truncate_for_log(&response.to_string(), LOG_PREVIEW_LEN),
            "Provider raw response"
        );

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "deepseek"
    }
}

// DeepSeek API types

#[derive(Debug, Serialize)]
struct DeepseekMessage {
    role: &'static str,
    content: String,
}

impl DeepseekMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use serde_json::json;

    const BASE_URL: &str = "https://api.deepseek.com/v1";
    const TEST_URL: &str = "https://api.deepseek.com/v1/chat/completions";

    fn request() -> LlmRequest {
        LlmRequest::builder()
            .user("hello")
            .max_tokens(500)
            .temperature(0.3)
            .build()
    }

    #[tokio::test]
    async fn test_deepseek_chat() {
        let mock_response = json!({
            "id": "chatcmpl-123",
            "model": "deepseek-chat",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "hi there" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6 }
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        let response = provider.chat("deepseek-chat", request()).await.unwrap();

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.model, "deepseek-chat");
        assert_eq!(response.content(), "hi there");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage, Some(Usage::new(4, 2)));
    }

    #[tokio::test]
    async fn test_deepseek_request_payload() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({ "choices": [] }));
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        provider.chat("deepseek-chat", request()).await.unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);

        let recorded = &requests[0];
        assert_eq!(recorded.url, TEST_URL);
        assert!(recorded
            .headers
            .contains(&("Authorization".to_string(), "Bearer sk-test".to_string())));

        let body = &recorded.body;
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(
            body["messages"],
            json!([{ "role": "user", "content": "hello" }])
        );
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!(body.get("stream").is_none());
    }

    #[tokio::test]
    async fn test_deepseek_empty_choices() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({ "choices": [] }));
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        let response = provider.chat("deepseek-chat", request()).await.unwrap();

        assert_eq!(response.content(), "");
        assert!(response.finish_reason.is_none());
    }

    #[tokio::test]
    async fn test_deepseek_missing_fields_yield_empty_content() {
        let bodies = [
            json!({}),
            json!({ "choices": [{}] }),
            json!({ "choices": [{ "message": {} }] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
        ];

        for body in bodies {
            let client = MockHttpClient::new().with_response(TEST_URL, body.clone());
            let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

            let response = provider.chat("deepseek-chat", request()).await.unwrap();
            assert_eq!(response.content(), "", "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_deepseek_malformed_choices() {
        let client =
            MockHttpClient::new().with_response(TEST_URL, json!({ "choices": "unexpected" }));
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        let err = provider.chat("deepseek-chat", request()).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_deepseek_null_choices_yield_empty_content() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({ "choices": null }));
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        let response = provider.chat("deepseek-chat", request()).await.unwrap();
        assert_eq!(response.content(), "");
    }

    #[tokio::test]
    async fn test_deepseek_ignores_mistyped_metadata() {
        let bodies = [
            json!({ "id": 42, "choices": [{ "message": { "content": "hi" } }] }),
            json!({ "model": ["x"], "choices": [{ "message": { "content": "hi" } }] }),
            json!({ "choices": [{ "message": { "content": "hi" }, "finish_reason": 7 }] }),
            json!({
                "choices": [{ "message": { "content": "hi" } }],
                "usage": { "prompt_tokens": null, "completion_tokens": "2" }
            }),
            json!({ "choices": [{ "message": { "content": "hi" } }], "usage": "n/a" }),
        ];

        for body in bodies {
            let client = MockHttpClient::new().with_response(TEST_URL, body.clone());
            let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

            let response = provider.chat("deepseek-chat", request()).await.unwrap();
            assert_eq!(response.content(), "hi", "body: {}", body);
        }
    }

    #[tokio::test]
    async fn test_deepseek_mistyped_fields_fall_back() {
        let body = json!({
            "id": 42,
            "choices": [{ "message": { "content": 5 }, "finish_reason": 7 }],
            "usage": { "prompt_tokens": null, "completion_tokens": 2 }
        });
        let client = MockHttpClient::new().with_response(TEST_URL, body);
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        let response = provider.chat("deepseek-chat", request()).await.unwrap();

        assert_eq!(response.id, "");
        assert_eq!(response.content(), "");
        assert!(response.finish_reason.is_none());
        assert_eq!(response.usage, Some(Usage::new(0, 2)));
    }

    #[tokio::test]
    async fn test_deepseek_huge_token_counts_saturate() {
        let body = json!({
            "choices": [{ "message": { "content": "hi" } }],
            "usage": { "prompt_tokens": 4294967295u64, "completion_tokens": 1, "total_tokens": 1 }
        });
        let client = MockHttpClient::new().with_response(TEST_URL, body);
        let provider = DeepseekProvider::with_base_url(client, "sk-test", BASE_URL);

        let response = provider.chat("deepseek-chat", request()).await.unwrap();
        let usage = response.usage.unwrap();

        assert_eq!(usage.prompt_tokens, u32::MAX);
        assert_eq!(usage.total_tokens, u32::MAX);
    }

    #[tokio::test]
    async fn test_deepseek_error_handling() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 401 Unauthorized");
        let provider = DeepseekProvider::with_base_url(client, "invalid-key", BASE_URL);

        let result = provider.chat("deepseek-chat", request()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deepseek_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/chat/completions";
        let mock_response = json!({
            "choices": [{ "message": { "content": "Custom response" } }]
        });

        let client = MockHttpClient::new().with_response(custom_url, mock_response);
        let provider =
            DeepseekProvider::with_base_url(client, "sk-test", "http://localhost:8080/v1/");

        let response = provider.chat("deepseek-chat", request()).await.unwrap();
        assert_eq!(response.content(), "Custom response");
        assert_eq!(response.id, "");
    }
}
