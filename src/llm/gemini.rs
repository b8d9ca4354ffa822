use async_trait::async_trait;
use path_core::{PathError, PathGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_keys: Vec<String>,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Google Gemini `generateContent` backend.
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, PathError> {
        if config.api_keys.is_empty() {
            return Err(PathError::invalid_config("missing Google API key"));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                PathError::invalid_config(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl PathGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, PathError> {
        let url = self.endpoint();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let mut last_error: Option<PathError> = None;
        for (index, key) in self.config.api_keys.iter().enumerate() {
            let response = match self
                .client
                .post(&url)
                .header("x-goog-api-key", key)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    last_error = Some(PathError::generation(format!(
                        "gemini request failed: {err}"
                    )));
                    continue;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<response unavailable>".to_string());
                if status.as_u16() == 429 && index + 1 < self.config.api_keys.len() {
                    warn!(
                        target: "gemini",
                        attempt = index + 1,
                        remaining = self.config.api_keys.len() - index - 1,
                        "Gemini rate limited path request; switching API key"
                    );
                    last_error = Some(PathError::generation(format!(
                        "gemini rate limited: {text}"
                    )));
                    continue;
                }
                return Err(PathError::generation(format!(
                    "gemini returned {}: {}",
                    status, text
                )));
            }

            let response: GenerateContentResponse = response.json().await.map_err(|err| {
                PathError::generation(format!("gemini response invalid: {err}"))
            })?;
            return response.into_text();
        }

        Err(last_error
            .unwrap_or_else(|| PathError::generation("Gemini request exhausted all API keys")))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, PathError> {
        if let Some(reason) = self.prompt_feedback.and_then(|fb| fb.block_reason) {
            return Err(PathError::generation(format!(
                "gemini blocked the prompt: {reason}"
            )));
        }
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PathError::generation("gemini response has no candidates"))?;
        if let Some(reason) = candidate.finish_reason.as_deref() {
            debug!(target: "gemini", finish_reason = reason, "gemini candidate finished");
        }
        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(PathError::generation("gemini response missing text"));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    fn parse(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).expect("response")
    }

    #[test]
    fn joins_candidate_parts() {
        let text = parse(json!({
            "candidates": [{
                "content": {"parts": [{"text": "```json\n{"}, {"text": "}\n```"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }))
        .into_text()
        .expect("text");
        assert_eq!(text, "```json\n{}\n```");
    }

    #[test]
    fn blocked_or_empty_responses_fail() {
        let err = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}))
            .into_text()
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        assert!(parse(json!({"candidates": []})).into_text().is_err());
        assert!(parse(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]}))
            .into_text()
            .is_err());
    }

    #[test]
    fn request_uses_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi".into() }],
            }],
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
    }

    async fn fake_gemini() -> String {
        async fn handler(
            Path(target): Path<String>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            let key = headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if key == "exhausted" {
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "quota"}})),
                );
            }
            if key != "good" {
                return (StatusCode::FORBIDDEN, Json(json!({"error": {"message": "bad key"}})));
            }
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default();
            (
                StatusCode::OK,
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": format!("{target}|{prompt}")}]}}]
                })),
            )
        }

        let app = Router::new().route("/v1beta/models/:target", post(handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/")
    }

    fn generator(api_base: String, keys: &[&str]) -> GeminiGenerator {
        GeminiGenerator::new(GeminiConfig {
            api_keys: keys.iter().map(|key| key.to_string()).collect(),
            model: "gemini-test".into(),
            api_base,
            temperature: 0.7,
            timeout: Duration::from_secs(5),
        })
        .expect("generator")
    }

    #[tokio::test]
    async fn posts_prompt_to_model_endpoint() {
        let base = fake_gemini().await;
        let text = generator(base, &["exhausted", "good"])
            .generate("ruta")
            .await
            .expect("text");
        assert_eq!(text, "gemini-test:generateContent|ruta");
    }

    #[tokio::test]
    async fn forbidden_key_is_fatal() {
        let base = fake_gemini().await;
        let err = generator(base, &["bad", "good"])
            .generate("ruta")
            .await
            .unwrap_err();
        assert!(matches!(err, PathError::Generation(ref msg) if msg.contains("403")));
    }

    #[test]
    fn requires_a_key() {
        let result = GeminiGenerator::new(GeminiConfig {
            api_keys: Vec::new(),
            model: "m".into(),
            api_base: "http://127.0.0.1:1".into(),
            temperature: 0.0,
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(PathError::InvalidConfig(_))));
    }
}
