use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::config::RemoteConfig;
use crate::predictor::{CompletionBackend, CompletionError};

pub struct GeminiBackend {
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_output_tokens: u32,
    temperature: f32,
    client: Client,
}

impl GeminiBackend {
    /// `api_key` may be `None` when `endpoint` is a proxy that injects the key
    /// on its side.
    pub fn new(config: RemoteConfig, api_key: Option<String>) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(anyhow!("remote.backend is gemini but remote.model is empty"));
        }
        if config.endpoint.trim().is_empty() {
            return Err(anyhow!(
                "remote.backend is gemini but remote.endpoint is empty"
            ));
        }

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model,
            api_key,
            max_output_tokens: config.max_output_tokens.max(1),
            temperature: config.temperature,
            client: Client::builder()
                .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
                .build()
                .context("failed to build HTTP client")?,
        })
    }

    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, text: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(text),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
                candidate_count: 1,
            },
        }
    }

    async fn run_generate(&self, text: &str) -> Result<GenerateResponse, CompletionError> {
        let mut request = self
            .client
            .post(self.build_url())
            .json(&self.build_request(text));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        // Errors carry the request URL, which includes the key.
        let response = request
            .send()
            .await
            .map_err(|error| CompletionError::Network(error.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| CompletionError::Network(error.without_url().to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                code: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|error| CompletionError::Malformed(error.to_string()))
    }
}

pub fn build_prompt(text: &str) -> String {
    format!(
        "Complete this text with the most likely next word only. Text: \"{text}\". Respond with just one word that would naturally follow."
    )
}

/// Reads `candidates[0].content.parts[0].text`; nothing else in the body
/// matters.
fn first_candidate_text(response: GenerateResponse) -> Result<String, CompletionError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or(CompletionError::MissingCandidate)
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, text: &str) -> Result<String, CompletionError> {
        let response = self.run_generate(text).await?;
        first_candidate_text(response)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    fn backend(endpoint: &str, api_key: Option<&str>) -> GeminiBackend {
        let config = RemoteConfig {
            endpoint: endpoint.to_string(),
            request_timeout_ms: 2000,
            ..RemoteConfig::default()
        };
        GeminiBackend::new(config, api_key.map(str::to_string)).unwrap()
    }

    fn parse(raw: &str) -> Result<String, CompletionError> {
        first_candidate_text(serde_json::from_str(raw).unwrap())
    }

    /// Answers exactly one HTTP request with `status` and `body`, and hands back
    /// the raw request it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            request
        });
        (format!("http://{addr}/v1beta"), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let client = backend("https://example.test/v1beta/", Some("k"));
        let body = serde_json::to_value(client.build_request("see you")).unwrap();

        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Complete this text with the most likely next word only. Text: \"see you\". Respond with just one word that would naturally follow."
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 10);
        assert_eq!(body["generationConfig"]["candidateCount"], 1);
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn url_targets_model_without_key() {
        let client = backend("https://example.test/v1beta/", Some("secret"));
        let url = client.build_url();
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!url.contains("secret"));
    }

    #[test]
    fn reads_first_candidate_only() {
        let raw = r#"{"candidates":[
            {"content":{"parts":[{"text":"Tomorrow."},{"text":"ignored"}]}},
            {"content":{"parts":[{"text":"second"}]}}
        ]}"#;
        assert_eq!(parse(raw).unwrap(), "Tomorrow.");
    }

    #[test]
    fn missing_fields_are_reported() {
        for raw in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ] {
            assert!(
                matches!(parse(raw), Err(CompletionError::MissingCandidate)),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_empty_model() {
        let config = RemoteConfig {
            model: " ".to_string(),
            ..RemoteConfig::default()
        };
        assert!(GeminiBackend::new(config, None).is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let client = backend("http://127.0.0.1:1/v1beta", Some("secret"));
        match client.complete("hello").await {
            Err(CompletionError::Network(message)) => assert!(!message.contains("secret")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "{}").await;
        let client = backend(&endpoint, Some("sek"));

        match client.complete("hello").await {
            Err(CompletionError::Status { code, body }) => {
                assert_eq!(code, 503);
                assert_eq!(body, "{}");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let request = server.await.unwrap();
        assert_eq!(
            request_line(&request),
            "POST /v1beta/models/gemini-1.5-flash:generateContent?key=sek HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn success_body_yields_first_candidate() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Tomorrow."}]}}]}"#,
        )
        .await;
        let client = backend(&endpoint, Some("sek"));

        assert_eq!(client.complete("see you").await.unwrap(), "Tomorrow.");

        let request = server.await.unwrap();
        assert!(request.contains("\"candidateCount\":1"));
        assert!(request.contains("Text: \\\"see you\\\"."));
    }

    #[tokio::test]
    async fn proxy_mode_omits_key_parameter() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"there"}]}}]}"#,
        )
        .await;
        let client = backend(&endpoint, None);

        assert_eq!(client.complete("hello").await.unwrap(), "there");

        let request = server.await.unwrap();
        assert_eq!(
            request_line(&request),
            "POST /v1beta/models/gemini-1.5-flash:generateContent HTTP/1.1"
        );
        assert!(!request.contains("key="));
    }

    #[tokio::test]
    async fn unparsable_success_body_is_malformed() {
        let (endpoint, server) = serve_once("200 OK", "not json").await;
        let client = backend(&endpoint, None);

        assert!(matches!(
            client.complete("hello").await,
            Err(CompletionError::Malformed(_))
        ));
        server.await.unwrap();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_request_embeds_text_verbatim(text in ".*") {
            let client = backend("https://example.test/v1beta", None);
            let body = serde_json::to_value(client.build_request(&text)).unwrap();

            prop_assert_eq!(body["contents"].as_array().map(Vec::len), Some(1));
            prop_assert_eq!(body["contents"][0]["parts"].as_array().map(Vec::len), Some(1));
            let expected = build_prompt(&text);
            prop_assert_eq!(
                body["contents"][0]["parts"][0]["text"].as_str(),
                Some(expected.as_str())
            );
            prop_assert_eq!(body["generationConfig"]["candidateCount"].as_u64(), Some(1));
        }

        #[test]
        fn prop_first_candidate_wins(
            first in "[A-Za-z .!?]{1,20}",
            rest in proptest::collection::vec("[a-z]{1,8}", 0..4),
        ) {
            let mut candidates =
                vec![serde_json::json!({"content": {"parts": [{"text": first.as_str()}]}})];
            candidates.extend(
                rest.iter()
                    .map(|word| serde_json::json!({"content": {"parts": [{"text": word}]}})),
            );
            let response: GenerateResponse =
                serde_json::from_value(serde_json::json!({ "candidates": candidates })).unwrap();

            prop_assert_eq!(first_candidate_text(response).unwrap(), first);
        }
    }
}
