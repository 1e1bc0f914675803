//! HTTP text-generation provider.
//!
//! Talks to any endpoint that accepts `{message, max_tokens, temperature}`
//! with a bearer token and answers with a JSON object carrying a
//! `response` field. Every transport problem, non-2xx status, or
//! malformed payload is absorbed into a failed [`ProviderReply`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Provider, ProviderReply};

/// Placeholder endpoint used when no URL is configured.
pub const DEFAULT_API_URL: &str = "https://api.example.com/v1/chat";

/// Hard cap on one delegation round trip. Past this the attempt counts
/// as failed and the caller answers locally.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const TRANSPORT_APOLOGY: &str = "Desculpe, não consegui processar sua solicitação agora.";
const MALFORMED_APOLOGY: &str = "Recebi uma resposta inválida do servidor.";

#[derive(Debug, Error)]
enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response payload")]
    MalformedPayload,
}

pub struct HttpProvider {
    client: Client,
    api_key: String,
    api_url: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    message: &'a str,
    max_tokens: u32,
    temperature: f32,
}

impl HttpProvider {
    pub fn new(
        api_key: &str,
        api_url: &str,
        max_tokens: u32,
        temperature: f32,
        client: Client,
    ) -> Self {
        debug!(url = api_url, "Initialized HTTP provider");
        Self {
            client,
            api_key: api_key.to_string(),
            api_url: api_url.to_string(),
            max_tokens,
            temperature,
        }
    }

    async fn request(&self, message: &str) -> Result<(String, Value), ProviderError> {
        let body = GenerateRequest {
            message,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let payload = response.text().await?;
        let value: Value =
            serde_json::from_str(&payload).map_err(|_| ProviderError::MalformedPayload)?;

        let text = value
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or("Sem resposta da API")
            .to_string();

        Ok((text, value))
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn generate(&self, message: &str) -> ProviderReply {
        debug!(url = %self.api_url, "Sending generation request");

        match self.request(message).await {
            Ok((text, raw)) => ProviderReply::ok(text, raw),
            Err(e) => {
                warn!(error = %e, "Delegation failed, caller answers locally");
                let apology = match e {
                    ProviderError::MalformedPayload => MALFORMED_APOLOGY,
                    _ => TRANSPORT_APOLOGY,
                };
                ProviderReply::failed(apology)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_failed_reply() {
        // Reserved TEST-NET address: the connection attempt fails fast
        // and must come back as success == false, never as a panic.
        let provider = HttpProvider::new(
            "test-key",
            "http://192.0.2.1:1/v1/chat",
            150,
            0.7,
            Client::builder()
                .timeout(Duration::from_millis(500))
                .build()
                .unwrap(),
        );

        let reply = provider.generate("olá").await;
        assert!(!reply.success);
        assert_eq!(reply.text, TRANSPORT_APOLOGY);
        assert!(reply.raw.is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            message: "oi",
            max_tokens: 150,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "oi");
        assert_eq!(json["max_tokens"], 150);
        let temperature = json["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }
}
