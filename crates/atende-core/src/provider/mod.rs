//! External text-generation provider trait.
//!
//! The assistant only delegates to a provider when its local confidence
//! is too low, and it must survive any provider misbehavior. Failure is
//! therefore part of the return value: `generate` is infallible at the
//! signature level and reports problems through [`ProviderReply::success`],
//! never by propagating an error to the caller.

pub mod http;

use async_trait::async_trait;

/// Outcome of one delegation attempt.
///
/// On `success == false` the `text` field carries an apology string for
/// diagnostics only — the caller answers locally instead of using it.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub success: bool,
    pub text: String,
    /// The raw response document, when one was received.
    pub raw: Option<serde_json::Value>,
}

impl ProviderReply {
    pub fn ok(text: String, raw: serde_json::Value) -> Self {
        Self {
            success: true,
            text,
            raw: Some(raw),
        }
    }

    pub fn failed(text: &str) -> Self {
        Self {
            success: false,
            text: text.to_string(),
            raw: None,
        }
    }
}

/// A backend that can turn a user message into generated text.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, message: &str) -> ProviderReply;
}
