//! The assistant: scoring, routing, and guaranteed local fallback.
//!
//! Per message the flow is fixed:
//! 1. score the message into `(intent, confidence)`;
//! 2. if no provider is wired, or confidence clears the threshold,
//!    answer from the local catalog;
//! 3. otherwise delegate; any failed delegation falls back to the
//!    local catalog — a delegation problem is never a user-visible error;
//! 4. record the user turn and the assistant turn, in that order.
//!
//! Nothing about the chosen path survives the call.

pub mod history;

use crate::catalog::Catalog;
use crate::intent::IntentScorer;
use crate::provider::Provider;
use crate::selector::ResponseSelector;
use history::{ConversationLog, Role, Turn};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

pub struct Assistant {
    scorer: IntentScorer,
    selector: ResponseSelector,
    provider: Option<Box<dyn Provider>>,
    confidence_threshold: f32,
    history: ConversationLog,
}

impl Assistant {
    /// Assistant with optional delegation. `provider: None` means every
    /// message is answered from the catalog.
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Option<Box<dyn Provider>>,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            scorer: IntentScorer::new(Arc::clone(&catalog)),
            selector: ResponseSelector::new(catalog),
            provider,
            confidence_threshold,
            history: ConversationLog::new(),
        }
    }

    /// Local-only assistant, no delegation.
    pub fn local(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, None, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Swap in a seeded selector for deterministic reply draws.
    pub fn with_selector(mut self, selector: ResponseSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn delegation_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Process one message and return the reply.
    pub async fn process_message(&mut self, message: &str) -> String {
        let (intent, confidence) = self.scorer.score(message);
        info!(intent = intent.as_str(), confidence, "Routing message");

        let reply = match &self.provider {
            Some(provider) if confidence < self.confidence_threshold => {
                let outcome = provider.generate(message).await;
                if outcome.success {
                    debug!("Answering from provider");
                    outcome.text
                } else {
                    debug!("Provider failed, answering locally");
                    self.selector.select(intent)
                }
            }
            _ => self.selector.select(intent),
        };

        self.history.append(Turn::new(Role::User, message));
        self.history.append(Turn::new(Role::Assistant, &reply));

        reply
    }

    /// Read view of the transcript.
    pub fn history(&self) -> &[Turn] {
        self.history.history()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("Conversation history cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Intent;
    use crate::provider::ProviderReply;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider that counts invocations.
    struct ScriptedProvider {
        reply: ProviderReply,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn boxed(reply: ProviderReply) -> (Box<dyn Provider>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    reply,
                    calls: Arc::clone(&calls),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn generate(&self, _message: &str) -> ProviderReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin())
    }

    #[tokio::test]
    async fn test_local_assistant_never_delegates() {
        // No provider wired: even a zero-confidence message stays local.
        let catalog = catalog();
        let mut assistant = Assistant::local(Arc::clone(&catalog));

        let reply = assistant.process_message("mensagem sem gatilhos").await;
        assert!(catalog.replies(Intent::Default).contains(&reply));
    }

    #[tokio::test]
    async fn test_high_confidence_skips_the_provider() {
        let catalog = catalog();
        let (provider, calls) =
            ScriptedProvider::boxed(ProviderReply::ok("externa".into(), serde_json::json!({})));
        let mut assistant = Assistant::new(
            Arc::clone(&catalog),
            Some(provider),
            DEFAULT_CONFIDENCE_THRESHOLD,
        );

        // "oi" saturates to confidence 1.0, above any sane threshold.
        let reply = assistant.process_message("oi").await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(catalog.replies(Intent::Greeting).contains(&reply));
    }

    #[tokio::test]
    async fn test_low_confidence_uses_provider_answer() {
        let catalog = catalog();
        let (provider, calls) = ScriptedProvider::boxed(ProviderReply::ok(
            "Resposta gerada externamente.".into(),
            serde_json::json!({"response": "Resposta gerada externamente."}),
        ));
        let mut assistant = Assistant::new(
            Arc::clone(&catalog),
            Some(provider),
            DEFAULT_CONFIDENCE_THRESHOLD,
        );

        let reply = assistant.process_message("mensagem sem gatilhos").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(reply, "Resposta gerada externamente.");
    }

    #[tokio::test]
    async fn test_failed_delegation_always_falls_back_locally() {
        let catalog = catalog();
        let (provider, calls) =
            ScriptedProvider::boxed(ProviderReply::failed("Desculpe, indisponível."));
        let mut assistant = Assistant::new(
            Arc::clone(&catalog),
            Some(provider),
            DEFAULT_CONFIDENCE_THRESHOLD,
        );

        // Fallback is total: every call lands in the local candidate set,
        // and the apology text never leaks through.
        for _ in 0..5 {
            let reply = assistant.process_message("mensagem sem gatilhos").await;
            assert!(catalog.replies(Intent::Default).contains(&reply));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_each_call_records_one_user_and_one_assistant_turn() {
        let catalog = catalog();
        let (provider, _) = ScriptedProvider::boxed(ProviderReply::failed("erro"));
        let mut assistant = Assistant::new(
            Arc::clone(&catalog),
            Some(provider),
            DEFAULT_CONFIDENCE_THRESHOLD,
        );

        let reply = assistant.process_message("mensagem sem gatilhos").await;

        let turns = assistant.history();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].message, "mensagem sem gatilhos");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].message, reply);
    }

    #[tokio::test]
    async fn test_history_is_ordered_across_calls() {
        let mut assistant = Assistant::local(catalog());

        assistant.process_message("oi").await;
        assistant.process_message("qual o preço?").await;

        let turns = assistant.history();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].message, "oi");
        assert_eq!(turns[2].message, "qual o preço?");
    }

    #[tokio::test]
    async fn test_seeded_selector_makes_replies_reproducible() {
        let catalog = catalog();
        let mut a = Assistant::local(Arc::clone(&catalog))
            .with_selector(ResponseSelector::with_seed(Arc::clone(&catalog), 9));
        let mut b = Assistant::local(Arc::clone(&catalog))
            .with_selector(ResponseSelector::with_seed(Arc::clone(&catalog), 9));

        for _ in 0..5 {
            assert_eq!(a.process_message("oi").await, b.process_message("oi").await);
        }
    }

    #[tokio::test]
    async fn test_clear_history() {
        let mut assistant = Assistant::local(catalog());
        assistant.process_message("oi").await;
        assert!(!assistant.history().is_empty());

        assistant.clear_history();
        assert!(assistant.history().is_empty());
    }
}
