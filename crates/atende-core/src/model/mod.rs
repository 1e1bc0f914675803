//! Pluggable model handlers and their registry.
//!
//! Defines the [`ModelHandler`] trait that all inference backends must
//! implement, plus the only implementation that exists today: a dummy
//! model with canned responses. Real backends are a deferred
//! integration point; the registry shape is what matters here.

use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::ModelConfig;

/// One inference result.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub text: String,
    pub confidence: f32,
}

/// Descriptive metadata about a registered model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub kind: String,
    pub name: String,
    pub is_loaded: bool,
}

/// A loadable inference backend.
pub trait ModelHandler: Send + Sync {
    fn load(&mut self) -> Result<()>;
    fn unload(&mut self);
    fn is_loaded(&self) -> bool;
    fn predict(&mut self, text: &str) -> Result<Prediction>;
    fn info(&self) -> ModelInfo;
}

/// Simulated model for tests and wiring checks. Answers from a
/// substring-keyed response table, no inference involved.
pub struct DummyModel {
    name: String,
    responses: HashMap<String, Vec<String>>,
    loaded: bool,
}

impl DummyModel {
    pub fn new(name: &str, responses: HashMap<String, Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            responses,
            loaded: false,
        }
    }
}

impl ModelHandler for DummyModel {
    fn load(&mut self) -> Result<()> {
        self.loaded = true;
        Ok(())
    }

    fn unload(&mut self) {
        self.loaded = false;
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn predict(&mut self, text: &str) -> Result<Prediction> {
        if !self.loaded {
            self.load()?;
        }

        let lower = text.to_lowercase();
        for (pattern, replies) in &self.responses {
            if lower.contains(pattern.as_str()) {
                if let Some(reply) = replies.first() {
                    return Ok(Prediction {
                        text: reply.clone(),
                        confidence: 0.95,
                    });
                }
            }
        }

        Ok(Prediction {
            text: "Isso é uma resposta simulada do modelo de teste.".into(),
            confidence: 0.7,
        })
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            kind: "dummy".into(),
            name: self.name.clone(),
            is_loaded: self.loaded,
        }
    }
}

/// Central registry for model handlers.
#[derive(Default)]
pub struct ModelManager {
    models: HashMap<String, Box<dyn ModelHandler>>,
    default_model: Option<String>,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. The first registered model becomes the
    /// default unless a later one claims it explicitly.
    pub fn add_model(&mut self, id: &str, handler: Box<dyn ModelHandler>, set_as_default: bool) {
        self.models.insert(id.to_string(), handler);
        if set_as_default || self.default_model.is_none() {
            self.default_model = Some(id.to_string());
        }
    }

    /// Run a prediction on the named model, or the default one.
    pub fn predict(&mut self, text: &str, model_id: Option<&str>) -> Result<Prediction> {
        let id = model_id
            .map(|s| s.to_string())
            .or_else(|| self.default_model.clone());

        let Some(id) = id else {
            bail!("no model registered");
        };
        let Some(handler) = self.models.get_mut(&id) else {
            bail!("model not found: {id}");
        };

        handler.predict(text)
    }

    /// Registered models with their metadata, default first flag included.
    pub fn list_models(&self) -> Vec<(String, bool, ModelInfo)> {
        self.models
            .iter()
            .map(|(id, handler)| {
                let is_default = self.default_model.as_deref() == Some(id.as_str());
                (id.clone(), is_default, handler.info())
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Build a manager from configured models. Unknown kinds are skipped
    /// with a warning; an empty result falls back to a built-in test
    /// model so the manager is never unusable.
    pub fn from_config(models: &HashMap<String, ModelConfig>) -> Self {
        let mut manager = Self::new();

        for (id, cfg) in models {
            match cfg.kind.as_str() {
                "dummy" => {
                    let model = DummyModel::new(&cfg.name, cfg.responses.clone());
                    manager.add_model(id, Box::new(model), cfg.default);
                }
                other => {
                    warn!(model = id.as_str(), kind = other, "Unknown model kind, skipping");
                }
            }
        }

        if manager.is_empty() {
            info!("No usable model configured, registering built-in test model");
            let mut responses = HashMap::new();
            responses.insert("olá".to_string(), vec!["Olá! Como posso te ajudar hoje?".to_string()]);
            responses.insert(
                "ajuda".to_string(),
                vec!["Estou aqui para ajudar! O que você precisa?".to_string()],
            );
            responses.insert("obrigado".to_string(), vec!["De nada! Sempre às ordens.".to_string()]);
            manager.add_model("test_model", Box::new(DummyModel::new("Modelo de Teste", responses)), true);
        }

        manager
    }
}
