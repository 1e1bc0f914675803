//! Intent catalog — the immutable pattern/response table.
//!
//! One shared [`Catalog`] instance (behind an `Arc`) is injected into the
//! scorer, the selector, and the assistant, so the trigger/reply data
//! lives in exactly one place. The built-in table reproduces the
//! Portuguese trigger words and canned replies the assistant ships with;
//! [`Catalog::new`] accepts externally supplied entries for deployments
//! that want their own vocabulary.

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete category describing the purpose of a user message.
///
/// Closed set: the scorer never produces anything outside of it, and
/// `Default` is the catch-all when no pattern fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Greeting,
    Contact,
    Project,
    Automation,
    Default,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Contact => "contact",
            Intent::Project => "project",
            Intent::Automation => "automation",
            Intent::Default => "default",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw material for one catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDef {
    pub intent: Intent,
    /// Whole-word trigger tokens. Must be empty for `Intent::Default`
    /// and non-empty for everything else.
    #[serde(default)]
    pub triggers: Vec<String>,
    pub replies: Vec<String>,
}

/// A compiled catalog entry: the matching rule plus its reply candidates.
pub struct CatalogEntry {
    intent: Intent,
    rule: Option<Regex>,
    replies: Vec<String>,
}

impl CatalogEntry {
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// The compiled word-boundary rule, `None` for the default entry.
    pub fn rule(&self) -> Option<&Regex> {
        self.rule.as_ref()
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }
}

/// Ordered, immutable intent table. Entry order is the tie-break order
/// used by the scorer: first-declared wins.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Compile a catalog from entry definitions.
    ///
    /// Enforces the table invariants: exactly one `Default` entry, a
    /// non-empty trigger set for every other entry, and a non-empty
    /// reply list everywhere.
    pub fn new(defs: Vec<EntryDef>) -> Result<Self> {
        let mut entries = Vec::with_capacity(defs.len());
        let mut defaults = 0usize;

        for def in defs {
            if def.replies.is_empty() {
                bail!("catalog entry '{}' has no replies", def.intent);
            }

            let rule = if def.intent == Intent::Default {
                defaults += 1;
                None
            } else {
                if def.triggers.is_empty() {
                    bail!("catalog entry '{}' has no trigger tokens", def.intent);
                }
                Some(compile_rule(&def.triggers)?)
            };

            entries.push(CatalogEntry {
                intent: def.intent,
                rule,
                replies: def.replies,
            });
        }

        if defaults != 1 {
            bail!("catalog needs exactly one default entry, found {}", defaults);
        }

        Ok(Self { entries })
    }

    /// The built-in table the assistant ships with.
    pub fn builtin() -> Self {
        Self::new(builtin_defs()).expect("built-in catalog is valid")
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Reply candidates for an intent, falling back to the default set.
    ///
    /// The fallback should never trigger for scorer output (the scorer
    /// only produces catalog intents), but a data-driven catalog may
    /// omit entries.
    pub fn replies(&self, intent: Intent) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.intent == intent)
            .or_else(|| self.entries.iter().find(|e| e.intent == Intent::Default))
            .map(|e| e.replies.as_slice())
            .unwrap_or(&[])
    }
}

/// Compile trigger tokens into a single case-sensitive word-boundary
/// alternation. Callers lowercase the message before matching, so the
/// tokens themselves are stored lowercase.
fn compile_rule(triggers: &[String]) -> Result<Regex> {
    let alternation = triggers
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"\b(?:{})\b", alternation))?)
}

fn builtin_defs() -> Vec<EntryDef> {
    fn entry(intent: Intent, triggers: &[&str], replies: &[&str]) -> EntryDef {
        EntryDef {
            intent,
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            replies: replies.iter().map(|s| s.to_string()).collect(),
        }
    }

    vec![
        entry(
            Intent::Greeting,
            &["oi", "olá", "ola", "e ai", "e aí", "hey", "hi", "hello"],
            &[
                "Olá! Que bom falar com você. Como posso ajudar hoje?",
                "Oi! Em que posso ser útil?",
                "Olá! Como posso te auxiliar?",
            ],
        ),
        entry(
            Intent::Contact,
            &[
                "contato", "email", "telefone", "whatsapp", "ligar", "chamar", "falar",
            ],
            &[
                "Você pode entrar em contato pelo WhatsApp clicando no ícone verde abaixo, ou pelo email daniel.alves66@hotmail.com.",
                "Para contato direto, use o WhatsApp disponível no site ou envie um email para daniel.alves66@hotmail.com.",
            ],
        ),
        entry(
            Intent::Project,
            &[
                "projeto", "orçamento", "orcamento", "proposta", "valor", "preço", "preco",
                "custo",
            ],
            &[
                "Para solicitar um orçamento, entre em contato via WhatsApp ou preencha o formulário na seção de contato com detalhes do seu projeto.",
                "Posso ajudar com seu projeto! Basta enviar os detalhes pelo formulário de contato ou pelo WhatsApp.",
            ],
        ),
        entry(
            Intent::Automation,
            &[
                "automação", "automacao", "ia", "inteligência", "inteligencia", "artificial",
                "sistema", "software",
            ],
            &[
                "Trabalho com soluções de automação e IA para o setor de construção civil. Posso desenvolver sistemas personalizados para aumentar a eficiência do seu negócio.",
                "Especializo-me em automação para construção civil, criando soluções que economizam tempo e recursos.",
            ],
        ),
        entry(
            Intent::Default,
            &[],
            &[
                "Ótimo! Como posso te ajudar com isso?",
                "Interessante! Conte-me mais sobre como posso ajudar?",
                "Entendi. Que tipo de assistência específica você está procurando?",
            ],
        ),
    ]
}
