//! Server Configuration
//!
//! Secrets come from the shuttle `SecretStore`; every key is optional and
//! falls back to a default so a bare deployment still boots.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::TimeDelta;

use hibiki::{PersonaCatalog, PersonaKind, Vendor, SECRETARY_ROLE, TYPING_TIMEOUT_SECS};

/// Persona catalog shipped with the binary
const DEFAULT_PERSONAS: &str = include_str!("../personas.toml");

/// Tunables of a single reply orchestration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound of capability tools executed per reply
    pub max_tools: usize,
    /// Tools must score strictly above this to run
    pub min_relevance_score: u8,
    /// How far back the labelled history reaches
    pub history_window: TimeDelta,
    /// Maximum number of history messages
    pub history_limit: usize,
    pub typing_timeout_secs: u64,
    /// Role used when tools produce context without suggesting one
    pub default_role: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_tools: 2,
            min_relevance_score: 50,
            history_window: TimeDelta::days(2),
            history_limit: 10,
            typing_timeout_secs: TYPING_TIMEOUT_SECS,
            default_role: SECRETARY_ROLE.to_string(),
        }
    }
}

/// Retry policy of the background reply runner
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_base_delay: Duration::from_millis(1_000),
            retry_max_delay: Duration::from_millis(30_000),
        }
    }
}

/// Platform-level credentials for the LLM history classifier
#[derive(Debug, Clone)]
pub struct ClassifierCredentials {
    pub vendor: Vendor,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub api_key: Option<String>,
    pub realtime_gateway_url: Option<String>,
    pub realtime_signing_secret: Option<String>,
    pub classifier: Option<ClassifierCredentials>,
    pub persona_catalog_path: Option<PathBuf>,
    pub wild_keywords: Option<Vec<String>>,
    pub dispatch: DispatchConfig,
    pub orchestrator: OrchestratorConfig,
}

impl ServerConfig {
    /// Build from a key lookup (the shuttle secret store in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let classifier = get("CLASSIFIER_API_KEY").and_then(|api_key| {
            let vendor = match get("CLASSIFIER_VENDOR") {
                Some(raw) => match Vendor::from_str(&raw) {
                    Ok(vendor) => vendor,
                    Err(e) => {
                        tracing::warn!("⚠️  {} - LLM history classifier disabled", e);
                        return None;
                    }
                },
                None => Vendor::Anthropic,
            };
            let model = get("CLASSIFIER_MODEL").unwrap_or_else(|| vendor.default_model().to_string());
            Some(ClassifierCredentials {
                vendor,
                api_key,
                model,
            })
        });

        let mut dispatch = DispatchConfig::default();
        if let Some(attempts) = parse_secret::<u32>(&get, "REPLY_MAX_ATTEMPTS") {
            dispatch.max_attempts = attempts.max(1);
        }
        if let Some(ms) = parse_secret::<u64>(&get, "REPLY_RETRY_BASE_DELAY_MS") {
            dispatch.retry_base_delay = Duration::from_millis(ms);
        }

        let wild_keywords = get("WILD_KEYWORDS").map(|raw| {
            raw.split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        });

        Self {
            api_key: get("HIBIKI_API_KEY"),
            realtime_gateway_url: get("REALTIME_GATEWAY_URL"),
            realtime_signing_secret: get("REALTIME_SIGNING_SECRET"),
            classifier,
            persona_catalog_path: get("PERSONA_CATALOG_PATH").map(PathBuf::from),
            wild_keywords,
            dispatch,
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

fn parse_secret<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("⚠️  Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

/// Load the persona catalog from `path`, or the embedded default.
pub fn load_persona_catalog(path: Option<&Path>) -> anyhow::Result<PersonaCatalog> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona catalog {}", path.display()))?,
        None => DEFAULT_PERSONAS.to_string(),
    };

    parse_persona_catalog(&raw)
}

pub fn parse_persona_catalog(raw: &str) -> anyhow::Result<PersonaCatalog> {
    let parsed: PersonaCatalog = toml::from_str(raw).context("Invalid persona catalog TOML")?;
    let catalog = PersonaCatalog::new(parsed.all().to_vec());

    if catalog.is_empty() {
        bail!("Persona catalog defines no personas");
    }
    if catalog.get(PersonaKind::DefaultChat).is_none() {
        tracing::warn!("⚠️  Persona catalog has no default_chat persona - hard fallback will fail");
    }

    Ok(catalog)
}
