use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::api::token::TokenPropagator;
use crate::api::JsonClient;

pub const DEFAULT_CONFIG_PATH: &str = "console.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub masks: MasksConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Explicit query token; wins over the one in `page_url`.
    #[serde(default)]
    pub token: Option<String>,
    /// URL the console page was opened at. Its `token` is propagated.
    #[serde(default)]
    pub page_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MasksConfig {
    #[serde(default = "default_openai_key_len")]
    pub openai_key_len: usize,
    #[serde(default = "default_telegram_hash_len")]
    pub telegram_hash_len: usize,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_openai_key_len() -> usize {
    24
}

fn default_telegram_hash_len() -> usize {
    16
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            page_url: None,
        }
    }
}

impl Default for MasksConfig {
    fn default() -> Self {
        Self {
            openai_key_len: default_openai_key_len(),
            telegram_hash_len: default_telegram_hash_len(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))
    }

    /// Token to propagate: `token` if set, otherwise the one in `page_url`.
    pub fn tokens(&self) -> Result<TokenPropagator> {
        let explicit = TokenPropagator::new(self.api.token.as_deref());
        if explicit.token().is_some() {
            return Ok(explicit);
        }
        match &self.api.page_url {
            Some(page) => {
                let page = Url::parse(page)
                    .with_context(|| format!("Invalid page URL: {page}"))?;
                Ok(TokenPropagator::from_page_url(&page))
            }
            None => Ok(explicit),
        }
    }

    pub fn client(&self) -> Result<JsonClient> {
        JsonClient::new(self.base_url()?, self.tokens()?).context("Failed to build HTTP client")
    }
}
