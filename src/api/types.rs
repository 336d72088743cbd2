use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::resources::{ResourceId, ResourceKind};

// ── Resource list ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateResourceRequest<'a> {
    pub kind: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedResource {
    pub id: ResourceId,
}

// ── OpenAI ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct OpenAiKeyRequest<'a> {
    pub api_key: &'a str,
}

/// `{}` asks the server to check the stored key.
#[derive(Debug, Serialize)]
pub struct OpenAiCheckRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

/// Outcome of a key check. Only `{"ok": true}` counts as working.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckReply {
    Working,
    Failed(Option<String>),
}

impl CheckReply {
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let Some(payload) = payload else {
            return CheckReply::Failed(None);
        };
        if payload.get("ok").and_then(Value::as_bool) == Some(true) {
            return CheckReply::Working;
        }
        let reason = ["error", "detail"]
            .iter()
            .filter_map(|key| payload.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string);
        CheckReply::Failed(reason)
    }
}

// ── Prompt ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptSaveRequest {
    pub model: String,
    pub system_prompt: String,
    pub history_pairs: Option<u32>,
    pub google_sources: Vec<String>,
    pub out_of_scope_enabled: bool,
}

// ── Telegram ──────────────────────────────────────────────────────────────────

/// `api_hash: null` keeps the stored hash, `""` clears it.
#[derive(Debug, Serialize)]
pub struct TelegramSaveRequest<'a> {
    pub phone: Option<&'a str>,
    pub api_id: Option<i64>,
    pub api_hash: Option<&'a str>,
    pub openai_resource_id: Option<i64>,
    pub prompt_resource_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivationStartRequest<'a> {
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ActivationConfirmRequest<'a> {
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SetEnabledRequest {
    pub is_enabled: bool,
}

/// The server's authoritative view of a Telegram session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default, deserialize_with = "deserialize_session_id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_activated: bool,
}

/// Reply to `activation/start`, discriminated by `detail`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStart {
    AlreadyActivated(SessionSnapshot),
    AlreadyStarted(SessionSnapshot),
    CodeSent(CodeSent),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodeSent {
    #[serde(default, deserialize_with = "deserialize_session_id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_activated: bool,
    #[serde(default)]
    pub sent_type: Option<String>,
    #[serde(default)]
    pub code_len: Option<u32>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub next_type: Option<String>,
}

impl CodeSent {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            is_enabled: self.is_enabled,
            is_activated: self.is_activated,
        }
    }
}

/// Session ids arrive as numbers from some server versions and strings from others.
fn deserialize_session_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
