use tracing::info;

use secrecy::ExposeSecret;

use super::ResourceId;
use crate::api::types::{CheckReply, OpenAiCheckRequest, OpenAiKeyRequest};
use crate::api::JsonClient;
use crate::error::ConsoleError;
use crate::ui::{BusyFlag, SecretEntry, SecretField, StatusDisplay};

/// What the server rendered into the OpenAI resource page.
#[derive(Debug, Clone)]
pub struct OpenAiPageData {
    pub resource_id: ResourceId,
    pub has_key: bool,
    pub key_mask: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The stored key was left untouched; nothing was sent.
    AlreadySaved,
}

/// Controller for the OpenAI API key page.
pub struct OpenAiPage {
    client: JsonClient,
    resource_id: ResourceId,
    back_href: String,
    pub key: SecretField,
    pub status: StatusDisplay,
    busy: BusyFlag,
}

impl OpenAiPage {
    pub fn new(client: JsonClient, data: OpenAiPageData, mask_len: usize, back_href: &str) -> Self {
        let back_href = client.tokens().patch_href(back_href);
        Self {
            key: SecretField::new(data.has_key, data.key_mask.as_deref(), mask_len),
            client,
            resource_id: data.resource_id,
            back_href,
            status: StatusDisplay::new(),
            busy: BusyFlag::new(),
        }
    }

    pub fn back_href(&self) -> &str {
        &self.back_href
    }

    /// Save and Check share one enabled state.
    pub fn controls_enabled(&self) -> bool {
        !self.busy.is_set()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub async fn save(&mut self) -> Result<SaveOutcome, ConsoleError> {
        self.status.clear();

        let key = match self.key.entry() {
            SecretEntry::Unchanged => {
                self.status.info("API key is already saved.");
                return Ok(SaveOutcome::AlreadySaved);
            }
            SecretEntry::Empty => {
                self.status.err("Enter an API key.");
                return Err(ConsoleError::validation("Enter an API key."));
            }
            SecretEntry::New(key) => key,
        };

        let result = {
            let _busy = self.busy.enter();
            self.client
                .post(
                    &self.resource_id.action_path("openai/key"),
                    &OpenAiKeyRequest {
                        api_key: key.expose_secret(),
                    },
                )
                .await
        };

        match result {
            Ok(_) => {
                info!("OpenAI key saved for resource {}", self.resource_id);
                self.key.mark_saved();
                self.status.ok("Saved.");
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                self.status.err(format!("Save failed: {e}"));
                Err(e)
            }
        }
    }

    /// Validates the entered key, or the stored one when the field is
    /// untouched or empty.
    pub async fn check(&mut self) -> Result<CheckReply, ConsoleError> {
        self.status.clear();

        let entry = self.key.entry();
        let key = match &entry {
            SecretEntry::New(key) => Some(key.expose_secret().as_str()),
            SecretEntry::Unchanged => None,
            SecretEntry::Empty if self.key.has_secret() => None,
            SecretEntry::Empty => {
                self.status.err("Enter an API key.");
                return Err(ConsoleError::validation("Enter an API key."));
            }
        };

        self.status.info("Checking...");
        let result = {
            let _busy = self.busy.enter();
            self.client
                .post(
                    &self.resource_id.action_path("openai/check"),
                    &OpenAiCheckRequest { api_key: key },
                )
                .await
        };

        match result {
            Ok(payload) => {
                let reply = CheckReply::from_payload(payload.as_ref());
                match &reply {
                    CheckReply::Working => self.status.ok("API key works."),
                    CheckReply::Failed(Some(reason)) => self.status.err(reason.clone()),
                    CheckReply::Failed(None) => self.status.err("API key does not work."),
                }
                Ok(reply)
            }
            Err(e) => {
                self.status.err(format!("Check failed: {e}"));
                Err(e)
            }
        }
    }
}
