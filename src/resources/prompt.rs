use tracing::info;
use uuid::Uuid;

use super::ResourceId;
use crate::api::types::PromptSaveRequest;
use crate::api::JsonClient;
use crate::error::ConsoleError;
use crate::ui::{BusyFlag, StatusDisplay};

pub const MAX_HISTORY_PAIRS: u32 = 50;

/// One editable source URL row.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub id: Uuid,
    pub url: String,
}

/// Ordered list of source rows. Rows keep their id for their whole life so a
/// remove button always removes the row it belongs to.
#[derive(Debug, Clone, Default)]
pub struct SourceList {
    rows: Vec<SourceRow>,
}

impl SourceList {
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = urls
            .into_iter()
            .map(|url| SourceRow {
                id: Uuid::new_v4(),
                url: url.into(),
            })
            .collect();
        Self { rows }
    }

    /// Appends a blank row.
    pub fn add(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.push(SourceRow {
            id,
            url: String::new(),
        });
        id
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn set(&mut self, id: Uuid, url: &str) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.url = url.to_string();
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-blank URLs, trimmed, in row order.
    pub fn collect(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Blank means unset; otherwise a number in `0..=50`, floored.
pub fn parse_history_pairs(raw: &str) -> Result<Option<u32>, ConsoleError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let invalid = || ConsoleError::validation("History must be a number 0..50.");
    let n: f64 = raw.parse().map_err(|_| invalid())?;
    if !(0.0..=MAX_HISTORY_PAIRS as f64).contains(&n) {
        return Err(invalid());
    }
    Ok(Some(n.floor() as u32))
}

/// What the server rendered into the Prompt resource page.
#[derive(Debug, Clone, Default)]
pub struct PromptPageData {
    pub resource_id: ResourceId,
    pub model: String,
    pub system_prompt: String,
    pub history_pairs: Option<u32>,
    pub sources: Vec<String>,
    pub out_of_scope_enabled: bool,
}

/// Controller for the Prompt configuration page.
pub struct PromptPage {
    client: JsonClient,
    resource_id: ResourceId,
    back_href: String,
    pub model: String,
    pub system_prompt: String,
    /// Raw text of the history input.
    pub history_pairs: String,
    pub sources: SourceList,
    pub out_of_scope_enabled: bool,
    pub status: StatusDisplay,
    busy: BusyFlag,
}

impl PromptPage {
    pub fn new(client: JsonClient, data: PromptPageData, back_href: &str) -> Self {
        let back_href = client.tokens().patch_href(back_href);
        Self {
            client,
            resource_id: data.resource_id,
            back_href,
            model: data.model,
            system_prompt: data.system_prompt,
            history_pairs: data.history_pairs.map(|n| n.to_string()).unwrap_or_default(),
            sources: SourceList::from_urls(data.sources),
            out_of_scope_enabled: data.out_of_scope_enabled,
            status: StatusDisplay::new(),
            busy: BusyFlag::new(),
        }
    }

    pub fn back_href(&self) -> &str {
        &self.back_href
    }

    pub fn save_enabled(&self) -> bool {
        !self.busy.is_set()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn add_source(&mut self) -> Uuid {
        self.sources.add()
    }

    pub fn remove_source(&mut self, id: Uuid) -> bool {
        self.sources.remove(id)
    }

    pub fn set_source(&mut self, id: Uuid, url: &str) -> bool {
        self.sources.set(id, url)
    }

    /// Builds the save body from the current form, or the validation error.
    pub fn assemble(&self) -> Result<PromptSaveRequest, ConsoleError> {
        Ok(PromptSaveRequest {
            model: self.model.trim().to_string(),
            system_prompt: self.system_prompt.trim().to_string(),
            history_pairs: parse_history_pairs(&self.history_pairs)?,
            google_sources: self.sources.collect(),
            out_of_scope_enabled: self.out_of_scope_enabled,
        })
    }

    pub async fn save(&mut self) -> Result<PromptSaveRequest, ConsoleError> {
        self.status.clear();

        let body = match self.assemble() {
            Ok(body) => body,
            Err(e) => {
                self.status.err(e.to_string());
                return Err(e);
            }
        };

        let result = {
            let _busy = self.busy.enter();
            self.client
                .post(&self.resource_id.action_path("prompt/save"), &body)
                .await
        };

        match result {
            Ok(_) => {
                info!(
                    "Prompt settings saved for resource {} ({} sources)",
                    self.resource_id,
                    body.google_sources.len()
                );
                self.status.ok("Saved.");
                Ok(body)
            }
            Err(e) => {
                self.status.err(format!("Save failed: {e}"));
                Err(e)
            }
        }
    }
}
