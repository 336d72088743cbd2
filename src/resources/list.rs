use serde::Deserialize;
use tracing::{info, warn};

use super::{Navigation, ResourceId, ResourceKind};
use crate::api::types::{CreateResourceRequest, CreatedResource};
use crate::api::{decode, JsonClient};
use crate::error::ConsoleError;
use crate::ui::StatusDisplay;

pub const DELETE_PROMPT: &str = "Delete resource?";

/// One row of the resources table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceRow {
    pub id: ResourceId,
    pub kind: ResourceKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation was declined; nothing was sent.
    Declined,
}

/// Controller for the resources list page.
pub struct ResourceList {
    client: JsonClient,
    rows: Vec<ResourceRow>,
    /// Alert region of the page.
    pub status: StatusDisplay,
}

impl ResourceList {
    pub fn new(client: JsonClient, rows: Vec<ResourceRow>) -> Self {
        Self {
            client,
            rows,
            status: StatusDisplay::new(),
        }
    }

    pub fn rows(&self) -> &[ResourceRow] {
        &self.rows
    }

    pub fn row(&self, id: ResourceId) -> Option<&ResourceRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Detail page of a resource, token included.
    pub fn navigate(&self, id: ResourceId) -> Navigation {
        Navigation {
            href: self.client.tokens().patch_href(&id.detail_path()),
        }
    }

    /// A click anywhere on a row except its delete cell.
    pub fn row_clicked(&self, id: ResourceId) -> Option<Navigation> {
        self.row(id).map(|row| self.navigate(row.id))
    }

    pub async fn create(
        &mut self,
        kind: Option<ResourceKind>,
        title: &str,
    ) -> Result<Navigation, ConsoleError> {
        self.status.clear();

        let title = title.trim();
        let Some(kind) = kind.filter(|_| !title.is_empty()) else {
            self.status.err("Choose a kind and set a title.");
            return Err(ConsoleError::validation("Choose a kind and set a title."));
        };

        let result = self
            .client
            .post(
                "/ui/resources",
                &CreateResourceRequest {
                    kind,
                    title: Some(title),
                },
            )
            .await
            .and_then(decode::<CreatedResource>);

        match result {
            Ok(created) => {
                info!("Created {} resource {} ({})", kind, created.id, title);
                Ok(self.navigate(created.id))
            }
            Err(e) => {
                warn!("Create failed: {}", e);
                self.status.err(format!("Failed to create resource: {e}"));
                Err(e)
            }
        }
    }

    /// Deletes a resource after `confirm` accepts [`DELETE_PROMPT`].
    pub async fn delete<F>(
        &mut self,
        id: ResourceId,
        confirm: F,
    ) -> Result<DeleteOutcome, ConsoleError>
    where
        F: FnOnce(&str) -> bool,
    {
        self.status.clear();

        if !confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        match self.client.delete(&id.detail_path()).await {
            Ok(_) => {
                self.rows.retain(|row| row.id != id);
                info!("Deleted resource {}", id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                warn!("Delete of resource {} failed: {}", id, e);
                self.status.err(format!("Failed to delete resource: {e}"));
                Err(e)
            }
        }
    }
}
