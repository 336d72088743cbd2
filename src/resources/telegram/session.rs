use crate::api::types::SessionSnapshot;

/// Where a Telegram session is in its one-time login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationPhase {
    NotActivated,
    /// A code was sent and is waiting for confirmation.
    CodePending,
    Activated,
}

/// Session status as last confirmed by the server.
///
/// Only server snapshots move it; readers get copies or shared refs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    snapshot: SessionSnapshot,
    code_pending: bool,
}

impl SessionState {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self {
            snapshot,
            code_pending: false,
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> ActivationPhase {
        if self.snapshot.is_activated {
            ActivationPhase::Activated
        } else if self.code_pending {
            ActivationPhase::CodePending
        } else {
            ActivationPhase::NotActivated
        }
    }

    pub fn is_activated(&self) -> bool {
        self.snapshot.is_activated
    }

    pub fn is_enabled(&self) -> bool {
        self.snapshot.is_enabled
    }

    pub fn session_id(&self) -> Option<&str> {
        self.snapshot.session_id.as_deref()
    }

    pub(super) fn apply(&mut self, snapshot: SessionSnapshot) {
        if snapshot.is_activated {
            self.code_pending = false;
        }
        self.snapshot = snapshot;
    }

    /// The server reported a sent (or still valid) code.
    pub(super) fn apply_code_pending(&mut self, snapshot: SessionSnapshot) {
        self.apply(snapshot);
        if !self.snapshot.is_activated {
            self.code_pending = true;
        }
    }

    /// Label of the enable/disable control: the action it performs next.
    pub fn toggle_label(&self) -> &'static str {
        if self.snapshot.is_enabled {
            "Disable session"
        } else {
            "Enable session"
        }
    }

    pub fn lamp(&self) -> Lamp {
        let activated = if self.snapshot.is_activated {
            "Session active"
        } else {
            "Session not active"
        };
        let enabled = if self.snapshot.is_enabled {
            "worker enabled"
        } else {
            "worker disabled"
        };
        let mut text = format!("{activated} · {enabled}");
        if let Some(id) = self.session_id() {
            text.push_str(&format!(" · session_id={id}"));
        }
        Lamp {
            on: self.snapshot.is_activated,
            text,
        }
    }
}

/// Session indicator: lit while activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lamp {
    pub on: bool,
    pub text: String,
}
