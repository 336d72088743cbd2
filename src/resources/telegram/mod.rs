//! Telegram resource page: connection settings plus the session activation
//! flow (phone → code → activated → enabled/disabled).
//!
//! The server owns the session lifecycle. This controller only mirrors the
//! snapshots it returns and never moves [`SessionState`] on its own.

pub mod dialog;
pub mod session;

use secrecy::ExposeSecret;
use tracing::{info, warn};

use self::dialog::{ActivationDialog, Dismissal};
use self::session::{ActivationPhase, Lamp, SessionState};
use super::{parse_optional_int, ResourceId};
use crate::api::types::{
    ActivationConfirmRequest, ActivationStart, ActivationStartRequest, CodeSent, SessionSnapshot,
    SetEnabledRequest, TelegramSaveRequest,
};
use crate::api::{decode, JsonClient};
use crate::error::{describe, ConsoleError};
use crate::ui::{BusyFlag, SecretEntry, SecretField, StatusDisplay};

const NOT_ACTIVATED: &str =
    "Cannot enable the session: activate it with the Telegram code first.";

/// What the server rendered into the Telegram resource page.
#[derive(Debug, Clone, Default)]
pub struct TelegramPageData {
    pub resource_id: ResourceId,
    pub phone: Option<String>,
    pub api_id: Option<i64>,
    pub has_hash: bool,
    pub hash_mask: Option<String>,
    pub openai_resource_id: Option<i64>,
    pub prompt_resource_id: Option<i64>,
    pub session: SessionSnapshot,
}

pub struct TelegramPage {
    client: JsonClient,
    resource_id: ResourceId,
    back_href: String,

    pub phone: String,
    pub api_id: String,
    pub api_hash: SecretField,
    pub openai_resource: String,
    pub prompt_resource: String,

    pub status: StatusDisplay,
    pub dialog: ActivationDialog,
    session: SessionState,

    saving: BusyFlag,
    activating: BusyFlag,
    confirming: BusyFlag,
    toggling: BusyFlag,
}

impl TelegramPage {
    pub fn new(
        client: JsonClient,
        data: TelegramPageData,
        mask_len: usize,
        back_href: &str,
    ) -> Self {
        let back_href = client.tokens().patch_href(back_href);
        let int_text = |n: Option<i64>| n.map(|n| n.to_string()).unwrap_or_default();
        Self {
            api_hash: SecretField::new(data.has_hash, data.hash_mask.as_deref(), mask_len),
            client,
            resource_id: data.resource_id,
            back_href,
            phone: data.phone.unwrap_or_default(),
            api_id: int_text(data.api_id),
            openai_resource: int_text(data.openai_resource_id),
            prompt_resource: int_text(data.prompt_resource_id),
            status: StatusDisplay::new(),
            dialog: ActivationDialog::default(),
            session: SessionState::new(data.session),
            saving: BusyFlag::new(),
            activating: BusyFlag::new(),
            confirming: BusyFlag::new(),
            toggling: BusyFlag::new(),
        }
    }

    pub fn back_href(&self) -> &str {
        &self.back_href
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> ActivationPhase {
        self.session.phase()
    }

    pub fn lamp(&self) -> Lamp {
        self.session.lamp()
    }

    pub fn save_enabled(&self) -> bool {
        !self.saving.is_set()
    }

    pub fn activate_enabled(&self) -> bool {
        !self.activating.is_set()
    }

    pub fn confirm_enabled(&self) -> bool {
        self.dialog.is_open() && !self.confirming.is_set()
    }

    /// The enable/disable control only exists once the session is activated.
    pub fn toggle_visible(&self) -> bool {
        self.session.is_activated()
    }

    pub fn toggle_control_enabled(&self) -> bool {
        self.session.is_activated() && !self.toggling.is_set()
    }

    pub fn toggle_label(&self) -> &'static str {
        self.session.toggle_label()
    }

    /// Flags of the Save, Activate, Confirm and Toggle controls, in that order.
    pub fn busy_flags(&self) -> [BusyFlag; 4] {
        [
            self.saving.clone(),
            self.activating.clone(),
            self.confirming.clone(),
            self.toggling.clone(),
        ]
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.session.apply(snapshot);
        info!(
            "Telegram resource {}: {}",
            self.resource_id,
            self.session.lamp().text
        );
    }

    // ── Settings ────────────────────────────────────────────────────────────

    pub async fn save(&mut self) -> Result<(), ConsoleError> {
        self.status.clear();

        let api_id = match parse_optional_int(&self.api_id) {
            Ok(Some(n)) if n <= 0 => None,
            Ok(v) => Some(v),
            Err(_) => None,
        };
        let Some(api_id) = api_id else {
            return Err(self.reject("Telegram API ID must be an integer > 0."));
        };
        let Ok(openai_resource_id) = parse_optional_int(&self.openai_resource) else {
            return Err(self.reject("OpenAI resource selection is invalid."));
        };
        let Ok(prompt_resource_id) = parse_optional_int(&self.prompt_resource) else {
            return Err(self.reject("Prompt resource selection is invalid."));
        };

        let phone = self.phone.trim().to_string();
        let hash_entry = self.api_hash.entry();
        let api_hash = match &hash_entry {
            SecretEntry::Unchanged => None,
            SecretEntry::Empty => Some(""),
            SecretEntry::New(hash) => Some(hash.expose_secret().as_str()),
        };

        self.status.info("Saving...");
        let result = {
            let _busy = self.saving.enter();
            self.client
                .post(
                    &self.resource_id.action_path("telegram/save"),
                    &TelegramSaveRequest {
                        phone: (!phone.is_empty()).then_some(phone.as_str()),
                        api_id,
                        api_hash,
                        openai_resource_id,
                        prompt_resource_id,
                    },
                )
                .await
        };

        match result {
            Ok(_) => {
                match hash_entry {
                    SecretEntry::New(_) => self.api_hash.mark_saved(),
                    SecretEntry::Empty => self.api_hash.mark_cleared(),
                    SecretEntry::Unchanged => {}
                }
                info!("Telegram settings saved for resource {}", self.resource_id);
                self.status.ok("Saved.");
                Ok(())
            }
            Err(e) => {
                self.status.err(format!("Save failed: {e}"));
                Err(e)
            }
        }
    }

    fn reject(&mut self, msg: &str) -> ConsoleError {
        self.status.err(msg);
        ConsoleError::validation(msg)
    }

    // ── Activation ──────────────────────────────────────────────────────────

    /// Asks the server to send a login code to the phone.
    pub async fn activate(&mut self) -> Result<ActivationPhase, ConsoleError> {
        self.status.clear();

        let phone = self.phone.trim().to_string();
        if phone.is_empty() {
            return Err(self.reject("Enter a phone number (E.164) before activating."));
        }

        self.status.info("Sending the code...");
        let result = {
            let _busy = self.activating.enter();
            self.client
                .post(
                    &self.resource_id.action_path("telegram/session/activation/start"),
                    &ActivationStartRequest { phone: &phone },
                )
                .await
                .and_then(decode::<ActivationStart>)
        };

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Activation start failed for resource {}: {}", self.resource_id, e);
                self.status.err(format!("Failed to send the code: {}", describe(&e)));
                return Err(e);
            }
        };

        match reply {
            ActivationStart::AlreadyActivated(mut snapshot) => {
                snapshot.is_activated = true;
                self.apply_snapshot(snapshot);
                self.dialog.close();
                self.status.info("Session is already activated; nothing to do.");
            }
            ActivationStart::AlreadyStarted(snapshot) => {
                self.session.apply_code_pending(snapshot);
                self.dialog.open();
                self.status.info("A code was already sent. Enter it to finish activation.");
            }
            ActivationStart::CodeSent(sent) => {
                self.session.apply_code_pending(sent.snapshot());
                self.dialog.open();
                self.status.ok(code_sent_message(&sent));
            }
        }

        Ok(self.session.phase())
    }

    /// Submits the code typed into the activation dialog.
    pub async fn confirm_code(&mut self) -> Result<(), ConsoleError> {
        if !self.dialog.is_open() {
            return Err(self.reject("Request a confirmation code first."));
        }
        self.dialog.status.clear();

        let code = self.dialog.code.trim().to_string();
        if code.is_empty() {
            self.dialog.status.err("Enter the confirmation code.");
            return Err(ConsoleError::validation("Enter the confirmation code."));
        }

        self.dialog.status.info("Checking the code...");
        let result = {
            let _busy = self.confirming.enter();
            self.client
                .post(
                    &self.resource_id.action_path("telegram/session/activation/confirm"),
                    &ActivationConfirmRequest { code: &code },
                )
                .await
                .and_then(decode::<SessionSnapshot>)
        };

        match result {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                self.dialog.close();
                self.status.ok("Session activated.");
                Ok(())
            }
            Err(e) => {
                self.dialog.status.err(format!("Error: {}", describe(&e)));
                Err(e)
            }
        }
    }

    pub fn dismiss_dialog(&mut self, how: Dismissal) {
        self.dialog.dismiss(how);
    }

    // ── Enable / disable ────────────────────────────────────────────────────

    /// Flips the worker switch of an activated session. Returns the new value.
    pub async fn toggle_enabled(&mut self) -> Result<bool, ConsoleError> {
        self.status.clear();

        if !self.session.is_activated() {
            return Err(self.reject(NOT_ACTIVATED));
        }

        let next = !self.session.is_enabled();
        self.status.info("Applying...");
        let result = {
            let _busy = self.toggling.enter();
            self.client
                .post(
                    &self.resource_id.action_path("telegram/session/set_enabled"),
                    &SetEnabledRequest { is_enabled: next },
                )
                .await
                .and_then(decode::<SessionSnapshot>)
        };

        match result {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                let enabled = self.session.is_enabled();
                self.status.ok(if enabled {
                    "Session enabled."
                } else {
                    "Session disabled."
                });
                Ok(enabled)
            }
            Err(e) => {
                self.status.err(format!("Failed to switch the session: {}", describe(&e)));
                Err(e)
            }
        }
    }
}

/// Readable name for Telegram's `SentCodeType*` / `CodeType*` values.
fn delivery_label(raw: &str) -> String {
    let name = raw
        .strip_prefix("SentCodeType")
        .or_else(|| raw.strip_prefix("CodeType"))
        .unwrap_or(raw);
    match name.to_ascii_lowercase().as_str() {
        "app" => "the Telegram app".to_string(),
        "flashcall" => "flash call".to_string(),
        "missedcall" => "missed call".to_string(),
        other => other.to_string(),
    }
}

fn code_sent_message(sent: &CodeSent) -> String {
    let mut text = String::from("Code sent");
    if let Some(kind) = &sent.sent_type {
        text.push_str(&format!(" via {}", delivery_label(kind)));
    }
    if let Some(len) = sent.code_len {
        text.push_str(&format!(" ({len} digits)"));
    }
    text.push_str(". Enter the confirmation code.");
    if let Some(next) = &sent.next_type {
        text.push_str(&format!(" Next delivery: {}", delivery_label(next)));
        match sent.timeout {
            Some(secs) => text.push_str(&format!(" in {secs} s.")),
            None => text.push('.'),
        }
    } else if let Some(secs) = sent.timeout {
        text.push_str(&format!(" Code timeout: {secs} s."));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stalled_client, MockApi, MockReply};
    use std::time::Duration;
    use crate::ui::StatusKind;
    use serde_json::json;

    const START: &str = "/ui/resources/11/telegram/session/activation/start";
    const CONFIRM: &str = "/ui/resources/11/telegram/session/activation/confirm";
    const SET_ENABLED: &str = "/ui/resources/11/telegram/session/set_enabled";
    const SAVE: &str = "/ui/resources/11/telegram/save";

    fn page(api: &MockApi, session: SessionSnapshot) -> TelegramPage {
        TelegramPage::new(
            api.client(Some("tok")),
            TelegramPageData {
                resource_id: ResourceId(11),
                session,
                ..Default::default()
            },
            16,
            "/ui/resources",
        )
    }

    fn saved() -> MockReply {
        MockReply::json("POST", SAVE, 200, json!({"ok": true}))
    }

    fn activated(enabled: bool) -> SessionSnapshot {
        SessionSnapshot {
            session_id: Some("abc".to_string()),
            is_enabled: enabled,
            is_activated: true,
        }
    }

    #[test]
    fn test_code_sent_message() {
        let sent = CodeSent {
            sent_type: Some("SentCodeTypeApp".to_string()),
            code_len: Some(5),
            next_type: Some("CodeTypeSms".to_string()),
            timeout: Some(60),
            ..Default::default()
        };
        assert_eq!(
            code_sent_message(&sent),
            "Code sent via the Telegram app (5 digits). Enter the confirmation code. \
             Next delivery: sms in 60 s."
        );
        assert_eq!(
            code_sent_message(&CodeSent::default()),
            "Code sent. Enter the confirmation code."
        );
    }

    #[tokio::test]
    async fn test_activate_code_sent_opens_dialog() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            START,
            200,
            json!({"detail": "CODE_SENT", "sent_type": "sms", "code_len": 5}),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = " +15551234567 ".to_string();

        let phase = page.activate().await.unwrap();

        assert_eq!(phase, ActivationPhase::CodePending);
        assert!(page.dialog.is_open());
        assert!(!page.session().is_activated());
        assert_eq!(page.status.kind(), Some(StatusKind::Ok));
        assert!(page.status.text().contains("via sms"));
        assert!(page.status.text().contains("5 digits"));

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, START);
        assert_eq!(requests[0].body, Some(json!({"phone": "+15551234567"})));
        assert_eq!(requests[0].query.as_deref(), Some("token=tok"));
    }

    #[tokio::test]
    async fn test_activate_requires_phone() {
        let api = MockApi::start(vec![]).await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "   ".to_string();

        assert!(page.activate().await.unwrap_err().is_validation());
        assert_eq!(page.status.kind(), Some(StatusKind::Err));
        assert!(!page.dialog.is_open());
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_activate_when_already_activated() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            START,
            200,
            json!({
                "detail": "ALREADY_ACTIVATED",
                "session_id": 4,
                "is_enabled": true,
                "is_activated": true
            }),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "+15551234567".to_string();

        assert_eq!(page.activate().await.unwrap(), ActivationPhase::Activated);
        assert!(!page.dialog.is_open());
        assert_eq!(page.status.kind(), Some(StatusKind::Info));
        assert_eq!(page.session().session_id(), Some("4"));
        assert_eq!(page.toggle_label(), "Disable session");
    }

    #[tokio::test]
    async fn test_activate_already_started_reopens_dialog() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            START,
            200,
            json!({"detail": "ALREADY_STARTED", "session_id": 4, "is_activated": false}),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "+15551234567".to_string();

        assert_eq!(page.activate().await.unwrap(), ActivationPhase::CodePending);
        assert!(page.dialog.is_open());
    }

    #[tokio::test]
    async fn test_activate_unexpected_reply_changes_nothing() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            START,
            200,
            json!({"detail": "SOMETHING_NEW"}),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "+15551234567".to_string();

        let err = page.activate().await.unwrap_err();
        assert!(matches!(err, ConsoleError::UnexpectedResponse(_)));
        assert_eq!(page.phase(), ActivationPhase::NotActivated);
        assert!(!page.dialog.is_open());
        assert!(page.activate_enabled());
    }

    #[tokio::test]
    async fn test_activate_flood_wait_is_explained() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            START,
            429,
            json!({"detail": "FLOOD_WAIT:120"}),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "+15551234567".to_string();

        let err = page.activate().await.unwrap_err();
        assert!(matches!(err, ConsoleError::Server { status: 429, .. }));
        assert!(page.status.text().contains("wait 120 s"));
        assert!(!page.dialog.is_open());
    }

    #[tokio::test]
    async fn test_confirm_without_open_dialog_is_rejected() {
        let api = MockApi::start(vec![]).await;
        let mut page = page(&api, SessionSnapshot::default());
        page.dialog.code = "12345".to_string();

        assert!(page.confirm_code().await.unwrap_err().is_validation());
        assert!(!page.confirm_enabled());
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_requires_code() {
        let api = MockApi::start(vec![]).await;
        let mut page = page(&api, SessionSnapshot::default());
        page.dialog.open();

        assert!(page.confirm_code().await.unwrap_err().is_validation());
        assert!(page.dialog.is_open());
        assert_eq!(page.dialog.status.text(), "Enter the confirmation code.");
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_code_then_confirm_activates_session() {
        let api = MockApi::start(vec![
            MockReply::json(
                "POST",
                START,
                200,
                json!({"detail": "CODE_SENT", "sent_type": "sms", "code_len": 5}),
            ),
            MockReply::json(
                "POST",
                CONFIRM,
                200,
                json!({"session_id": "abc", "is_activated": true, "is_enabled": false}),
            ),
        ])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "+15551234567".to_string();
        assert!(!page.toggle_visible());

        page.activate().await.unwrap();
        page.dialog.code = "12345".to_string();
        page.confirm_code().await.unwrap();

        assert_eq!(api.requests()[1].body, Some(json!({"code": "12345"})));
        assert!(!page.dialog.is_open());
        assert_eq!(page.phase(), ActivationPhase::Activated);
        assert!(page.lamp().on);
        assert!(page.lamp().text.starts_with("Session active"));
        assert_eq!(page.toggle_label(), "Enable session");
        assert!(page.toggle_visible());
        assert_eq!(page.status.text(), "Session activated.");
    }

    #[tokio::test]
    async fn test_confirm_failure_keeps_dialog_open() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            CONFIRM,
            400,
            json!({"detail": "INVALID_OR_EXPIRED_CODE"}),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.dialog.open();
        page.dialog.code = "00000".to_string();

        assert!(page.confirm_code().await.is_err());
        assert!(page.dialog.is_open());
        assert_eq!(page.dialog.status.kind(), Some(StatusKind::Err));
        assert!(page.dialog.status.text().contains("invalid or has expired"));
        assert_eq!(page.phase(), ActivationPhase::NotActivated);
        assert!(page.confirm_enabled());
    }

    #[tokio::test]
    async fn test_dismiss_keeps_session_state() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            START,
            200,
            json!({"detail": "CODE_SENT"}),
        )])
        .await;
        let mut page = page(&api, SessionSnapshot::default());
        page.phone = "+15551234567".to_string();
        page.activate().await.unwrap();
        page.dialog.code = "123".to_string();

        page.dismiss_dialog(Dismissal::Escape);

        assert!(!page.dialog.is_open());
        assert!(page.dialog.code.is_empty());
        assert_eq!(page.phase(), ActivationPhase::CodePending);
    }

    #[tokio::test]
    async fn test_toggle_rejected_when_not_activated() {
        let api = MockApi::start(vec![]).await;
        let mut page = page(&api, SessionSnapshot::default());

        assert!(page.toggle_enabled().await.unwrap_err().is_validation());
        assert_eq!(page.status.kind(), Some(StatusKind::Err));
        assert!(!page.toggle_control_enabled());
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_flips_enabled_and_label() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            SET_ENABLED,
            200,
            json!({"session_id": 9, "is_enabled": true, "is_activated": true}),
        )])
        .await;
        let mut page = page(&api, activated(false));
        assert_eq!(page.toggle_label(), "Enable session");

        assert!(page.toggle_enabled().await.unwrap());

        assert_eq!(api.requests()[0].body, Some(json!({"is_enabled": true})));
        assert!(page.session().is_enabled());
        assert_eq!(page.toggle_label(), "Disable session");
        assert_eq!(page.status.text(), "Session enabled.");
        assert!(page.toggle_control_enabled());
    }

    #[tokio::test]
    async fn test_toggle_failure_keeps_snapshot() {
        let api = MockApi::start(vec![MockReply::json(
            "POST",
            SET_ENABLED,
            409,
            json!({"detail": "NO_SESSION"}),
        )])
        .await;
        let mut page = page(&api, activated(false));

        assert!(page.toggle_enabled().await.is_err());
        assert!(!page.session().is_enabled());
        assert!(page.status.text().starts_with("Failed to switch the session"));
        assert!(page.toggle_control_enabled());
    }

    #[tokio::test]
    async fn test_save_sends_null_hash_when_masked() {
        let api = MockApi::start(vec![saved()]).await;
        let mut page = TelegramPage::new(
            api.client(None),
            TelegramPageData {
                resource_id: ResourceId(11),
                phone: Some("+15551234567".to_string()),
                api_id: Some(12345),
                has_hash: true,
                openai_resource_id: Some(2),
                ..Default::default()
            },
            16,
            "/ui/resources",
        );
        page.prompt_resource = "3".to_string();

        page.save().await.unwrap();

        assert_eq!(
            api.requests()[0].body,
            Some(json!({
                "phone": "+15551234567",
                "api_id": 12345,
                "api_hash": null,
                "openai_resource_id": 2,
                "prompt_resource_id": 3
            }))
        );
        assert!(page.api_hash.shows_mask());
    }

    #[tokio::test]
    async fn test_save_new_hash_is_remasked() {
        let api = MockApi::start(vec![saved()]).await;
        let mut page = page(&api, SessionSnapshot::default());
        page.api_hash.focus();
        page.api_hash.input(" 0123456789abcdef ");

        page.save().await.unwrap();

        let body = api.requests()[0].body.clone().unwrap();
        assert_eq!(body["api_hash"], json!("0123456789abcdef"));
        assert_eq!(body["phone"], json!(null));
        assert!(page.api_hash.has_secret());
        assert!(page.api_hash.shows_mask());
    }

    fn stored_hash(api: &MockApi) -> TelegramPage {
        TelegramPage::new(
            api.client(None),
            TelegramPageData {
                resource_id: ResourceId(11),
                api_id: Some(12345),
                has_hash: true,
                ..Default::default()
            },
            16,
            "/ui/resources",
        )
    }

    #[tokio::test]
    async fn test_save_padded_mask_keeps_stored_hash() {
        let api = MockApi::start(vec![saved()]).await;
        let mut page = stored_hash(&api);
        let mask = page.api_hash.mask().to_string();
        page.api_hash.input(&format!(" {mask}"));

        page.save().await.unwrap();

        assert_eq!(api.requests()[0].body.clone().unwrap()["api_hash"], json!(null));
        assert!(page.api_hash.has_secret());
    }

    #[tokio::test]
    async fn test_save_emptied_hash_clears_it() {
        let api = MockApi::start(vec![saved()]).await;
        let mut page = stored_hash(&api);
        page.api_hash.focus();

        page.save().await.unwrap();

        assert_eq!(api.requests()[0].body.clone().unwrap()["api_hash"], json!(""));
        assert!(!page.api_hash.has_secret());
        assert!(page.api_hash.is_blank());
    }

    #[tokio::test]
    async fn test_dropped_activation_reenables_controls() {
        let mut page = TelegramPage::new(
            stalled_client().await,
            TelegramPageData {
                resource_id: ResourceId(11),
                phone: Some("+15551234567".to_string()),
                ..Default::default()
            },
            16,
            "/ui/resources",
        );
        let [_, activating, _, _] = page.busy_flags();

        {
            let start = page.activate();
            tokio::pin!(start);
            let pending = tokio::time::timeout(Duration::from_millis(200), &mut start).await;
            assert!(pending.is_err());
            assert!(activating.is_set());
        }

        assert!(!activating.is_set());
        assert!(page.activate_enabled());
        assert!(!page.dialog.is_open());
        assert_eq!(page.phase(), ActivationPhase::NotActivated);
    }

    #[tokio::test]
    async fn test_save_validation() {
        let api = MockApi::start(vec![]).await;
        let mut page = page(&api, SessionSnapshot::default());

        for bad in ["0", "-5", "1.5", "abc"] {
            page.api_id = bad.to_string();
            assert!(page.save().await.unwrap_err().is_validation(), "{bad}");
            assert_eq!(page.status.text(), "Telegram API ID must be an integer > 0.");
        }

        page.api_id = "123".to_string();
        page.openai_resource = "x".to_string();
        assert!(page.save().await.is_err());
        assert_eq!(page.status.text(), "OpenAI resource selection is invalid.");

        page.openai_resource = String::new();
        page.prompt_resource = "2.5".to_string();
        assert!(page.save().await.is_err());
        assert_eq!(page.status.text(), "Prompt resource selection is invalid.");

        assert!(api.requests().is_empty());
    }
}
