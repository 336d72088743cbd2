use thiserror::Error;

/// Every way a console action can fail.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer from the Resource API.
    #[error("{message}{}", retry_hint(.retry_after))]
    Server {
        status: u16,
        message: String,
        retry_after: Option<f64>,
    },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ConsoleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ConsoleError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation(_))
    }

    /// Known backend error code carried in a server error's `detail`.
    pub fn server_code(&self) -> Option<ServerCode> {
        match self {
            ConsoleError::Server { message, .. } => ServerCode::parse(message),
            _ => None,
        }
    }
}

fn retry_hint(retry_after: &Option<f64>) -> String {
    match *retry_after {
        Some(secs) => format!(", retry after {} s", secs.ceil() as u64),
        None => String::new(),
    }
}

/// Error codes the session endpoints put in `detail`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerCode {
    FloodWait(u64),
    SendCodeUnavailable,
    InvalidOrExpiredCode,
    TwoFactorRequired,
    ActivationNotStarted,
    NotActivated,
    NoSession,
}

impl ServerCode {
    pub fn parse(detail: &str) -> Option<Self> {
        let detail = detail.trim();
        if let Some(secs) = detail.strip_prefix("FLOOD_WAIT:") {
            return secs.trim().parse().ok().map(ServerCode::FloodWait);
        }
        match detail {
            "SEND_CODE_UNAVAILABLE" => Some(ServerCode::SendCodeUnavailable),
            "INVALID_OR_EXPIRED_CODE" => Some(ServerCode::InvalidOrExpiredCode),
            "2FA_REQUIRED" => Some(ServerCode::TwoFactorRequired),
            "ACTIVATION_NOT_STARTED" => Some(ServerCode::ActivationNotStarted),
            "NOT_ACTIVATED" => Some(ServerCode::NotActivated),
            "NO_SESSION" => Some(ServerCode::NoSession),
            _ => None,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            ServerCode::FloodWait(secs) => {
                format!("Telegram asks to wait {secs} s before requesting another code")
            }
            ServerCode::SendCodeUnavailable => {
                "Telegram has no delivery options left for this number; try again later".to_string()
            }
            ServerCode::InvalidOrExpiredCode => "the code is invalid or has expired".to_string(),
            ServerCode::TwoFactorRequired => {
                "this account has two-step verification enabled".to_string()
            }
            ServerCode::ActivationNotStarted => {
                "activation was not started; request a code first".to_string()
            }
            ServerCode::NotActivated => "the session is not activated".to_string(),
            ServerCode::NoSession => "no stored session for this resource".to_string(),
        }
    }
}

/// Human readable text for a failed action: the hint for known codes,
/// otherwise the error itself.
pub fn describe(err: &ConsoleError) -> String {
    match err.server_code() {
        Some(ServerCode::FloodWait(secs)) => ServerCode::FloodWait(secs).hint(),
        Some(code) => format!("{} ({})", code.hint(), err),
        None => err.to_string(),
    }
}
