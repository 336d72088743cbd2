use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Err,
    Info,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Ok => "ok",
            StatusKind::Err => "err",
            StatusKind::Info => "info",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
    pub shown_at: DateTime<Utc>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.text)
    }
}

/// A page region holding at most one transient message.
#[derive(Debug, Clone, Default)]
pub struct StatusDisplay {
    current: Option<Status>,
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, kind: StatusKind, text: impl Into<String>) {
        let text = text.into();
        debug!("status {}: {}", kind, text);
        self.current = Some(Status {
            kind,
            text,
            shown_at: Utc::now(),
        });
    }

    pub fn ok(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Ok, text);
    }

    pub fn err(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Err, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.show(StatusKind::Info, text);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn kind(&self) -> Option<StatusKind> {
        self.current.as_ref().map(|s| s.kind)
    }

    pub fn text(&self) -> &str {
        self.current.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_previous_message() {
        let mut status = StatusDisplay::new();
        assert!(!status.is_visible());

        status.info("Saving...");
        status.ok("Saved.");
        assert_eq!(status.kind(), Some(StatusKind::Ok));
        assert_eq!(status.text(), "Saved.");
        assert_eq!(status.current().unwrap().to_string(), "[ok] Saved.");
    }

    #[test]
    fn test_each_message_is_timestamped() {
        let mut status = StatusDisplay::new();
        status.info("Checking...");
        let first = status.current().unwrap().shown_at;
        status.ok("API key works.");
        assert!(status.current().unwrap().shown_at >= first);
    }

    #[test]
    fn test_clear_hides_region() {
        let mut status = StatusDisplay::new();
        status.err("boom");
        status.clear();
        assert!(!status.is_visible());
        assert_eq!(status.text(), "");
    }
}
