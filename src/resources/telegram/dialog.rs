use crate::ui::StatusDisplay;

/// How the activation dialog was closed without confirming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Cancel,
    Backdrop,
    Escape,
}

/// Modal asking for the Telegram confirmation code.
#[derive(Debug, Default)]
pub struct ActivationDialog {
    open: bool,
    pub code: String,
    pub status: StatusDisplay,
}

impl ActivationDialog {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens with an empty code input and no message.
    pub fn open(&mut self) {
        self.code.clear();
        self.status.clear();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Discards the typed code; session state is not touched.
    pub fn dismiss(&mut self, _how: Dismissal) {
        self.code.clear();
        self.status.clear();
        self.open = false;
    }
}
