use secrecy::{ExposeSecret, SecretString};

/// What a secret field holds when the user submits the form.
#[derive(Debug)]
pub enum SecretEntry {
    /// The mask of an already stored secret is still displayed.
    Unchanged,
    Empty,
    New(SecretString),
}

/// Input for a stored secret that is never shown back in plain form.
///
/// While a secret is stored the field displays a fixed mask. Focusing the
/// untouched mask clears it for fresh entry, and leaving the field empty
/// puts the mask back so an untouched form never submits an empty secret.
#[derive(Debug)]
pub struct SecretField {
    value: SecretString,
    has_secret: bool,
    mask: String,
    obscured: bool,
}

impl SecretField {
    /// `server_mask` is the mask rendered by the page; when missing or blank
    /// the mask is `default_mask_len` asterisks.
    pub fn new(has_secret: bool, server_mask: Option<&str>, default_mask_len: usize) -> Self {
        let mask = server_mask
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "*".repeat(default_mask_len));
        let value = if has_secret { mask.clone() } else { String::new() };
        Self {
            value: SecretString::new(value),
            has_secret,
            mask,
            obscured: true,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.has_secret
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }

    pub fn is_obscured(&self) -> bool {
        self.obscured
    }

    pub fn shows_mask(&self) -> bool {
        self.has_secret && self.value.expose_secret() == &self.mask
    }

    pub fn is_blank(&self) -> bool {
        self.value.expose_secret().trim().is_empty()
    }

    pub fn input(&mut self, text: &str) {
        self.value = SecretString::new(text.to_string());
    }

    pub fn focus(&mut self) {
        if self.shows_mask() {
            self.value = SecretString::new(String::new());
        }
    }

    pub fn blur(&mut self) {
        if self.has_secret && self.is_blank() {
            self.value = SecretString::new(self.mask.clone());
        }
    }

    /// Flips plain/obscured rendering and returns the new button label.
    pub fn toggle_visibility(&mut self) -> &'static str {
        self.obscured = !self.obscured;
        self.toggle_label()
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.obscured {
            "Show"
        } else {
            "Hide"
        }
    }

    /// What the field would render: bullets while obscured.
    pub fn display(&self) -> String {
        let value = self.value.expose_secret();
        if self.obscured {
            "•".repeat(value.chars().count())
        } else {
            value.clone()
        }
    }

    /// The mask, even with surrounding whitespace, never counts as a new value.
    pub fn entry(&self) -> SecretEntry {
        let trimmed = self.value.expose_secret().trim();
        if self.has_secret && trimmed == self.mask {
            return SecretEntry::Unchanged;
        }
        if trimmed.is_empty() {
            SecretEntry::Empty
        } else {
            SecretEntry::New(SecretString::new(trimmed.to_string()))
        }
    }

    pub fn mark_saved(&mut self) {
        self.has_secret = true;
        self.value = SecretString::new(self.mask.clone());
        self.obscured = true;
    }

    pub fn mark_cleared(&mut self) {
        self.has_secret = false;
        self.value = SecretString::new(String::new());
    }
}
