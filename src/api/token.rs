use url::Url;

/// Carries the console's `token` query parameter onto outgoing requests and
/// page links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenPropagator {
    token: Option<String>,
}

impl TokenPropagator {
    /// Blank tokens are treated as absent.
    pub fn new(token: Option<&str>) -> Self {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { token }
    }

    /// Reads `token` from the query string of the page the console was opened at.
    pub fn from_page_url(page: &Url) -> Self {
        let token = page
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned());
        Self::new(token.as_deref())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn apply_to_url(&self, mut url: Url) -> Url {
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        url
    }

    /// Same as [`apply_to_url`](Self::apply_to_url) for a possibly relative href.
    pub fn patch_href(&self, href: &str) -> String {
        let Some(token) = &self.token else {
            return href.to_string();
        };
        let sep = if href.contains('?') { '&' } else { '?' };
        format!("{href}{sep}token={}", urlencoding::encode(token))
    }
}
