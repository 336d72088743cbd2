pub mod token;
pub mod types;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ConsoleError, ServerCode};
use self::token::TokenPropagator;

/// Parsed response body. `None` when the body was empty or not JSON.
pub type Payload = Option<Value>;

/// Thin JSON wrapper over reqwest for the Resource API.
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: reqwest::Client,
    base_url: Url,
    tokens: TokenPropagator,
}

impl JsonClient {
    pub fn new(base_url: Url, tokens: TokenPropagator) -> Result<Self, ConsoleError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenPropagator {
        &self.tokens
    }

    /// Absolute request URL for an API path, token included.
    pub fn url_for(&self, path: &str) -> Result<Url, ConsoleError> {
        let url = self.base_url.join(path)?;
        Ok(self.tokens.apply_to_url(url))
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Payload, ConsoleError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ConsoleError::UnexpectedResponse(format!("unserializable body: {e}")))?;
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload, ConsoleError> {
        self.request(Method::DELETE, path, None).await
    }

    /// Sends one request and applies the console's error convention:
    /// the body is parsed as JSON whatever the status, and a non-2xx status
    /// fails with the payload's `detail` or `error` text.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Payload, ConsoleError> {
        let url = self.url_for(path)?;
        debug!("{} {}", method, path);

        let mut builder = self.client.request(method.clone(), url);
        if method == Method::POST {
            builder = builder.json(&body.unwrap_or_else(|| Value::Object(Default::default())));
        }

        let response = builder.send().await.inspect_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let payload: Payload = serde_json::from_slice(&bytes).ok();

        if !status.is_success() {
            let err = server_error(status.as_u16(), payload.as_ref());
            warn!("{} {} -> {}: {}", method, path, status, err);
            return Err(err);
        }

        Ok(payload)
    }
}

/// Decodes a success payload into a typed body.
pub fn decode<T: DeserializeOwned>(payload: Payload) -> Result<T, ConsoleError> {
    let value = payload.ok_or_else(|| ConsoleError::UnexpectedResponse("empty body".to_string()))?;
    serde_json::from_value(value).map_err(|e| ConsoleError::UnexpectedResponse(e.to_string()))
}

fn server_error(status: u16, payload: Option<&Value>) -> ConsoleError {
    let field = |key: &str| {
        payload
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let message = field("detail")
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("HTTP {status}"));

    let retry_after = payload
        .and_then(|p| p.get("retry_after"))
        .and_then(Value::as_f64)
        .or_else(|| match ServerCode::parse(&message) {
            Some(ServerCode::FloodWait(secs)) => Some(secs as f64),
            _ => None,
        });

    ConsoleError::Server {
        status,
        message,
        retry_after,
    }
}
