use crate::error::Error;
use crate::mirror::ResourceKind;
use async_trait::async_trait;
use log::*;
use reqwest::Client;
use serde_json::Value;

/// Bulk-fetch boundary used by the reconciliation loop. The trait exists so
/// session logic can be tested without a server.
#[async_trait]
pub trait BulkFetch: Send + Sync {
    /// Fetch the full current collection for a kind, in the server's order.
    async fn fetch_collection(&self, kind: ResourceKind) -> Result<Vec<Value>, Error>;
}

/// HTTP client for the noticeboard REST API. Holds the session cookie jar,
/// so a successful `login` authenticates all later requests.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Log in with email and password and return the session cookie value.
    /// The cookie also lands in the client's jar for later REST requests; the
    /// returned value is for the separate SSE transport connection.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, Error> {
        let url = format!("{}/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!("login failed: {}", response.status())));
        }

        let session_cookie = response
            .cookies()
            .find(|cookie| cookie.name() == "id")
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| Error::Fetch("no session cookie in login response".to_string()))?;

        debug!("Logged in as {email}");
        Ok(session_cookie)
    }
}

#[async_trait]
impl BulkFetch for ApiClient {
    async fn fetch_collection(&self, kind: ResourceKind) -> Result<Vec<Value>, Error> {
        let url = format!("{}{}", self.base_url, kind.collection_path());

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "GET {} returned {}",
                kind.collection_path(),
                response.status()
            )));
        }

        let body: Value = response.json().await?;

        // Unwrap the ApiResponse envelope.
        body.get("data")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                Error::Fetch(format!(
                    "GET {} response has no data array",
                    kind.collection_path()
                ))
            })
    }
}
