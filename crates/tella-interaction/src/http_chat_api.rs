use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tella_core::api::{
    CategoriesReply, ChatApi, ChatHistory, ChatReply, ChatRequest, ClearHistoryReply,
    ConfirmActionReply, ConfirmActionRequest,
};
use tella_core::category::PromptCategory;
use tella_core::{ClientConfig, Result, TellaError};

/// Path segment the backend mounts every chat endpoint under.
const API_PREFIX: &str = "api";

/// [`ChatApi`] over the backend's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    /// Creates a client with transport defaults (no timeouts).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Creates a client honoring the configured URL and timeouts.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TellaError::internal(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.api_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `segments` under the API prefix, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            TellaError::config(format!("Invalid API URL '{}': {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                TellaError::config(format!("API URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    async fn post_json<B, R>(&self, segments: &[&str], body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "tella::http", "POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R> {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "tella::http", "GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        decode_response(response).await
    }

    async fn delete_json<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R> {
        let url = self.endpoint(segments)?;
        tracing::debug!(target: "tella::http", "DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(transport_error)?;
        decode_response(response).await
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.post_json(&["chat"], request).await
    }

    async fn confirm_action(&self, request: &ConfirmActionRequest) -> Result<ConfirmActionReply> {
        self.post_json(&["chat", "confirm-action"], request).await
    }

    async fn categories(&self) -> Result<Vec<PromptCategory>> {
        let reply: CategoriesReply = self.get_json(&["chat", "categories"]).await?;
        Ok(reply.categories)
    }

    async fn history(&self, session_id: &str) -> Result<ChatHistory> {
        self.get_json(&["chat", "history", session_id]).await
    }

    async fn clear_history(&self, session_id: &str) -> Result<ClearHistoryReply> {
        self.delete_json(&["chat", "history", session_id]).await
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn transport_error(err: reqwest::Error) -> TellaError {
    TellaError::transport(err.to_string())
}

async fn decode_response<R: DeserializeOwned>(response: Response) -> Result<R> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_http_error(status, &body));
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builds an [`TellaError::Http`] from a `{"detail": ...}` error body.
///
/// String details are kept verbatim, structured ones (validation errors)
/// are rendered as compact JSON. Blank or missing details become `None`.
fn map_http_error(status: StatusCode, body: &str) -> TellaError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            None | Some(Value::Null) => None,
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
        })
        .filter(|detail| !detail.trim().is_empty());

    tracing::debug!(
        target: "tella::http",
        "Request failed with status {} (detail: {:?})",
        status,
        detail
    );
    TellaError::http(status.as_u16(), detail)
}
