//! HTTP client for the endpoints the page script talks to.

use crate::handlers::USER_HEADER;
use crate::models::{LikeResponse, MessageView, StatsResponse, User};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("like target has no message id")]
    MissingMessageId,

    #[error("invalid base url {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// One entry of an autocomplete source: a bare string or a `{label, value}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestion {
    Plain(String),
    Labeled {
        #[serde(default)]
        label: String,
        #[serde(default)]
        value: String,
    },
}

impl Suggestion {
    /// Text shown and matched against; a record without a label falls back to its value.
    pub fn label(&self) -> &str {
        match self {
            Suggestion::Plain(text) => text,
            Suggestion::Labeled { label, value } if label.is_empty() => value,
            Suggestion::Labeled { label, .. } => label,
        }
    }

    /// Text placed in the input when chosen.
    pub fn value(&self) -> &str {
        match self {
            Suggestion::Plain(text) => text,
            Suggestion::Labeled { label, value } if value.is_empty() => label,
            Suggestion::Labeled { value, .. } => value,
        }
    }
}

/// The two calls the page behaviors depend on.
pub trait WarblerApi {
    fn like(
        &self,
        message_id: &str,
    ) -> impl Future<Output = Result<LikeResponse, ClientError>> + Send;

    fn suggestions(&self) -> impl Future<Output = Result<Vec<Suggestion>, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct WarblerClient {
    base_url: String,
    user: Option<String>,
    http: Client,
}

impl WarblerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user: None,
            http: Client::new(),
        }
    }

    /// Sends requests on behalf of `username` instead of the server's default user.
    pub fn with_user(mut self, username: impl Into<String>) -> Self {
        self.user = Some(username.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_user(&self, username: &str) -> Result<User, ClientError> {
        let request = self
            .http
            .post(self.url("/api/users"))
            .json(&serde_json::json!({ "username": username }));
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn post_message(&self, text: &str) -> Result<MessageView, ClientError> {
        let request = self
            .http
            .post(self.url("/api/messages"))
            .json(&serde_json::json!({ "text": text }));
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn message(&self, message_id: u64) -> Result<MessageView, ClientError> {
        let url = self.url(&format!("/api/messages/{message_id}"));
        Ok(self.send(self.http.get(url)).await?.json().await?)
    }

    pub async fn delete_message(&self, message_id: u64) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/messages/{message_id}"));
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    pub async fn messages(&self) -> Result<Vec<MessageView>, ClientError> {
        Ok(self.send(self.http.get(self.url("/api/messages"))).await?.json().await?)
    }

    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        Ok(self.send(self.http.get(self.url("/api/stats"))).await?.json().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Appends `segments` to the base url, percent-encoding each one.
    fn segment_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match &self.user {
            Some(user) => request.header(USER_HEADER, user),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }
}

impl WarblerApi for WarblerClient {
    async fn like(&self, message_id: &str) -> Result<LikeResponse, ClientError> {
        let message_id = message_id.trim();
        if message_id.is_empty() {
            return Err(ClientError::MissingMessageId);
        }

        let url = self.segment_url(&["messages", message_id, "add"])?;
        let request = self.http.post(url);
        Ok(self.send(request).await?.json().await?)
    }

    async fn suggestions(&self) -> Result<Vec<Suggestion>, ClientError> {
        Ok(self.send(self.http.get(self.url("/autocomplete"))).await?.json().await?)
    }
}
