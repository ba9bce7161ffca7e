use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{User, UserDraft, UserId},
    error::ErrorCode,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod commands;
pub mod controller;
pub mod view;

pub use commands::DirectoryCommand;
pub use controller::{DirectoryController, EditTarget, Outcome};
pub use view::{DirectoryView, SubmitLabel, TableRow};

/// Collection endpoint used when no other URL is configured.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid collection url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Builder(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API Error: {status} - {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    pub fn kind(&self) -> ErrorCode {
        match self {
            ClientError::Transport { .. } | ClientError::Status { .. } => ErrorCode::Network,
            ClientError::InvalidUrl { .. }
            | ClientError::Builder(_)
            | ClientError::Decode { .. } => ErrorCode::Unexpected,
        }
    }
}

/// CRUD operations against the remote user collection.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, ClientError>;
    async fn create_user(&self, draft: &UserDraft) -> Result<User, ClientError>;
    async fn update_user(&self, id: UserId, draft: &UserDraft) -> Result<User, ClientError>;
    async fn delete_user(&self, id: UserId) -> Result<(), ClientError>;
}

/// [`DirectoryApi`] over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    http: Client,
    collection_url: Url,
}

impl HttpDirectoryClient {
    pub fn new(collection_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(collection_url, None)
    }

    /// Builds a client whose requests give up after `timeout`. `None` waits indefinitely.
    pub fn with_timeout(
        collection_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let collection_url = parse_collection_url(collection_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Builder)?;
        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn member_url(&self, id: UserId) -> Result<Url, ClientError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.collection_url.to_string(),
                reason: "url cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    async fn execute(&self, url: &Url, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, %status, "directory api response");
        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.execute(url, request).await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let url = &self.collection_url;
        self.execute_json(url, self.http.get(url.clone())).await
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<User, ClientError> {
        let url = &self.collection_url;
        self.execute_json(url, self.http.post(url.clone()).json(draft))
            .await
    }

    async fn update_user(&self, id: UserId, draft: &UserDraft) -> Result<User, ClientError> {
        let url = self.member_url(id)?;
        self.execute_json(&url, self.http.put(url.clone()).json(draft))
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        let url = self.member_url(id)?;
        self.execute(&url, self.http.delete(url.clone())).await?;
        Ok(())
    }
}

fn parse_collection_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: "url cannot carry path segments".to_string(),
        });
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
