//! Reqwest-backed client for the hosted backend's REST surface.
//!
//! The client owns transport details only: URL construction, auth headers,
//! timeout and HTTP status mapping, and JSON decoding. Repositories built on
//! top of it translate [`RestError`] into their port errors.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::dto::AuthUserDto;
use super::query::TableQuery;
use crate::config::BackendConfig;

const REST_PREFIX: &str = "rest/v1/";
const AUTH_PREFIX: &str = "auth/v1/";
const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestError {
    #[error("request timed out: {message}")]
    Timeout { message: String },
    #[error("transport failed: {message}")]
    Transport { message: String },
    /// 401 or 403.
    #[error("not authorised: {message}")]
    Unauthorized { message: String },
    /// Any other 4xx.
    #[error("request rejected: {message}")]
    Rejected { message: String },
    #[error("backend failed: {message}")]
    Server { message: String },
    #[error("response did not decode: {message}")]
    Decode { message: String },
    #[error("client misconfigured: {message}")]
    Client { message: String },
}

/// Thin HTTP wrapper holding the backend config and a pooled client.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    config: BackendConfig,
}

impl RestClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Client`] when headers are not valid HTTP header
    /// values or the reqwest client cannot be constructed.
    pub fn new(config: BackendConfig) -> Result<Self, RestError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(config.anon_key())?);
        let mut bearer = header_value(&format!("Bearer {}", config.bearer()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|err| RestError::Client {
                message: err.to_string(),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// `GET /rest/v1/{table}` with the query's filters.
    pub async fn select<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>, RestError> {
        let request = self
            .table_request(Method::GET, query.table_name())?
            .query(query.params());
        let body = self.send(query.table_name(), request).await?;
        decode(&body)
    }

    /// `POST /rest/v1/{table}` returning the inserted rows.
    pub async fn insert<B, T>(&self, table: &'static str, rows: &B) -> Result<Vec<T>, RestError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .table_request(Method::POST, table)?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(rows);
        let body = self.send(table, request).await?;
        decode(&body)
    }

    /// `POST /rest/v1/{table}?on_conflict=...` merging duplicates.
    pub async fn upsert<B, T>(
        &self,
        table: &'static str,
        on_conflict: &str,
        rows: &B,
    ) -> Result<Vec<T>, RestError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .table_request(Method::POST, table)?
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", MERGE_DUPLICATES)
            .json(rows);
        let body = self.send(table, request).await?;
        decode(&body)
    }

    /// `PATCH /rest/v1/{table}` on the filtered rows.
    pub async fn update<B, T>(&self, query: &TableQuery, patch: &B) -> Result<Vec<T>, RestError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .table_request(Method::PATCH, query.table_name())?
            .query(query.params())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);
        let body = self.send(query.table_name(), request).await?;
        decode(&body)
    }

    /// `DELETE /rest/v1/{table}` on the filtered rows, returning them.
    pub async fn delete<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>, RestError> {
        let request = self
            .table_request(Method::DELETE, query.table_name())?
            .query(query.params())
            .header("Prefer", RETURN_REPRESENTATION);
        let body = self.send(query.table_name(), request).await?;
        decode(&body)
    }

    /// `POST /rest/v1/rpc/{function}`. The response body is ignored.
    pub async fn rpc<B>(&self, function: &str, args: &B) -> Result<(), RestError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(&format!("{REST_PREFIX}rpc/{function}"))?;
        let request = self.client.post(url).json(args);
        self.send(function, request).await.map(|_| ())
    }

    /// `GET /auth/v1/user`. `None` without an access token or when the
    /// token is no longer accepted.
    pub async fn current_user(&self) -> Result<Option<AuthUserDto>, RestError> {
        if self.config.access_token().is_none() {
            return Ok(None);
        }
        let url = self.endpoint(&format!("{AUTH_PREFIX}user"))?;
        match self.send("auth/user", self.client.get(url)).await {
            Ok(body) => decode(&body).map(Some),
            Err(RestError::Unauthorized { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// `POST /auth/v1/logout`. A no-op without an access token.
    pub async fn logout(&self) -> Result<(), RestError> {
        if self.config.access_token().is_none() {
            return Ok(());
        }
        let url = self.endpoint(&format!("{AUTH_PREFIX}logout"))?;
        self.send("auth/logout", self.client.post(url))
            .await
            .map(|_| ())
    }

    fn table_request(&self, method: Method, table: &str) -> Result<RequestBuilder, RestError> {
        let url = self.endpoint(&format!("{REST_PREFIX}{table}"))?;
        Ok(self.client.request(method, url))
    }

    fn endpoint(&self, path: &str) -> Result<Url, RestError> {
        self.config
            .base_url()
            .join(path)
            .map_err(|err| RestError::Client {
                message: format!("cannot build URL for {path}: {err}"),
            })
    }

    async fn send(&self, resource: &str, request: RequestBuilder) -> Result<Vec<u8>, RestError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(resource, status = status.as_u16(), bytes = body.len(), "backend request");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RestError> {
    HeaderValue::from_str(value).map_err(|err| RestError::Client {
        message: format!("invalid header value: {err}"),
    })
}

pub(super) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RestError> {
    serde_json::from_slice(body).map_err(|err| RestError::Decode {
        message: format!("{err} in {}", body_preview(body)),
    })
}

fn map_transport_error(error: reqwest::Error) -> RestError {
    if error.is_timeout() {
        RestError::Timeout {
            message: error.to_string(),
        }
    } else {
        RestError::Transport {
            message: error.to_string(),
        }
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> RestError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RestError::Unauthorized { message },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RestError::Timeout { message },
        _ if status.is_client_error() => RestError::Rejected { message },
        _ => RestError::Server { message },
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
