use crate::cancel::CancelToken;
use crate::env_variable_utils::API_BASE_URL;
use crate::session::Session;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_sys::{FormData, RequestCredentials};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Request(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("JSON parse error: {0}")]
    Decode(String),
    #[error("Request aborted")]
    Aborted,
}

impl ApiError {
    fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty());
        ApiError::Status { status, message }
    }

    /// The `message` field of a JSON error body, when the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client bound to the REST API base URL. Every request carries cookies;
/// authenticated calls additionally take the caller's [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(API_BASE_URL.as_str())
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn prepare(
        &self,
        builder: RequestBuilder,
        session: Option<&Session>,
        cancel: &CancelToken,
    ) -> RequestBuilder {
        let signal = cancel.signal();
        let builder = builder
            .credentials(RequestCredentials::Include)
            .abort_signal(signal.as_ref());

        match session.and_then(Session::authorization) {
            Some(authorization) => builder.header("Authorization", &authorization),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancelToken,
    ) -> Result<T, ApiError> {
        let request = self.prepare(Request::get(&self.url(path)), None, cancel).build();
        decode(dispatch(request, cancel).await?, cancel).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        session: Option<&Session>,
        cancel: &CancelToken,
    ) -> Result<T, ApiError> {
        let request = self
            .prepare(Request::post(&self.url(path)), session, cancel)
            .json(body);
        decode(dispatch(request, cancel).await?, cancel).await
    }

    /// Multipart POST whose response body is ignored.
    pub async fn post_form(
        &self,
        path: &str,
        form: FormData,
        session: &Session,
        cancel: &CancelToken,
    ) -> Result<(), ApiError> {
        let request = self
            .prepare(Request::post(&self.url(path)), Some(session), cancel)
            .body(form);
        dispatch(request, cancel).await.map(|_| ())
    }

    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
        cancel: &CancelToken,
    ) -> Result<T, ApiError> {
        let request = self
            .prepare(Request::delete(&self.url(path)), Some(session), cancel)
            .build();
        decode(dispatch(request, cancel).await?, cancel).await
    }

    /// DELETE whose response body is ignored.
    pub async fn delete(
        &self,
        path: &str,
        session: &Session,
        cancel: &CancelToken,
    ) -> Result<(), ApiError> {
        let request = self
            .prepare(Request::delete(&self.url(path)), Some(session), cancel)
            .build();
        dispatch(request, cancel).await.map(|_| ())
    }
}

/// Sends a prepared request and turns non-success statuses into errors.
pub async fn dispatch(
    request: Result<Request, gloo_net::Error>,
    cancel: &CancelToken,
) -> Result<Response, ApiError> {
    let request = request.map_err(|e| ApiError::Request(e.to_string()))?;

    let response = request.send().await.map_err(|e| {
        if cancel.is_cancelled() {
            ApiError::Aborted
        } else {
            ApiError::Network(e.to_string())
        }
    })?;

    if cancel.is_cancelled() {
        return Err(ApiError::Aborted);
    }

    if response.ok() {
        Ok(response)
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &text))
    }
}

pub async fn decode<T: DeserializeOwned>(
    response: Response,
    cancel: &CancelToken,
) -> Result<T, ApiError> {
    let value = response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if cancel.is_cancelled() {
        Err(ApiError::Aborted)
    } else {
        Ok(value)
    }
}

/// Percent-encodes a single path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
