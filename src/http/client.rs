use std::{marker::PhantomData, sync::Arc, time::Duration};

use async_trait::async_trait;
use derive_more::Display;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{HttpError, envelope::unwrap_envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    #[display(fmt = "GET")]
    Get,
    #[display(fmt = "POST")]
    Post,
    #[display(fmt = "PATCH")]
    Patch,
    #[display(fmt = "DELETE")]
    Delete,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Status and decoded JSON body of a 2xx response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

/// One round trip to the backend.
///
/// Implementations resolve 2xx responses to `Ok` and reject everything else
/// with [`HttpError::Status`], carrying the backend's `message` when present.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, HttpError>;
}

pub struct ReqwestTransport {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hrm-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, HttpError> {
        let url = format!("{}{}", self.base_url, request.path);
        let request_id = Uuid::new_v4().to_string();

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Patch => self.http.patch(&url),
            Method::Delete => self.http.delete(&url),
        }
        .header("x-request-id", &request_id)
        .query(&request.query);

        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %url, request_id = %request_id, "Upstream request");

        let res = builder.send().await.map_err(map_reqwest_error)?;
        let status = res.status();
        let bytes = res.bytes().await.map_err(map_reqwest_error)?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(v) => v,
                Err(e) if status.is_success() => return Err(HttpError::Decode(e.to_string())),
                Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            }
        };

        if !status.is_success() {
            warn!(
                method = %request.method,
                url = %url,
                status = status.as_u16(),
                request_id = %request_id,
                "Upstream rejected request"
            );
            return Err(HttpError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Transport(e.to_string())
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A 2xx response whose payload has not been decoded yet.
///
/// Decoding is deferred until the caller has checked the status against the
/// codes the operation expects, so an unexpected status never fails on shape.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: u16,
    body: Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Unwraps the `{ status, data }` envelope when `status` is one of
    /// `success`; any other status yields `Ok(None)`.
    pub fn expect(self, success: &[u16]) -> Result<Option<T>, HttpError> {
        if !success.contains(&self.status) {
            debug!(status = self.status, expected = ?success, "Unexpected upstream status");
            return Ok(None);
        }

        serde_json::from_value(unwrap_envelope(self.body))
            .map(Some)
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}

/// Typed get/post/patch/delete over an [`HttpTransport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<ApiResponse<T>, HttpError> {
        self.execute(Method::Get, path, query, None).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, HttpError> {
        let body = encode(body)?;
        self.execute(Method::Post, path, Vec::new(), Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, HttpError> {
        let body = encode(body)?;
        self.execute(Method::Patch, path, Vec::new(), Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, HttpError> {
        self.execute(Method::Delete, path, Vec::new(), None).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, HttpError> {
        let raw = self
            .transport
            .send(ApiRequest {
                method,
                path: path.to_string(),
                query,
                body,
            })
            .await?;

        Ok(ApiResponse {
            status: raw.status,
            body: raw.body,
            _marker: PhantomData,
        })
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, HttpError> {
    serde_json::to_value(body).map_err(|e| HttpError::Decode(e.to_string()))
}
