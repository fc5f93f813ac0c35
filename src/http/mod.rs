pub mod client;
pub mod envelope;

#[cfg(test)]
pub mod fake;

pub use client::{ApiClient, ApiRequest, ApiResponse, HttpTransport, Method, RawResponse, ReqwestTransport};
pub use envelope::{ListPayload, Page, PageMetadata};

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("json error: {0}")]
    Decode(String),
}

impl HttpError {
    /// Message supplied by the backend in the error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            HttpError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
