// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to one of the hosted vendors (Gemini, D-ID, RunwayML, Shotstack, Instagram, file hosts)
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
    #[error("{field} not found in {service} response")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },
    #[error("{service} error: {message}")]
    TaskFailed {
        service: &'static str,
        message: String,
    },
    #[error("{service} task timed out after {attempts} polls")]
    Timeout { service: &'static str, attempts: u32 },
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image conversion failed: {0}")]
    Image(#[from] image::ImageError),
}

impl VendorError {
    pub fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> VendorError {
        move |source| VendorError::Http { service, source }
    }

    pub fn decode(service: &'static str) -> impl FnOnce(serde_json::Error) -> VendorError {
        move |e| VendorError::Decode {
            service,
            message: e.to_string(),
        }
    }

    /// Errors worth another attempt while polling: network hiccups, 5xx/429 and garbled bodies.
    /// Anything the vendor reports as final is not.
    pub fn is_transient(&self) -> bool {
        match self {
            VendorError::Http { .. } | VendorError::Decode { .. } => true,
            VendorError::Api { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Turns a non-success response into `VendorError::Api` with the body attached
pub async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, VendorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::error!("{} API error ({}): {}", service, status, body);
    Err(VendorError::Api {
        service,
        status,
        body,
    })
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("step {step} failed ({stage}): {source}")]
    Step {
        step: u8,
        stage: &'static str,
        #[source]
        source: VendorError,
    },
    #[error("{0}")]
    Vendor(#[from] VendorError),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        details: Option<String>,
    },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn internal(message: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }

    pub fn project_not_found() -> Self {
        ApiError::NotFound("Project not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Internal { message, details } => {
                let body = match details {
                    Some(details) => json!({ "error": message, "details": details }),
                    None => json!({ "error": message }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
