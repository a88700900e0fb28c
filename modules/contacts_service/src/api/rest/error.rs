//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::ContactsError;
use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    extract::multipart::MultipartRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip)]
    bearer_challenge: bool,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            bearer_challenge: false,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Answer with `WWW-Authenticate: Bearer`
    pub fn with_bearer_challenge(mut self) -> Self {
        self.bearer_challenge = true;
        self
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error").with_detail(detail)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .with_detail("An unexpected error occurred")
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.bearer_challenge {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(self)).into_response()
        } else {
            (status, Json(self)).into_response()
        }
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: ContactsError) -> Problem {
    match error {
        ContactsError::NotFound { message, .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Not Found").with_detail(message)
        }

        ContactsError::Conflict { reason } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(reason)
        }

        ContactsError::BadRequest { reason } => {
            Problem::new(StatusCode::BAD_REQUEST, "Bad Request").with_detail(reason)
        }

        ContactsError::Validation { message } => Problem::unprocessable(message),

        ContactsError::Unauthorized { reason } => Problem::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
        )
        .with_detail(reason)
        .with_bearer_challenge(),

        ContactsError::Forbidden { reason } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(reason)
        }

        ContactsError::TooManyRequests => Problem::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too Many Requests",
        )
        .with_detail(crate::domain::messages::TOO_MANY_REQUESTS),

        ContactsError::Internal => Problem::internal(),
    }
}

impl From<ContactsError> for Problem {
    fn from(error: ContactsError) -> Self {
        map_domain_error(error)
    }
}

impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Problem::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Media Type",
            )
            .with_detail(rejection.body_text()),
            _ => Problem::unprocessable(rejection.body_text()),
        }
    }
}

impl From<FormRejection> for Problem {
    fn from(rejection: FormRejection) -> Self {
        Problem::unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for Problem {
    fn from(rejection: QueryRejection) -> Self {
        Problem::unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for Problem {
    fn from(rejection: PathRejection) -> Self {
        Problem::unprocessable(rejection.body_text())
    }
}

impl From<MultipartRejection> for Problem {
    fn from(rejection: MultipartRejection) -> Self {
        Problem::unprocessable(rejection.body_text())
    }
}
