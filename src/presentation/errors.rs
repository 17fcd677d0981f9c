// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::application::session::SessionError;
use crate::application::usecases::submit_task::SubmissionError;
use crate::domain::scraping::provider::ProviderError;

/// 请求本身不合法
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(String),
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按具体错误类型决定状态码
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn provider(error: &ProviderError) -> (StatusCode, Option<Value>) {
        match error {
            ProviderError::MissingCredentials => (StatusCode::INTERNAL_SERVER_ERROR, None),
            ProviderError::InvalidTaskId(_) => (StatusCode::BAD_REQUEST, None),
            other => (StatusCode::INTERNAL_SERVER_ERROR, Some(other.details())),
        }
    }

    fn submission(error: &SubmissionError) -> (StatusCode, Option<Value>) {
        match error {
            SubmissionError::Validation(_) => (StatusCode::BAD_REQUEST, None),
            SubmissionError::Provider(provider) => Self::provider(provider),
        }
    }

    fn classify(&self) -> (StatusCode, Option<Value>) {
        if let Some(e) = self.0.downcast_ref::<RequestError>() {
            return match e {
                RequestError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            };
        }
        if let Some(e) = self.0.downcast_ref::<SubmissionError>() {
            return Self::submission(e);
        }
        if let Some(e) = self.0.downcast_ref::<ProviderError>() {
            return Self::provider(e);
        }
        if let Some(e) = self.0.downcast_ref::<SessionError>() {
            return match e {
                SessionError::NoTask | SessionError::NothingToExport => {
                    (StatusCode::NOT_FOUND, None)
                }
                SessionError::Busy => (StatusCode::CONFLICT, None),
                SessionError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
                SessionError::Submission(inner) => Self::submission(inner),
                SessionError::Provider(inner) => Self::provider(inner),
            };
        }
        (StatusCode::INTERNAL_SERVER_ERROR, None)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();
        let (status, details) = self.classify();

        if status.is_server_error() {
            error!("Request failed: {}", error_message);
        }

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
