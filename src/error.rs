// invoice-pdf-service/src/error.rs

use crate::renderers::ConvertError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Rendering error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("{0}")]
    Conversion(#[from] ConvertError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::InvalidBody { .. } => "invalid_body",
            ServiceError::Template(_) => "template_error",
            ServiceError::Render(_) => "render_error",
            ServiceError::Conversion(ConvertError::DependencyUnavailable { .. }) => {
                "dependency_unavailable"
            }
            ServiceError::Conversion(_) => "conversion_error",
            ServiceError::Io(_) => "io_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::InvalidBody { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ServiceError::Validation(errors) => json!(errors),
            ServiceError::InvalidBody { message, .. } => json!(message),
            ServiceError::Conversion(ConvertError::DependencyUnavailable {
                remediation, ..
            }) => json!(remediation),
            other => json!(format!(
                "An unexpected error occurred during PDF generation: {}",
                other
            )),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
