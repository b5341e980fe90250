// invoice-pdf-service/src/http/handler.rs

use crate::error::{Result, ServiceError};
use crate::http::ValidatedJson;
use crate::models::InvoiceRequest;
use crate::startup::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info};

/// `POST /generate-invoice`: returns the rendered invoice as a PDF attachment.
pub async fn generate_invoice(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<InvoiceRequest>,
) -> Result<Response> {
    let invoice = state.pipeline.process(&request).await.map_err(|e| {
        error!(
            invoice_no = %request.invoice_no,
            error_type = e.error_type(),
            "Failed to generate invoice"
        );
        e
    })?;

    // from_bytes keeps non-ASCII invoice numbers intact
    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{}\"", invoice.filename).as_bytes(),
    )
    .map_err(|e| ServiceError::InvalidBody {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: format!("invoice_no cannot be used as a filename: {}", e),
    })?;

    info!(filename = %invoice.filename, "Sending invoice PDF");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        invoice.bytes,
    )
        .into_response())
}

/// Pre-flight requests are answered by the CORS layer with an empty 200;
/// this reports them as 204 No Content.
pub async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": state.service_name.as_ref(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
