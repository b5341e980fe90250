use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use invoice_pdf_service::config::CorsConfig;
use invoice_pdf_service::pipeline::InvoicePipeline;
use invoice_pdf_service::renderers::{ConvertError, HtmlRenderer, PdfConverter};
use invoice_pdf_service::startup::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "http://localhost:8000";

pub const TEMPLATE: &str = "INVOICE {{data.invoice_no}} FOR {{data.billed_to}}\n\
    {{#each processed_items}}{{no}}. {{model}} {{qty}} {{unit}} x {{unit_price}} = {{line_total_formatted}}\n{{/each}}\
    SUBTOTAL {{subtotal_formatted}}\nTAX {{tax_amount_formatted}}\nTOTAL {{grand_total_formatted}} {{data.currency}}";

/// Hands the rendered HTML back as the "PDF" so tests can inspect it.
#[derive(Default)]
pub struct EchoConverter {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PdfConverter for EchoConverter {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(html.as_bytes().to_vec())
    }

    fn engine(&self) -> &str {
        "echo"
    }
}

pub enum Failure {
    MissingRuntime,
    Engine,
}

pub struct FailingConverter(pub Failure);

#[async_trait]
impl PdfConverter for FailingConverter {
    async fn convert(&self, _html: &str) -> Result<Vec<u8>, ConvertError> {
        Err(match self.0 {
            Failure::MissingRuntime => ConvertError::DependencyUnavailable {
                reason: "ImportError: DLL load failed while importing _ffi".to_string(),
                remediation: "Install the GTK+ runtime and set pdf.runtime_path to C:\\msys64\\mingw64\\bin"
                    .to_string(),
            },
            Failure::Engine => ConvertError::Failed("Invalid CSS at line 3".to_string()),
        })
    }

    fn engine(&self) -> &str {
        "failing"
    }
}

pub fn router_with(converter: Arc<dyn PdfConverter>) -> Router {
    router_with_template(TEMPLATE, converter)
}

pub fn router_with_template(template: &str, converter: Arc<dyn PdfConverter>) -> Router {
    let renderer = HtmlRenderer::from_template_str(template, false).expect("template compiles");
    let state = AppState::new("invoice-pdf-service", InvoicePipeline::new(renderer, converter));
    let cors = CorsConfig {
        allowed_origins: vec![ALLOWED_ORIGIN.to_string(), "null".to_string()],
    };
    build_router(state, &cors)
}

pub fn invoice_json() -> Value {
    json!({
        "invoice_no": "PI-2026-0042",
        "date": "18 Oct 2026",
        "billed_to": "ACME Trading Ltd",
        "attention_to": "Procurement",
        "delivery_term": "CIF",
        "validity_term": "30 days",
        "delivery_time": "3-4 weeks",
        "currency": "USD",
        "tax_rate": 10,
        "notes": "Prices exclude freight.",
        "contact_person": "R. Tan",
        "items": [
            {"model": "Widget", "qty": 2, "unit_price": 50.0},
            {"model": "Gadget", "qty": 1, "unit_price": 25.5}
        ]
    })
}

pub async fn post_invoice(app: Router, body: &Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/generate-invoice")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is JSON")
}
