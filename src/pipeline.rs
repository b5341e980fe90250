// invoice-pdf-service/src/pipeline.rs

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::calculator;
use crate::error::Result;
use crate::models::{GeneratedInvoice, InvoiceDocument, InvoiceRequest};
use crate::renderers::{HtmlRenderer, PdfConverter};

/// Orchestrates: calculate → render HTML → convert to PDF.
pub struct InvoicePipeline {
    renderer: HtmlRenderer,
    converter: Arc<dyn PdfConverter>,
}

impl InvoicePipeline {
    pub fn new(renderer: HtmlRenderer, converter: Arc<dyn PdfConverter>) -> Self {
        Self {
            renderer,
            converter,
        }
    }

    /// Expects a request that already passed validation.
    #[instrument(skip(self, request), fields(
        request_id = %Uuid::new_v4(),
        invoice_no = %request.invoice_no,
        items = request.items.len()
    ))]
    pub async fn process(&self, request: &InvoiceRequest) -> Result<GeneratedInvoice> {
        let start = Instant::now();

        // 1. Line totals and aggregate totals
        let processed_items = calculator::compute_lines(&request.items);
        let totals = calculator::aggregate(calculator::subtotal(&processed_items), request.tax_rate);

        info!(
            subtotal = %totals.subtotal_formatted,
            tax_amount = %totals.tax_amount_formatted,
            grand_total = %totals.grand_total_formatted,
            currency = %request.currency,
            "Invoice totals computed"
        );

        let document = InvoiceDocument {
            data: request,
            processed_items,
            totals,
        };

        // 2. Fill the template
        let html = self.renderer.render(&document).map_err(|e| {
            error!(error = %e, error_type = e.error_type(), "Template render failure");
            e
        })?;

        // 3. HTML → PDF
        let bytes = self.converter.convert(&html).await.map_err(|e| {
            error!(
                engine = self.converter.engine(),
                error = %e,
                "PDF conversion failure"
            );
            e
        })?;

        info!(
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Invoice PDF generated"
        );

        Ok(GeneratedInvoice {
            filename: GeneratedInvoice::filename_for(&request.invoice_no),
            bytes,
        })
    }
}
