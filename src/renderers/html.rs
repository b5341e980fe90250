// invoice-pdf-service/src/renderers/html.rs

use crate::error::Result;
use crate::models::InvoiceDocument;
use handlebars::Handlebars;
use std::path::Path;
use tracing::{debug, info};

const TEMPLATE_NAME: &str = "invoice";

/// Holds the compiled invoice template. Built once at startup, read-only after.
pub struct HtmlRenderer {
    handlebars: Handlebars<'static>,
}

impl HtmlRenderer {
    pub fn from_file(path: impl AsRef<Path>, escape_html: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut handlebars = Self::engine(escape_html);
        handlebars.register_template_file(TEMPLATE_NAME, path)?;

        info!(path = %path.display(), escape_html, "Invoice template loaded");

        Ok(Self { handlebars })
    }

    pub fn from_template_str(source: &str, escape_html: bool) -> Result<Self> {
        let mut handlebars = Self::engine(escape_html);
        handlebars.register_template_string(TEMPLATE_NAME, source)?;

        Ok(Self { handlebars })
    }

    fn engine(escape_html: bool) -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        if !escape_html {
            handlebars.register_escape_fn(handlebars::no_escape);
        }
        handlebars
    }

    pub fn render(&self, document: &InvoiceDocument<'_>) -> Result<String> {
        let html = self.handlebars.render(TEMPLATE_NAME, document)?;

        debug!(
            invoice_no = %document.data.invoice_no,
            size_bytes = html.len(),
            "Invoice HTML rendered"
        );

        Ok(html)
    }
}
