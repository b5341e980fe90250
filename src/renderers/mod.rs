// invoice-pdf-service/src/renderers/mod.rs

mod html;
mod pdf;

pub use html::HtmlRenderer;
pub use pdf::{ConvertError, PdfConverter, WeasyPrintConverter};
