// invoice-pdf-service/src/http/mod.rs

mod extract;
mod handler;

pub use extract::ValidatedJson;
pub use handler::{generate_invoice, health_check, preflight_no_content};
