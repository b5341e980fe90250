// invoice-pdf-service/src/models.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

fn default_unit() -> String {
    "Pcs".to_string()
}

/// One invoice row as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub model: String,
    #[validate(custom(function = "validate_positive"))]
    pub qty: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub unit_price: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_amounts_in_range"))]
pub struct InvoiceRequest {
    #[validate(custom(function = "validate_header_safe"))]
    pub invoice_no: String,
    pub date: String,
    pub billed_to: String,
    pub attention_to: String,
    pub delivery_term: String,
    pub validity_term: String,
    pub delivery_time: String,
    pub currency: String,
    #[validate(custom(function = "validate_percentage"))]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub contact_person: String,
    #[validate(nested)]
    pub items: Vec<LineItem>,
}

/// A line item after calculation, shaped for the template.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedLine {
    pub no: usize,
    pub model: String,
    pub qty: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub line_total_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
    pub subtotal_formatted: String,
    pub tax_amount_formatted: String,
    pub grand_total_formatted: String,
}

/// Everything the invoice template can see.
#[derive(Debug, Serialize)]
pub struct InvoiceDocument<'a> {
    pub data: &'a InvoiceRequest,
    pub processed_items: Vec<ComputedLine>,
    #[serde(flatten)]
    pub totals: ComputedTotals,
}

#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl GeneratedInvoice {
    pub fn filename_for(invoice_no: &str) -> String {
        format!("invoice_{}.pdf", invoice_no)
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(validation_error("positive", "must be greater than 0"))
    }
}

fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(validation_error("range", "must be between 0 and 100"))
    }
}

// The number ends up inside a quoted Content-Disposition filename.
fn validate_header_safe(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_control() || c == '"') {
        Err(validation_error(
            "header_safe",
            "must not contain control characters or double quotes",
        ))
    } else {
        Ok(())
    }
}

fn validate_amounts_in_range(request: &InvoiceRequest) -> Result<(), ValidationError> {
    let out_of_range = || validation_error("amount_range", "invoice amounts are too large");

    let mut subtotal = Decimal::ZERO;
    for item in &request.items {
        let line_total = item
            .qty
            .checked_mul(item.unit_price)
            .ok_or_else(out_of_range)?;
        subtotal = subtotal.checked_add(line_total).ok_or_else(out_of_range)?;
    }

    let tax = subtotal
        .checked_mul(request.tax_rate)
        .ok_or_else(out_of_range)?
        / Decimal::ONE_HUNDRED;
    subtotal.checked_add(tax).ok_or_else(out_of_range)?;

    Ok(())
}
