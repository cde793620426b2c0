//! Invoice PDF export.
//!
//! The invoice is rendered to a self-contained HTML document here; turning
//! it into a PDF is the job of an external [`PdfExporter`].

use crate::error::Result;
use crate::format::{format_date, Locale, SENTINEL};
use crate::model::{InvoiceView, PaymentStatus};
use crate::transform::NOT_AVAILABLE;
use std::fmt::Write;

/// Converts an HTML document into a PDF file named `filename`.
#[allow(async_fn_in_trait)]
pub trait PdfExporter: Send + Sync {
    async fn export(&self, html: &str, filename: &str) -> Result<()>;
}

/// Who issued the invoice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issuer {
    pub name: String,
    pub tagline: String,
    pub email: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Issuer {
            name: "NautiPro Connect".to_string(),
            tagline: "Maritime Management System".to_string(),
            email: "info@nautiproconnect.com".to_string(),
        }
    }
}

/// Who the invoice is addressed to: the signed-in user, when known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipient {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => escape(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn invoice_filename(invoice: &InvoiceView) -> String {
    format!("Invoice-{}.pdf", invoice.invoice_code)
}

/// Render `invoice` as an HTML document. `generated_at` is epoch
/// milliseconds, shown in the footer.
pub fn render_invoice_html(
    invoice: &InvoiceView,
    issuer: &Issuer,
    recipient: &Recipient,
    generated_at: i64,
    locale: &Locale,
) -> String {
    let code = escape(&invoice.invoice_code);
    let status = invoice.payment_status.as_str();
    let price = escape(&invoice.formatted_price);

    let mut rows = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        rows,
        "<tr><th>From:</th><td><strong>{}</strong><br>{}<br>Email: {}</td></tr>\n\
         <tr><th>To:</th><td><strong>{}</strong><br>{}</td></tr>\n\
         <tr><th>Invoice Code:</th><td>{}</td></tr>\n\
         <tr><th>Issue Date:</th><td>{}</td></tr>\n\
         <tr><th>Payment Method:</th><td>{}</td></tr>\n\
         <tr><th>Status:</th><td><span class=\"status {}\">{}</span></td></tr>\n",
        escape(&issuer.name),
        escape(&issuer.tagline),
        escape(&issuer.email),
        or_na(recipient.name.as_deref()),
        or_na(recipient.email.as_deref()),
        code,
        escape(&invoice.formatted_created_at),
        escape(&invoice.payment_method),
        status.to_ascii_lowercase(),
        status,
    );
    if invoice.payment_status == PaymentStatus::Paid && invoice.formatted_paid_at != SENTINEL {
        let _ = writeln!(
            rows,
            "<tr><th>Paid Date:</th><td>{}</td></tr>",
            escape(&invoice.formatted_paid_at)
        );
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"UTF-8\"><title>Invoice {code}</title></head>\n\
         <body>\n\
         <div class=\"container\">\n\
         <div class=\"header\"><h1>INVOICE</h1><h2>{code}</h2></div>\n\
         <table class=\"info-table\">\n{rows}</table>\n\
         <table class=\"invoice-table\">\n\
         <thead><tr><th>Description</th><th>Amount</th></tr></thead>\n\
         <tbody><tr><td>Service Fee - {issuer}</td><td>{price}</td></tr></tbody>\n\
         </table>\n\
         <div class=\"total\"><p>Total Amount: <strong>{price}</strong></p></div>\n\
         <div class=\"footer\"><p>Thank you for your business!</p>\
         <p>Generated on {generated}</p></div>\n\
         </div>\n\
         </body>\n\
         </html>\n",
        code = code,
        rows = rows,
        issuer = escape(&issuer.name),
        price = price,
        generated = format_date(&generated_at.to_string(), locale),
    )
}

/// Render the invoice and hand it to `exporter` as `Invoice-{code}.pdf`.
///
/// Exporter failures are logged, not returned. Returns whether the export
/// succeeded.
pub async fn export_invoice<E: PdfExporter>(
    exporter: &E,
    invoice: &InvoiceView,
    recipient: &Recipient,
    generated_at: i64,
    locale: &Locale,
) -> bool {
    let html = render_invoice_html(invoice, &Issuer::default(), recipient, generated_at, locale);
    let filename = invoice_filename(invoice);
    match exporter.export(&html, &filename).await {
        Ok(()) => {
            info!("Exported {}", filename);
            true
        }
        Err(e) => {
            error!("Failed to export {}: {}", filename, e);
            false
        }
    }
}
