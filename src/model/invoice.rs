use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice as returned by `get-invoices`.
///
/// `price` is an integer amount in currency units, sent as a string.
/// Timestamps are epoch milliseconds as strings; `""` or `"0"` means unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub id: i64,
    pub invoice_code: String,
    pub price: String,
    pub payment_method: String,
    pub payment_status: bool,
    pub payment_receipt: String,
    pub paid_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn from_paid(paid: bool) -> Self {
        if paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        }
    }

    pub fn is_paid(self) -> bool {
        self == PaymentStatus::Paid
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation tone of a status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTone {
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Display-ready invoice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub id: i64,
    pub invoice_code: String,
    pub price: String,
    pub formatted_price: String,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub payment_receipt: String,
    pub paid_at: String,
    pub formatted_paid_at: String,
    pub created_at: String,
    pub formatted_created_at: String,
    pub updated_at: String,
    pub status_color: StatusTone,
}
