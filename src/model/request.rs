//! JSON bodies and file payloads for write operations.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub price: String,
    pub payment_method: String,
}

/// `paid_at` is epoch milliseconds of the paid date's UTC midnight, or empty
/// for an unpaid invoice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub id: i64,
    pub price: String,
    pub payment_method: String,
    pub payment_status: bool,
    pub paid_at: String,
    pub payment_receipt: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettingRequest {
    pub id: i64,
    pub user_id: String,
    pub telegram_chat_id: String,
    pub telegram_username: String,
    pub email: String,
    pub phone_number: String,
    pub whatsapp_number: String,
}

/// Body of `create-company` and `update-company/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub registration_number: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

/// Body of `create-vessel` (no `id`) and `update-vessel` (with `id`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_name: Option<String>,
    pub imo: String,
    pub mmsi: String,
    pub flag: String,
    pub callsign: String,
    pub gross_tonnage: f64,
    pub summer_deadweight: f64,
    pub year_of_build: i32,
    pub place_of_build: String,
    pub vesseltype_id: i64,
    pub class_name: String,
    pub company_id: String,
}

/// Body of `update-vessel-member` and `remove-vessel-member`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselMemberRequest {
    pub vessel_id: String,
    pub user_role_code: String,
    pub user_id: String,
    pub company_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLicenseRequest {
    pub company_id: String,
    pub vessel_id: String,
    /// Epoch milliseconds.
    pub valid_until: String,
    pub invoice_id: i64,
    pub price: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLicenseRequest {
    pub license_code: String,
    /// Epoch milliseconds.
    pub valid_until: String,
}

/// A file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        FileUpload {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
