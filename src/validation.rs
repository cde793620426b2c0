//! Local form checks run before any write reaches the network.
//!
//! Every failure is an `Error::ValidationError` carrying the message shown
//! next to the form.

use crate::error::{Error, Result};
use crate::format::utc_midnight_millis;
use crate::model::{
    CompanyRequest, CreateInvoiceRequest, CreateLicenseRequest, FileUpload, UpdateInvoiceRequest,
    UpdateLicenseRequest, VesselRequest,
};
use chrono::NaiveDate;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

fn invalid<T>(message: &str) -> Result<T> {
    Err(Error::ValidationError(message.to_string()))
}

/// Require a non-blank value.
pub fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        invalid(message)
    } else {
        Ok(())
    }
}

/// A price must be present and parse as a positive number.
pub fn validate_price(price: &str) -> Result<()> {
    require(price, "Price is required")?;
    match price.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => invalid("Price must be a valid positive number"),
    }
}

pub fn validate_create_invoice(request: &CreateInvoiceRequest) -> Result<CreateInvoiceRequest> {
    validate_price(&request.price)?;
    require(&request.payment_method, "Payment method is required")?;
    Ok(CreateInvoiceRequest {
        price: request.price.trim().to_string(),
        payment_method: request.payment_method.trim().to_string(),
    })
}

/// Edit-invoice form as entered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceUpdateForm {
    pub id: i64,
    pub price: String,
    pub payment_method: String,
    pub payment_status: bool,
    pub paid_date: Option<NaiveDate>,
    pub payment_receipt: String,
}

/// A paid invoice needs a paid date, sent as its UTC midnight in epoch
/// milliseconds. An unpaid invoice is sent with an empty `paid_at`.
pub fn validate_update_invoice(form: &InvoiceUpdateForm) -> Result<UpdateInvoiceRequest> {
    validate_price(&form.price)?;
    require(&form.payment_method, "Payment method is required")?;
    let paid_at = match (form.payment_status, form.paid_date) {
        (true, Some(date)) => utc_midnight_millis(date).to_string(),
        (true, None) => return invalid("Paid date is required when marking as paid"),
        (false, _) => String::new(),
    };
    Ok(UpdateInvoiceRequest {
        id: form.id,
        price: form.price.trim().to_string(),
        payment_method: form.payment_method.trim().to_string(),
        payment_status: form.payment_status,
        paid_at,
        payment_receipt: form.payment_receipt.clone(),
    })
}

/// Image uploads must be `image/*` and at most [`MAX_UPLOAD_BYTES`].
///
/// `purpose` completes the message, e.g. `payment receipt`.
pub fn validate_image(file: &FileUpload, purpose: &str) -> Result<()> {
    if !file.content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(Error::ValidationError(format!(
            "Please select an image file for {}",
            purpose
        )));
    }
    if file.len() > MAX_UPLOAD_BYTES {
        return invalid("File size must be less than 5MB");
    }
    Ok(())
}

/// New-license form as entered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LicenseForm {
    pub company_id: String,
    pub vessel_id: String,
    pub valid_until: Option<NaiveDate>,
    pub invoice_id: Option<i64>,
    pub price: String,
}

pub fn validate_create_license(form: &LicenseForm) -> Result<CreateLicenseRequest> {
    require(&form.company_id, "Please select a company")?;
    require(&form.vessel_id, "Please select a vessel")?;
    let Some(valid_until) = form.valid_until else {
        return invalid("Valid until date is required");
    };
    let Some(invoice_id) = form.invoice_id else {
        return invalid("Please select an invoice");
    };
    validate_price(&form.price)?;
    Ok(CreateLicenseRequest {
        company_id: form.company_id.clone(),
        vessel_id: form.vessel_id.clone(),
        valid_until: utc_midnight_millis(valid_until).to_string(),
        invoice_id,
        price: form.price.trim().to_string(),
    })
}

/// Edit-license form: only the expiry can change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LicenseUpdateForm {
    pub license_code: String,
    pub valid_until: Option<NaiveDate>,
}

pub fn validate_update_license(form: &LicenseUpdateForm) -> Result<UpdateLicenseRequest> {
    require(&form.license_code, "License code is required")?;
    let Some(valid_until) = form.valid_until else {
        return invalid("Valid until date is required");
    };
    Ok(UpdateLicenseRequest {
        license_code: form.license_code.trim().to_string(),
        valid_until: utc_midnight_millis(valid_until).to_string(),
    })
}

pub fn validate_company(request: &CompanyRequest) -> Result<()> {
    require(&request.name, "Company name is required")
}

pub fn validate_vessel(request: &VesselRequest) -> Result<()> {
    require(&request.name, "Vessel name is required")?;
    require(&request.imo, "IMO number is required")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<impl std::fmt::Debug>) -> String {
        match result {
            Err(Error::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(message(validate_price("")), "Price is required");
        assert_eq!(message(validate_price("  ")), "Price is required");
        assert_eq!(
            message(validate_price("0")),
            "Price must be a valid positive number"
        );
        assert_eq!(
            message(validate_price("-10")),
            "Price must be a valid positive number"
        );
        assert_eq!(
            message(validate_price("abc")),
            "Price must be a valid positive number"
        );
        assert!(validate_price("150000").is_ok());
        assert!(validate_price("0.5").is_ok());
    }

    #[test]
    fn test_create_invoice() {
        let request = CreateInvoiceRequest {
            price: "0".to_string(),
            payment_method: "BANK".to_string(),
        };
        assert!(
            message(validate_create_invoice(&request)).contains("must be a valid positive number")
        );

        let request = CreateInvoiceRequest {
            price: " 250000 ".to_string(),
            payment_method: String::new(),
        };
        assert_eq!(
            message(validate_create_invoice(&request)),
            "Payment method is required"
        );
    }

    #[test]
    fn test_update_invoice_paid_date() {
        let mut form = InvoiceUpdateForm {
            id: 9,
            price: "1000".to_string(),
            payment_method: "CASH".to_string(),
            payment_status: true,
            paid_date: None,
            payment_receipt: String::new(),
        };
        assert_eq!(
            message(validate_update_invoice(&form)),
            "Paid date is required when marking as paid"
        );

        form.paid_date = NaiveDate::from_ymd_opt(2023, 8, 17);
        let request = validate_update_invoice(&form).expect("valid form");
        assert_eq!(request.paid_at, "1692230400000");

        form.payment_status = false;
        let request = validate_update_invoice(&form).expect("valid form");
        assert_eq!(request.paid_at, "");
    }

    #[test]
    fn test_image_rules() {
        let pdf = FileUpload::new("receipt.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(
            message(validate_image(&pdf, "payment receipt")),
            "Please select an image file for payment receipt"
        );

        let big = FileUpload::new("scan.png", "image/png", vec![0; MAX_UPLOAD_BYTES + 1]);
        assert_eq!(
            message(validate_image(&big, "payment receipt")),
            "File size must be less than 5MB"
        );

        let ok = FileUpload::new("scan.jpg", "image/jpeg", vec![0; 1024]);
        assert!(validate_image(&ok, "payment receipt").is_ok());
    }

    #[test]
    fn test_license_forms() {
        let mut form = LicenseForm {
            company_id: "c-1".to_string(),
            vessel_id: String::new(),
            ..LicenseForm::default()
        };
        assert_eq!(message(validate_create_license(&form)), "Please select a vessel");

        form.vessel_id = "v-1".to_string();
        assert_eq!(
            message(validate_create_license(&form)),
            "Valid until date is required"
        );

        form.valid_until = NaiveDate::from_ymd_opt(2023, 8, 17);
        assert_eq!(message(validate_create_license(&form)), "Please select an invoice");

        form.invoice_id = Some(3);
        form.price = "5000000".to_string();
        let request = validate_create_license(&form).expect("valid form");
        assert_eq!(request.valid_until, "1692230400000");
        assert_eq!(request.invoice_id, 3);

        let update = LicenseUpdateForm {
            license_code: String::new(),
            valid_until: None,
        };
        assert_eq!(
            message(validate_update_license(&update)),
            "License code is required"
        );
    }

    #[test]
    fn test_company_and_vessel() {
        assert_eq!(
            message(validate_company(&CompanyRequest::default())),
            "Company name is required"
        );
        let vessel = VesselRequest {
            name: "KM Bahari".to_string(),
            ..VesselRequest::default()
        };
        assert_eq!(message(validate_vessel(&vessel)), "IMO number is required");
    }
}
