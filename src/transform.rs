//! Raw record → view-model transformers.
//!
//! Pure and deterministic: the same record, locale and instant always give
//! the same view.

use crate::format::{format_currency, format_date, format_optional_date, Locale};
use crate::model::{
    Company, CompanyView, CrewMember, CrewMemberView, Invitation, InvitationView, Invoice,
    InvoiceView, License, LicenseView, NotificationSetting, NotificationSettingRequest,
    NotificationSettingView, Vessel, VesselView,
};
use crate::status;

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_VESSEL: &str = "Unknown Vessel";
pub const NOT_AVAILABLE: &str = "N/A";

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn location(company: &Company) -> String {
    format!("{}, {}", company.city, company.province)
}

pub fn invoice_view(invoice: &Invoice, locale: &Locale) -> InvoiceView {
    let payment_status = status::payment_status(invoice);
    InvoiceView {
        id: invoice.id,
        invoice_code: invoice.invoice_code.clone(),
        price: invoice.price.clone(),
        formatted_price: format_currency(&invoice.price, locale),
        payment_method: invoice.payment_method.clone(),
        payment_status,
        payment_receipt: invoice.payment_receipt.clone(),
        paid_at: invoice.paid_at.clone(),
        formatted_paid_at: format_date(&invoice.paid_at, locale),
        created_at: invoice.created_at.clone(),
        formatted_created_at: format_date(&invoice.created_at, locale),
        updated_at: invoice.updated_at.clone(),
        status_color: status::payment_tone(payment_status),
    }
}

pub fn company_view(company: &Company, locale: &Locale) -> CompanyView {
    CompanyView {
        id: company.id.clone(),
        name: company.name.clone(),
        location: location(company),
        registration_number: company.registration_number.clone(),
        address: company.address.clone(),
        city: company.city.clone(),
        province: company.province.clone(),
        postal_code: company.postal_code.clone(),
        country: company.country.clone(),
        phone: company.phone.clone(),
        email: company.email.clone(),
        website: company.website.clone(),
        logo: company.logo.clone(),
        created_at: format_date(&company.created_at, locale),
        updated_at: format_date(&company.updated_at, locale),
    }
}

/// `company_name` is the owning company's name when it is known.
pub fn vessel_view(vessel: &Vessel, company_name: Option<&str>) -> VesselView {
    VesselView {
        id: vessel.id.clone(),
        name: vessel.name.trim().to_string(),
        vessel_type: vessel.vessel_type.name.clone(),
        company: or_fallback(company_name, UNKNOWN_COMPANY),
        status: status::vessel_status(vessel),
        imo: vessel.imo.clone(),
        image: vessel.image.clone().unwrap_or_default(),
        mmsi: or_fallback(vessel.mmsi.as_deref(), NOT_AVAILABLE),
        flag: or_fallback(vessel.flag.as_deref(), NOT_AVAILABLE),
        callsign: or_fallback(vessel.callsign.as_deref(), NOT_AVAILABLE),
        gross_tonnage: vessel.gross_tonnage.unwrap_or_default(),
        summer_deadweight: vessel.summer_deadweight.unwrap_or_default(),
        year_of_build: vessel.year_of_build.unwrap_or_default(),
        place_of_build: or_fallback(vessel.place_of_build.as_deref(), NOT_AVAILABLE),
        class_name: NOT_AVAILABLE.to_string(),
    }
}

/// `vessel_name` is the name of the vessel the member serves on, when known.
pub fn crew_view(crew: &CrewMember, vessel_name: Option<&str>, locale: &Locale) -> CrewMemberView {
    let start_date = match crew.start_at.as_deref() {
        Some(ts) if !ts.is_empty() => format_date(ts, locale),
        _ => NOT_AVAILABLE.to_string(),
    };
    CrewMemberView {
        id: crew.id.clone(),
        name: crew.user.name.clone(),
        email: crew.user.email.clone(),
        role: crew.user_role.name.clone(),
        user_id: crew.user.id.clone(),
        vessel: or_fallback(vessel_name, UNKNOWN_VESSEL),
        vessel_id: crew.vessel_id.clone(),
        start_date,
        status: status::crew_status(crew),
        avatar: crew.user.avatar.clone(),
        company: company_view(&crew.company, locale),
    }
}

pub fn license_view(license: &License, now_millis: i64, locale: &Locale) -> LicenseView {
    let (expiry, status) = status::license_status(license, now_millis);
    LicenseView {
        id: license.license_code.clone(),
        license_code: license.license_code.clone(),
        company_name: license.company.name.clone(),
        company_location: location(&license.company),
        vessel_name: license.vessel.name.trim().to_string(),
        vessel_imo: license.vessel.imo.clone(),
        vessel_image: license.vessel.image.clone().unwrap_or_default(),
        valid_until: format_date(&license.valid_until, locale),
        status,
        days_remaining: expiry.days_remaining,
    }
}

pub fn invitation_view(
    invitation: &Invitation,
    now_millis: i64,
    locale: &Locale,
) -> InvitationView {
    let expiry = status::invitation_expiry(invitation, now_millis);
    InvitationView {
        id: invitation.id,
        company_name: invitation.company.name.clone(),
        company_location: location(&invitation.company),
        vessel_name: or_fallback(
            invitation.vessel.as_ref().map(|v| v.name.as_str()),
            UNKNOWN_VESSEL,
        ),
        role_name: invitation.user_role.name.clone(),
        role_description: invitation.user_role.description.clone(),
        email: invitation.email.clone(),
        status: invitation.status.clone(),
        created_date: format_date(&invitation.created_at, locale),
        expired_date: format_date(&invitation.expired_at, locale),
        days_remaining: expiry.days_remaining,
        is_expired: expiry.is_expired,
    }
}

pub fn notification_setting_view(
    setting: &NotificationSetting,
    locale: &Locale,
) -> NotificationSettingView {
    NotificationSettingView {
        id: setting.id,
        user_id: setting.user_id.clone(),
        telegram_chat_id: setting.telegram_chat_id.clone(),
        telegram_username: setting.telegram_username.clone(),
        email: setting.email.clone(),
        phone_number: setting.phone_number.clone(),
        whatsapp_number: setting.whatsapp_number.clone(),
        created_at: format_optional_date(&setting.created_at, locale),
        updated_at: format_optional_date(&setting.updated_at, locale),
        is_new: setting.id == 0,
    }
}

/// Back to the wire shape; a setting never saved is sent with `id = 0`.
pub fn notification_setting_request(view: &NotificationSettingView) -> NotificationSettingRequest {
    NotificationSettingRequest {
        id: if view.is_new { 0 } else { view.id },
        user_id: view.user_id.clone(),
        telegram_chat_id: view.telegram_chat_id.clone(),
        telegram_username: view.telegram_username.clone(),
        email: view.email.clone(),
        phone_number: view.phone_number.clone(),
        whatsapp_number: view.whatsapp_number.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ActivityStatus, LicenseStatus, PaymentStatus, StatusTone, User, UserRole, VesselType,
    };
    use crate::status::MILLIS_PER_DAY;

    const NOW: i64 = 1_700_000_000_000;

    fn company() -> Company {
        Company {
            id: "c-1".to_string(),
            name: "PT Samudera Jaya".to_string(),
            city: "Surabaya".to_string(),
            province: "Jawa Timur".to_string(),
            created_at: "1692230400000".to_string(),
            ..Company::default()
        }
    }

    #[test]
    fn test_unpaid_invoice_view() {
        let invoice = Invoice {
            id: 1,
            invoice_code: "INV-001".to_string(),
            price: "150000".to_string(),
            payment_method: "BANK".to_string(),
            payment_status: false,
            paid_at: String::new(),
            ..Invoice::default()
        };
        let view = invoice_view(&invoice, &Locale::default());

        assert_eq!(view.formatted_price, "Rp 150.000");
        assert_eq!(view.payment_status, PaymentStatus::Unpaid);
        assert_eq!(view.formatted_paid_at, "-");
        assert_eq!(view.status_color, StatusTone::Danger);
    }

    #[test]
    fn test_paid_invoice_view() {
        let invoice = Invoice {
            price: "2500000".to_string(),
            payment_status: true,
            paid_at: "1692230400000".to_string(),
            ..Invoice::default()
        };
        let view = invoice_view(&invoice, &Locale::id_id(0));

        assert_eq!(view.formatted_price, "Rp 2.500.000");
        assert_eq!(view.payment_status, PaymentStatus::Paid);
        assert_eq!(view.formatted_paid_at, "17 Agu 2023");
        assert_eq!(view.status_color, StatusTone::Success);
    }

    #[test]
    fn test_company_view_location() {
        let view = company_view(&company(), &Locale::id_id(0));
        assert_eq!(view.location, "Surabaya, Jawa Timur");
        assert_eq!(view.created_at, "17 Agu 2023");
        assert_eq!(view.updated_at, "-");
    }

    #[test]
    fn test_vessel_view_fallbacks() {
        let vessel = Vessel {
            id: "v-1".to_string(),
            name: "  KM Bahari  ".to_string(),
            imo: "9123456".to_string(),
            mmsi: Some(String::new()),
            flag: Some("Indonesia".to_string()),
            vessel_type: VesselType {
                id: 3,
                name: "Tanker".to_string(),
            },
            ..Vessel::default()
        };

        let view = vessel_view(&vessel, None);
        assert_eq!(view.name, "KM Bahari");
        assert_eq!(view.vessel_type, "Tanker");
        assert_eq!(view.company, UNKNOWN_COMPANY);
        assert_eq!(view.status, ActivityStatus::Active);
        assert_eq!(view.mmsi, "N/A");
        assert_eq!(view.flag, "Indonesia");
        assert_eq!(view.callsign, "N/A");
        assert_eq!(view.gross_tonnage, 0.0);
        assert_eq!(view.year_of_build, 0);
        assert_eq!(view.class_name, "N/A");

        let named = vessel_view(&vessel, Some("PT Samudera Jaya"));
        assert_eq!(named.company, "PT Samudera Jaya");
    }

    #[test]
    fn test_crew_view() {
        let crew = CrewMember {
            id: "m-1".to_string(),
            vessel_id: "v-1".to_string(),
            start_at: None,
            user: User {
                id: "u-1".to_string(),
                name: "Budi".to_string(),
                email: "budi@example.com".to_string(),
                user_status: false,
                ..User::default()
            },
            user_role: UserRole {
                code: "CAPT".to_string(),
                name: "Captain".to_string(),
                description: String::new(),
            },
            company: company(),
        };

        let view = crew_view(&crew, None, &Locale::default());
        assert_eq!(view.name, "Budi");
        assert_eq!(view.role, "Captain");
        assert_eq!(view.vessel, UNKNOWN_VESSEL);
        assert_eq!(view.start_date, "N/A");
        assert_eq!(view.status, ActivityStatus::Inactive);
        assert_eq!(view.company.location, "Surabaya, Jawa Timur");
    }

    #[test]
    fn test_license_view() {
        let license = License {
            license_code: "LIC-9".to_string(),
            valid_until: (NOW + 10 * MILLIS_PER_DAY).to_string(),
            company: company(),
            vessel: Vessel {
                name: "MV Sinar ".to_string(),
                imo: "9000001".to_string(),
                ..Vessel::default()
            },
        };

        let view = license_view(&license, NOW, &Locale::default());
        assert_eq!(view.id, "LIC-9");
        assert_eq!(view.vessel_name, "MV Sinar");
        assert_eq!(view.days_remaining, 10);
        assert_eq!(view.status, LicenseStatus::ExpiringSoon);
        assert_eq!(view.company_location, "Surabaya, Jawa Timur");
    }

    #[test]
    fn test_invitation_view() {
        let invitation = Invitation {
            id: 4,
            email: "crew@example.com".to_string(),
            company: company(),
            vessel: None,
            expired_at: (NOW - 3 * MILLIS_PER_DAY).to_string(),
            ..Invitation::default()
        };

        let view = invitation_view(&invitation, NOW, &Locale::default());
        assert_eq!(view.vessel_name, UNKNOWN_VESSEL);
        assert_eq!(view.days_remaining, -3);
        assert!(view.is_expired);
    }

    #[test]
    fn test_notification_setting_roundtrip_to_request() {
        let setting = NotificationSetting {
            id: 0,
            user_id: "u-1".to_string(),
            email: "ops@example.com".to_string(),
            ..NotificationSetting::default()
        };
        let view = notification_setting_view(&setting, &Locale::default());
        assert!(view.is_new);
        assert_eq!(view.created_at, "");

        let request = notification_setting_request(&view);
        assert_eq!(request.id, 0);
        assert_eq!(request.email, "ops@example.com");
    }
}
