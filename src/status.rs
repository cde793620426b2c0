//! Derived statuses.
//!
//! Every status shown in the dashboard is computed here from the record and,
//! where time matters, the current instant in epoch milliseconds.

use crate::format::parse_timestamp;
use crate::model::{
    ActivityStatus, ContactStatus, CrewMember, Invitation, Invoice, License, LicenseStatus,
    PaymentStatus, StatusTone, User, Vessel,
};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// A license this many days (or fewer) from expiry is expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Whole days until `until`, rounded up. Negative once `until` has passed.
pub fn days_remaining(until_millis: i64, now_millis: i64) -> i64 {
    let diff = until_millis.saturating_sub(now_millis);
    let days = diff.div_euclid(MILLIS_PER_DAY);
    if diff.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Expiry countdown of a record with an end timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expiry {
    pub days_remaining: i64,
    pub is_expired: bool,
}

impl Expiry {
    /// An unreadable end timestamp counts as already expired.
    pub fn from_timestamp(until: &str, now_millis: i64) -> Self {
        match parse_timestamp(until) {
            Some(until) => {
                let days = days_remaining(until, now_millis);
                Expiry {
                    days_remaining: days,
                    is_expired: days < 0,
                }
            }
            None => Expiry {
                days_remaining: -1,
                is_expired: true,
            },
        }
    }
}

pub fn license_status_for_days(days: i64) -> LicenseStatus {
    if days < 0 {
        LicenseStatus::Expired
    } else if days <= EXPIRING_SOON_DAYS {
        LicenseStatus::ExpiringSoon
    } else {
        LicenseStatus::Valid
    }
}

pub fn license_status(license: &License, now_millis: i64) -> (Expiry, LicenseStatus) {
    let expiry = Expiry::from_timestamp(&license.valid_until, now_millis);
    (expiry, license_status_for_days(expiry.days_remaining))
}

pub fn invitation_expiry(invitation: &Invitation, now_millis: i64) -> Expiry {
    Expiry::from_timestamp(&invitation.expired_at, now_millis)
}

pub fn payment_status(invoice: &Invoice) -> PaymentStatus {
    PaymentStatus::from_paid(invoice.payment_status)
}

pub fn payment_tone(status: PaymentStatus) -> StatusTone {
    match status {
        PaymentStatus::Paid => StatusTone::Success,
        PaymentStatus::Unpaid => StatusTone::Danger,
    }
}

pub fn license_tone(status: LicenseStatus) -> StatusTone {
    match status {
        LicenseStatus::Valid => StatusTone::Success,
        LicenseStatus::ExpiringSoon => StatusTone::Warning,
        LicenseStatus::Expired => StatusTone::Danger,
    }
}

pub fn contact_tone(status: ContactStatus) -> StatusTone {
    match status {
        ContactStatus::Open => StatusTone::Neutral,
        ContactStatus::Pending => StatusTone::Warning,
        ContactStatus::Closed => StatusTone::Success,
    }
}

pub fn vessel_status(vessel: &Vessel) -> ActivityStatus {
    if vessel.is_deleted {
        ActivityStatus::Inactive
    } else {
        ActivityStatus::Active
    }
}

pub fn user_status(user: &User) -> ActivityStatus {
    if user.user_status {
        ActivityStatus::Active
    } else {
        ActivityStatus::Inactive
    }
}

pub fn crew_status(crew: &CrewMember) -> ActivityStatus {
    user_status(&crew.user)
}
