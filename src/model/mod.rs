//! Raw backend records, their view-models and write payloads.
//!
//! Raw records deserialize from the backend JSON. Every field defaults when
//! absent so partially populated embeds (a vessel inside a license, a user
//! inside a crew membership) still decode. Types stored in the query cache
//! use plain serde shapes only.

pub mod account;
pub mod contact;
pub mod dashboard;
pub mod fleet;
pub mod invoice;
pub mod request;

pub use account::{NotificationSetting, NotificationSettingView, Session, User};
pub use contact::{ContactMessage, ContactStatus};
pub use dashboard::DashboardOverview;
pub use fleet::{
    ActivityStatus, Company, CompanyView, CrewMember, CrewMemberView, Invitation, InvitationView,
    License, LicenseStatus, LicenseView, UserRole, Vessel, VesselType, VesselView,
};
pub use invoice::{Invoice, InvoiceView, PaymentStatus, StatusTone};
pub use request::{
    CompanyRequest, CreateInvoiceRequest, CreateLicenseRequest, FileUpload,
    NotificationSettingRequest, UpdateInvoiceRequest, UpdateLicenseRequest, VesselMemberRequest,
    VesselRequest,
};
