use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub id: String,
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
    pub logo: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyView {
    pub id: String,
    pub name: String,
    /// `"{city}, {province}"`
    pub location: String,
    pub registration_number: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub logo: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselType {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vessel {
    pub id: String,
    pub name: String,
    pub previous_name: Option<String>,
    pub imo: String,
    pub mmsi: Option<String>,
    pub flag: Option<String>,
    pub callsign: Option<String>,
    pub gross_tonnage: Option<f64>,
    pub summer_deadweight: Option<f64>,
    pub year_of_build: Option<i32>,
    pub place_of_build: Option<String>,
    pub image: Option<String>,
    pub is_deleted: bool,
    pub company_id: Option<String>,
    pub vessel_type: VesselType,
    pub created_at: String,
    pub updated_at: String,
}

/// Active/inactive flag shared by vessels and crew members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Active,
    Inactive,
}

impl ActivityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Active => "Active",
            ActivityStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VesselView {
    pub id: String,
    pub name: String,
    pub vessel_type: String,
    pub company: String,
    pub status: ActivityStatus,
    pub imo: String,
    pub image: String,
    pub mmsi: String,
    pub flag: String,
    pub callsign: String,
    pub gross_tonnage: f64,
    pub summer_deadweight: f64,
    pub year_of_build: i32,
    pub place_of_build: String,
    pub class_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRole {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// A user's membership on a vessel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewMember {
    pub id: String,
    pub vessel_id: String,
    pub start_at: Option<String>,
    pub user: super::User,
    pub user_role: UserRole,
    pub company: Company,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrewMemberView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub user_id: String,
    pub vessel: String,
    pub vessel_id: String,
    pub start_date: String,
    pub status: ActivityStatus,
    pub avatar: String,
    pub company: CompanyView,
}

/// Maintenance license for one vessel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub license_code: String,
    /// Epoch milliseconds.
    pub valid_until: String,
    pub company: Company,
    pub vessel: Vessel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl LicenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LicenseStatus::Valid => "Valid",
            LicenseStatus::ExpiringSoon => "Expiring Soon",
            LicenseStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LicenseView {
    /// The license code.
    pub id: String,
    pub license_code: String,
    pub company_name: String,
    pub company_location: String,
    pub vessel_name: String,
    pub vessel_imo: String,
    pub vessel_image: String,
    pub valid_until: String,
    pub status: LicenseStatus,
    pub days_remaining: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invitation {
    pub id: i64,
    pub email: String,
    pub status: String,
    pub company: Company,
    pub vessel: Option<Vessel>,
    pub user_role: UserRole,
    pub created_at: String,
    pub expired_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvitationView {
    pub id: i64,
    pub company_name: String,
    pub company_location: String,
    pub vessel_name: String,
    pub role_name: String,
    pub role_description: String,
    pub email: String,
    pub status: String,
    pub created_date: String,
    pub expired_date: String,
    pub days_remaining: i64,
    pub is_expired: bool,
}
