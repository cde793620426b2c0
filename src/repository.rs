//! Remote resource trait for the admin backend.
//!
//! `AdminRepository` has one async method per backend operation and returns
//! the raw [`ApiResponse`] envelope. [`RestClient`](crate::api::RestClient)
//! implements it over HTTP; [`InMemoryRepository`] implements it over seeded
//! data for tests and demos.
//!
//! # Mocking for Tests
//!
//! ```
//! use fleetdesk::repository::{AdminRepository, InMemoryRepository, RepositoryData};
//! use fleetdesk::model::Company;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fleetdesk::Result<()> {
//! let repo = InMemoryRepository::new(RepositoryData {
//!     companies: vec![Company {
//!         id: "c-1".into(),
//!         name: "PT Samudra".into(),
//!         ..Company::default()
//!     }],
//!     ..RepositoryData::default()
//! });
//!
//! let companies = repo.list_companies().await?.data;
//! assert_eq!(companies.len(), 1);
//! assert_eq!(repo.calls("get-companies"), 1);
//! # Ok(())
//! # }
//! ```

use crate::api::ApiResponse;
use crate::error::{Error, Result};
use crate::model::{
    Company, CompanyRequest, ContactMessage, ContactStatus, CreateInvoiceRequest,
    CreateLicenseRequest, CrewMember, DashboardOverview, FileUpload, Invitation, Invoice, License,
    NotificationSetting, NotificationSettingRequest, Session, UpdateInvoiceRequest,
    UpdateLicenseRequest, User, UserRole, Vessel, VesselMemberRequest, VesselRequest, VesselType,
};
use dashmap::DashMap;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One async method per backend operation.
///
/// Implementations issue exactly one request per call. They do not cache and
/// do not retry.
pub trait AdminRepository: Send + Sync + 'static {
    // Invoices
    fn list_invoices(&self) -> impl Future<Output = Result<ApiResponse<Vec<Invoice>>>> + Send;
    fn create_invoice(
        &self,
        request: &CreateInvoiceRequest,
    ) -> impl Future<Output = Result<ApiResponse<Invoice>>> + Send;
    fn update_invoice(
        &self,
        request: &UpdateInvoiceRequest,
    ) -> impl Future<Output = Result<ApiResponse<Invoice>>> + Send;
    fn upload_payment_receipt(
        &self,
        invoice_id: i64,
        receipt: &FileUpload,
    ) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;

    // Companies
    fn list_companies(&self) -> impl Future<Output = Result<ApiResponse<Vec<Company>>>> + Send;
    fn get_company(&self, id: &str) -> impl Future<Output = Result<ApiResponse<Company>>> + Send;
    fn create_company(
        &self,
        request: &CompanyRequest,
    ) -> impl Future<Output = Result<ApiResponse<Company>>> + Send;
    fn update_company(
        &self,
        id: &str,
        request: &CompanyRequest,
    ) -> impl Future<Output = Result<ApiResponse<Company>>> + Send;
    fn update_company_logo(
        &self,
        id: &str,
        logo: &FileUpload,
    ) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;
    fn delete_company(&self, id: &str) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;

    // Vessels
    fn list_vessels_by_company(
        &self,
        company_id: &str,
    ) -> impl Future<Output = Result<ApiResponse<Vec<Vessel>>>> + Send;
    fn create_vessel(
        &self,
        request: &VesselRequest,
    ) -> impl Future<Output = Result<ApiResponse<Vessel>>> + Send;
    fn update_vessel(
        &self,
        request: &VesselRequest,
    ) -> impl Future<Output = Result<ApiResponse<Vessel>>> + Send;
    fn update_vessel_image(
        &self,
        id: &str,
        image: &FileUpload,
    ) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;
    fn delete_vessel(&self, id: &str) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;

    // Crews
    fn list_crews_by_vessel(
        &self,
        vessel_id: &str,
    ) -> impl Future<Output = Result<ApiResponse<Vec<CrewMember>>>> + Send;
    fn list_crews_by_company(
        &self,
        company_id: &str,
    ) -> impl Future<Output = Result<ApiResponse<Vec<CrewMember>>>> + Send;
    fn update_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;
    fn remove_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;

    // Licenses and invitations
    fn list_licenses(&self) -> impl Future<Output = Result<ApiResponse<Vec<License>>>> + Send;
    fn create_license(
        &self,
        request: &CreateLicenseRequest,
    ) -> impl Future<Output = Result<ApiResponse<License>>> + Send;
    fn update_license(
        &self,
        request: &UpdateLicenseRequest,
    ) -> impl Future<Output = Result<ApiResponse<License>>> + Send;
    fn list_invitations(&self)
        -> impl Future<Output = Result<ApiResponse<Vec<Invitation>>>> + Send;

    // Lookups
    fn list_roles(&self) -> impl Future<Output = Result<ApiResponse<Vec<UserRole>>>> + Send;
    fn list_vessel_types(&self)
        -> impl Future<Output = Result<ApiResponse<Vec<VesselType>>>> + Send;

    // Settings and summary
    /// `data` is `None` when the backend answers with `null`.
    fn get_notification_setting(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<Option<NotificationSetting>>>> + Send;
    fn save_notification_setting(
        &self,
        request: &NotificationSettingRequest,
    ) -> impl Future<Output = Result<ApiResponse<NotificationSetting>>> + Send;
    fn dashboard_overview(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<DashboardOverview>>> + Send;

    // Contact messages
    fn list_contact_messages(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<Vec<ContactMessage>>>> + Send;
    /// Server-side status transition, issued as a GET.
    fn set_contact_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;

    // Users and sessions
    fn list_users(&self) -> impl Future<Output = Result<ApiResponse<Vec<User>>>> + Send;
    fn list_sessions(&self) -> impl Future<Output = Result<ApiResponse<Vec<Session>>>> + Send;
    fn delete_session(&self, id: i64) -> impl Future<Output = Result<ApiResponse<Value>>> + Send;
}

// ============================================================================
// In-Memory Test Repository
// ============================================================================

/// Records served by [`InMemoryRepository`]. Writes update them in place.
#[derive(Clone, Debug, Default)]
pub struct RepositoryData {
    pub invoices: Vec<Invoice>,
    pub companies: Vec<Company>,
    pub vessels: Vec<Vessel>,
    pub crews: Vec<CrewMember>,
    pub licenses: Vec<License>,
    pub invitations: Vec<Invitation>,
    pub roles: Vec<UserRole>,
    pub vessel_types: Vec<VesselType>,
    pub notification_setting: Option<NotificationSetting>,
    pub dashboard: DashboardOverview,
    pub contact_messages: Vec<ContactMessage>,
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
}

#[derive(Default)]
struct Inner {
    data: Mutex<RepositoryData>,
    calls: DashMap<String, usize>,
    failures: DashMap<String, Error>,
    latency: Mutex<Option<Duration>>,
    next_id: Mutex<i64>,
}

/// Backend stand-in over [`RepositoryData`].
///
/// Every call is counted under its endpoint name (`get-vessels-by-company`)
/// and, when it takes a parameter, also under `endpoint/param`
/// (`get-vessels-by-company/c-1`). A failure injected under either name is
/// returned instead of the data; the parameterized name wins.
///
/// Clones share data, counters and failures.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Inner>,
}

fn not_found(what: &str, id: impl std::fmt::Display) -> Error {
    Error::http(404, format!("API Error: 404 Not Found ({} {})", what, id))
}

fn now_millis_string() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

impl InMemoryRepository {
    pub fn new(data: RepositoryData) -> Self {
        let repo = InMemoryRepository::default();
        *repo.data() = data;
        repo
    }

    fn data(&self) -> MutexGuard<'_, RepositoryData> {
        self.inner
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self) -> i64 {
        let mut next = self
            .inner
            .next_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *next += 1;
        1000 + *next
    }

    /// Copy of the current records.
    pub fn snapshot(&self) -> RepositoryData {
        self.data().clone()
    }

    /// Edit the records directly, bypassing counters and failures.
    pub fn update_data(&self, f: impl FnOnce(&mut RepositoryData)) {
        f(&mut self.data());
    }

    /// Make calls to `endpoint` (or `endpoint/param`) fail with `error`.
    pub fn fail(&self, endpoint: &str, error: Error) {
        self.inner.failures.insert(endpoint.to_string(), error);
    }

    pub fn clear_failure(&self, endpoint: &str) {
        self.inner.failures.remove(endpoint);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self
            .inner
            .latency
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = latency;
    }

    /// Calls made to `endpoint` or `endpoint/param`.
    pub fn calls(&self, endpoint: &str) -> usize {
        self.inner.calls.get(endpoint).map(|c| *c).unwrap_or(0)
    }

    /// Calls across all endpoints.
    pub fn total_calls(&self) -> usize {
        self.inner
            .calls
            .iter()
            .filter(|entry| !entry.key().contains('/'))
            .map(|entry| *entry.value())
            .sum()
    }

    pub fn reset_calls(&self) {
        self.inner.calls.clear();
    }

    async fn enter(&self, endpoint: &str, param: Option<&str>) -> Result<()> {
        let full = param.map(|p| format!("{}/{}", endpoint, p));
        *self.inner.calls.entry(endpoint.to_string()).or_insert(0) += 1;
        if let Some(full) = &full {
            *self.inner.calls.entry(full.clone()).or_insert(0) += 1;
        }

        let latency = *self
            .inner
            .latency
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let injected = full
            .as_deref()
            .and_then(|f| self.inner.failures.get(f).map(|e| e.clone()))
            .or_else(|| self.inner.failures.get(endpoint).map(|e| e.clone()));
        match injected {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn company(&self, id: &str) -> Company {
        self.data()
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap_or_default()
    }

    fn vessel(&self, id: &str) -> Vessel {
        self.data()
            .vessels
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .unwrap_or_default()
    }
}

fn apply_company(company: &mut Company, request: &CompanyRequest) {
    company.name = request.name.clone();
    company.registration_number = request.registration_number.clone();
    company.address = request.address.clone();
    company.city = request.city.clone();
    company.province = request.province.clone();
    company.postal_code = request.postal_code.clone();
    company.country = request.country.clone();
    company.phone = request.phone.clone();
    company.email = request.email.clone();
    company.website = request.website.clone();
    company.updated_at = now_millis_string();
}

fn apply_vessel(vessel: &mut Vessel, request: &VesselRequest, vessel_type: VesselType) {
    fn some(value: &str) -> Option<String> {
        Some(value.to_string()).filter(|v| !v.is_empty())
    }

    vessel.name = request.name.clone();
    vessel.previous_name = request.previous_name.clone();
    vessel.imo = request.imo.clone();
    vessel.mmsi = some(&request.mmsi);
    vessel.flag = some(&request.flag);
    vessel.callsign = some(&request.callsign);
    vessel.gross_tonnage = Some(request.gross_tonnage);
    vessel.summer_deadweight = Some(request.summer_deadweight);
    vessel.year_of_build = Some(request.year_of_build);
    vessel.place_of_build = some(&request.place_of_build);
    vessel.company_id = some(&request.company_id);
    vessel.vessel_type = vessel_type;
    vessel.updated_at = now_millis_string();
}

impl AdminRepository for InMemoryRepository {
    async fn list_invoices(&self) -> Result<ApiResponse<Vec<Invoice>>> {
        self.enter("get-invoices", None).await?;
        Ok(ApiResponse::ok(self.data().invoices.clone()))
    }

    async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<ApiResponse<Invoice>> {
        self.enter("create-invoice", None).await?;
        let id = self.next_id();
        let invoice = Invoice {
            id,
            invoice_code: format!("INV-{:05}", id),
            price: request.price.clone(),
            payment_method: request.payment_method.clone(),
            created_at: now_millis_string(),
            updated_at: now_millis_string(),
            ..Invoice::default()
        };
        self.data().invoices.push(invoice.clone());
        Ok(ApiResponse::ok(invoice))
    }

    async fn update_invoice(&self, request: &UpdateInvoiceRequest) -> Result<ApiResponse<Invoice>> {
        self.enter("update-invoice", None).await?;
        let mut data = self.data();
        let invoice = data
            .invoices
            .iter_mut()
            .find(|i| i.id == request.id)
            .ok_or_else(|| not_found("invoice", request.id))?;
        invoice.price = request.price.clone();
        invoice.payment_method = request.payment_method.clone();
        invoice.payment_status = request.payment_status;
        invoice.paid_at = request.paid_at.clone();
        if !request.payment_receipt.is_empty() {
            invoice.payment_receipt = request.payment_receipt.clone();
        }
        invoice.updated_at = now_millis_string();
        Ok(ApiResponse::ok(invoice.clone()))
    }

    async fn upload_payment_receipt(
        &self,
        invoice_id: i64,
        receipt: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        self.enter("upload-payment-receipt", Some(&invoice_id.to_string()))
            .await?;
        let url = format!("memory://receipts/{}/{}", invoice_id, receipt.file_name);
        let mut data = self.data();
        let invoice = data
            .invoices
            .iter_mut()
            .find(|i| i.id == invoice_id)
            .ok_or_else(|| not_found("invoice", invoice_id))?;
        invoice.payment_receipt = url.clone();
        Ok(ApiResponse::ok(json!({ "payment_receipt": url })))
    }

    async fn list_companies(&self) -> Result<ApiResponse<Vec<Company>>> {
        self.enter("get-companies", None).await?;
        Ok(ApiResponse::ok(self.data().companies.clone()))
    }

    async fn get_company(&self, id: &str) -> Result<ApiResponse<Company>> {
        self.enter("get-company", Some(id)).await?;
        self.data()
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(ApiResponse::ok)
            .ok_or_else(|| not_found("company", id))
    }

    async fn create_company(&self, request: &CompanyRequest) -> Result<ApiResponse<Company>> {
        self.enter("create-company", None).await?;
        let mut company = Company {
            id: format!("company-{}", self.next_id()),
            created_at: now_millis_string(),
            ..Company::default()
        };
        apply_company(&mut company, request);
        self.data().companies.push(company.clone());
        Ok(ApiResponse::ok(company))
    }

    async fn update_company(
        &self,
        id: &str,
        request: &CompanyRequest,
    ) -> Result<ApiResponse<Company>> {
        self.enter("update-company", Some(id)).await?;
        let mut data = self.data();
        let company = data
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("company", id))?;
        apply_company(company, request);
        Ok(ApiResponse::ok(company.clone()))
    }

    async fn update_company_logo(&self, id: &str, logo: &FileUpload) -> Result<ApiResponse<Value>> {
        self.enter("update-company-logo", Some(id)).await?;
        let url = format!("memory://logos/{}/{}", id, logo.file_name);
        let mut data = self.data();
        let company = data
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("company", id))?;
        company.logo = url.clone();
        Ok(ApiResponse::ok(json!({ "logo": url })))
    }

    async fn delete_company(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.enter("delete-company", Some(id)).await?;
        let mut data = self.data();
        let before = data.companies.len();
        data.companies.retain(|c| c.id != id);
        if data.companies.len() == before {
            return Err(not_found("company", id));
        }
        data.vessels.retain(|v| v.company_id.as_deref() != Some(id));
        data.crews.retain(|c| c.company.id != id);
        Ok(ApiResponse::ok(Value::Null))
    }

    async fn list_vessels_by_company(&self, company_id: &str) -> Result<ApiResponse<Vec<Vessel>>> {
        self.enter("get-vessels-by-company", Some(company_id))
            .await?;
        let vessels = self
            .data()
            .vessels
            .iter()
            .filter(|v| v.company_id.as_deref() == Some(company_id))
            .cloned()
            .collect();
        Ok(ApiResponse::ok(vessels))
    }

    async fn create_vessel(&self, request: &VesselRequest) -> Result<ApiResponse<Vessel>> {
        self.enter("create-vessel", None).await?;
        let vessel_type = self
            .data()
            .vessel_types
            .iter()
            .find(|t| t.id == request.vesseltype_id)
            .cloned()
            .unwrap_or_default();
        let mut vessel = Vessel {
            id: format!("vessel-{}", self.next_id()),
            created_at: now_millis_string(),
            ..Vessel::default()
        };
        apply_vessel(&mut vessel, request, vessel_type);
        self.data().vessels.push(vessel.clone());
        Ok(ApiResponse::ok(vessel))
    }

    async fn update_vessel(&self, request: &VesselRequest) -> Result<ApiResponse<Vessel>> {
        let id = request.id.clone().unwrap_or_default();
        self.enter("update-vessel", Some(&id)).await?;
        let mut data = self.data();
        let vessel_type = data
            .vessel_types
            .iter()
            .find(|t| t.id == request.vesseltype_id)
            .cloned()
            .unwrap_or_default();
        let vessel = data
            .vessels
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| not_found("vessel", &id))?;
        apply_vessel(vessel, request, vessel_type);
        Ok(ApiResponse::ok(vessel.clone()))
    }

    async fn update_vessel_image(
        &self,
        id: &str,
        image: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        self.enter("update-vessel-image", Some(id)).await?;
        let url = format!("memory://vessels/{}/{}", id, image.file_name);
        let mut data = self.data();
        let vessel = data
            .vessels
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| not_found("vessel", id))?;
        vessel.image = Some(url.clone());
        Ok(ApiResponse::ok(json!({ "image": url })))
    }

    async fn delete_vessel(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.enter("delete-vessel", Some(id)).await?;
        let mut data = self.data();
        let before = data.vessels.len();
        data.vessels.retain(|v| v.id != id);
        if data.vessels.len() == before {
            return Err(not_found("vessel", id));
        }
        data.crews.retain(|c| c.vessel_id != id);
        Ok(ApiResponse::ok(Value::Null))
    }

    async fn list_crews_by_vessel(&self, vessel_id: &str) -> Result<ApiResponse<Vec<CrewMember>>> {
        self.enter("get-crews-by-vessel", Some(vessel_id)).await?;
        let crews = self
            .data()
            .crews
            .iter()
            .filter(|c| c.vessel_id == vessel_id)
            .cloned()
            .collect();
        Ok(ApiResponse::ok(crews))
    }

    async fn list_crews_by_company(
        &self,
        company_id: &str,
    ) -> Result<ApiResponse<Vec<CrewMember>>> {
        self.enter("get-crews-by-company", Some(company_id)).await?;
        let crews = self
            .data()
            .crews
            .iter()
            .filter(|c| c.company.id == company_id)
            .cloned()
            .collect();
        Ok(ApiResponse::ok(crews))
    }

    async fn update_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> Result<ApiResponse<Value>> {
        self.enter("update-vessel-member", Some(&request.vessel_id))
            .await?;
        let company = self.company(&request.company_id);
        let mut data = self.data();
        let role = data
            .roles
            .iter()
            .find(|r| r.code == request.user_role_code)
            .cloned()
            .unwrap_or_else(|| UserRole {
                code: request.user_role_code.clone(),
                ..UserRole::default()
            });
        let existing = data
            .crews
            .iter_mut()
            .find(|c| c.vessel_id == request.vessel_id && c.user.id == request.user_id);
        match existing {
            Some(crew) => crew.user_role = role,
            None => {
                let user = data
                    .users
                    .iter()
                    .find(|u| u.id == request.user_id)
                    .cloned()
                    .ok_or_else(|| not_found("user", &request.user_id))?;
                let id = format!("crew-{}", self.next_id());
                data.crews.push(CrewMember {
                    id,
                    vessel_id: request.vessel_id.clone(),
                    start_at: Some(now_millis_string()),
                    user,
                    user_role: role,
                    company,
                });
            }
        }
        Ok(ApiResponse::ok(Value::Null))
    }

    async fn remove_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> Result<ApiResponse<Value>> {
        self.enter("remove-vessel-member", Some(&request.vessel_id))
            .await?;
        let mut data = self.data();
        let before = data.crews.len();
        data.crews
            .retain(|c| !(c.vessel_id == request.vessel_id && c.user.id == request.user_id));
        if data.crews.len() == before {
            return Err(not_found("vessel member", &request.user_id));
        }
        Ok(ApiResponse::ok(Value::Null))
    }

    async fn list_licenses(&self) -> Result<ApiResponse<Vec<License>>> {
        self.enter("get-maintena-licenses", None).await?;
        Ok(ApiResponse::ok(self.data().licenses.clone()))
    }

    async fn create_license(&self, request: &CreateLicenseRequest) -> Result<ApiResponse<License>> {
        self.enter("create-maintena-license", None).await?;
        let license = License {
            license_code: format!("LIC-{:05}", self.next_id()),
            valid_until: request.valid_until.clone(),
            company: self.company(&request.company_id),
            vessel: self.vessel(&request.vessel_id),
        };
        let mut data = self.data();
        if let Some(invoice) = data.invoices.iter_mut().find(|i| i.id == request.invoice_id) {
            invoice.price = request.price.clone();
        }
        data.licenses.push(license.clone());
        Ok(ApiResponse::ok(license))
    }

    async fn update_license(&self, request: &UpdateLicenseRequest) -> Result<ApiResponse<License>> {
        self.enter("update-maintena-license", Some(&request.license_code))
            .await?;
        let mut data = self.data();
        let license = data
            .licenses
            .iter_mut()
            .find(|l| l.license_code == request.license_code)
            .ok_or_else(|| not_found("license", &request.license_code))?;
        license.valid_until = request.valid_until.clone();
        Ok(ApiResponse::ok(license.clone()))
    }

    async fn list_invitations(&self) -> Result<ApiResponse<Vec<Invitation>>> {
        self.enter("get-invitations", None).await?;
        Ok(ApiResponse::ok(self.data().invitations.clone()))
    }

    async fn list_roles(&self) -> Result<ApiResponse<Vec<UserRole>>> {
        self.enter("get-roles", None).await?;
        Ok(ApiResponse::ok(self.data().roles.clone()))
    }

    async fn list_vessel_types(&self) -> Result<ApiResponse<Vec<VesselType>>> {
        self.enter("get-vessel-types", None).await?;
        Ok(ApiResponse::ok(self.data().vessel_types.clone()))
    }

    async fn get_notification_setting(&self) -> Result<ApiResponse<Option<NotificationSetting>>> {
        self.enter("get-notification-setting", None).await?;
        Ok(ApiResponse::ok(self.data().notification_setting.clone()))
    }

    async fn save_notification_setting(
        &self,
        request: &NotificationSettingRequest,
    ) -> Result<ApiResponse<NotificationSetting>> {
        self.enter("save-notification-setting", None).await?;
        let id = if request.id == 0 {
            self.next_id()
        } else {
            request.id
        };
        let mut data = self.data();
        let created_at = data
            .notification_setting
            .as_ref()
            .map(|s| s.created_at.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(now_millis_string);
        let saved = NotificationSetting {
            id,
            user_id: request.user_id.clone(),
            telegram_chat_id: request.telegram_chat_id.clone(),
            telegram_username: request.telegram_username.clone(),
            email: request.email.clone(),
            phone_number: request.phone_number.clone(),
            whatsapp_number: request.whatsapp_number.clone(),
            created_at,
            updated_at: now_millis_string(),
        };
        data.notification_setting = Some(saved.clone());
        Ok(ApiResponse::ok(saved))
    }

    async fn dashboard_overview(&self) -> Result<ApiResponse<DashboardOverview>> {
        self.enter("dashboard-overview", None).await?;
        Ok(ApiResponse::ok(self.data().dashboard.clone()))
    }

    async fn list_contact_messages(&self) -> Result<ApiResponse<Vec<ContactMessage>>> {
        self.enter("all-contact-us", None).await?;
        Ok(ApiResponse::ok(self.data().contact_messages.clone()))
    }

    async fn set_contact_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<ApiResponse<Value>> {
        self.enter("contact-us", Some(&id.to_string())).await?;
        let mut data = self.data();
        let message = data
            .contact_messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("contact message", id))?;
        message.status = status;
        message.updated_at = now_millis_string();
        Ok(ApiResponse::ok(json!({ "id": id, "status": status.as_str() })))
    }

    async fn list_users(&self) -> Result<ApiResponse<Vec<User>>> {
        self.enter("get-all-users", None).await?;
        Ok(ApiResponse::ok(self.data().users.clone()))
    }

    async fn list_sessions(&self) -> Result<ApiResponse<Vec<Session>>> {
        self.enter("get-sessions", None).await?;
        Ok(ApiResponse::ok(self.data().sessions.clone()))
    }

    async fn delete_session(&self, id: i64) -> Result<ApiResponse<Value>> {
        self.enter("delete-session", Some(&id.to_string())).await?;
        let mut data = self.data();
        let before = data.sessions.len();
        data.sessions.retain(|s| s.id != id);
        if data.sessions.len() == before {
            return Err(not_found("session", id));
        }
        Ok(ApiResponse::ok(Value::Null))
    }
}
