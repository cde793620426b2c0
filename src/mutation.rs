//! Mutation coordinators.
//!
//! Every write goes through [`MutationCoordinator`]: local validation first
//! (a failure never reaches the network), then the repository call, then on
//! success the invalidation of every query the write affects. A failed write
//! returns its error unchanged and invalidates nothing.

use crate::api::ApiResponse;
use crate::backend::{InMemoryStore, QueryStore};
use crate::cache::QueryCache;
use crate::error::Result;
use crate::format::Locale;
use crate::key::{collections, QueryKey};
use crate::model::{
    Company, CompanyRequest, ContactStatus, CreateInvoiceRequest, FileUpload, Invoice, License,
    NotificationSettingView, Vessel, VesselMemberRequest, VesselRequest,
};
use crate::repository::AdminRepository;
use crate::transform::{notification_setting_request, notification_setting_view};
use crate::validation::{
    require, validate_company, validate_create_invoice, validate_create_license, validate_image,
    validate_update_invoice, validate_update_license, validate_vessel, InvoiceUpdateForm,
    LicenseForm, LicenseUpdateForm,
};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Every write the dashboard can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    CreateInvoice,
    UpdateInvoice,
    UploadPaymentReceipt,
    SaveNotificationSetting,
    UpdateVesselMember,
    RemoveVesselMember,
    CreateCompany,
    UpdateCompany,
    UpdateCompanyLogo,
    DeleteCompany,
    CreateVessel,
    UpdateVessel,
    UpdateVesselImage,
    DeleteVessel,
    CreateLicense,
    UpdateLicense,
    SetContactStatus,
    TerminateSession,
}

impl MutationKind {
    /// Collections whose queries are stale after this write succeeds.
    pub fn affected(self) -> &'static [&'static str] {
        use collections::*;
        use MutationKind::*;

        match self {
            CreateInvoice | UpdateInvoice | UploadPaymentReceipt => &[INVOICES],
            SaveNotificationSetting => &[NOTIFICATION_SETTING],
            UpdateVesselMember | RemoveVesselMember => &[CREWS, VESSELS],
            CreateCompany | UpdateCompany | UpdateCompanyLogo => &[COMPANIES],
            DeleteCompany => &[COMPANIES, VESSELS, CREWS],
            CreateVessel => &[VESSELS, COMPANIES],
            UpdateVessel | UpdateVesselImage => &[VESSELS],
            DeleteVessel => &[VESSELS, COMPANIES, CREWS],
            CreateLicense => &[LICENSES, INVOICES],
            UpdateLicense => &[LICENSES],
            SetContactStatus => &[CONTACT_US],
            TerminateSession => &[SESSIONS],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MutationKind::CreateInvoice => "create invoice",
            MutationKind::UpdateInvoice => "update invoice",
            MutationKind::UploadPaymentReceipt => "upload payment receipt",
            MutationKind::SaveNotificationSetting => "save notification setting",
            MutationKind::UpdateVesselMember => "update vessel member",
            MutationKind::RemoveVesselMember => "remove vessel member",
            MutationKind::CreateCompany => "create company",
            MutationKind::UpdateCompany => "update company",
            MutationKind::UpdateCompanyLogo => "update company logo",
            MutationKind::DeleteCompany => "delete company",
            MutationKind::CreateVessel => "create vessel",
            MutationKind::UpdateVessel => "update vessel",
            MutationKind::UpdateVesselImage => "update vessel image",
            MutationKind::DeleteVessel => "delete vessel",
            MutationKind::CreateLicense => "create license",
            MutationKind::UpdateLicense => "update license",
            MutationKind::SetContactStatus => "update contact status",
            MutationKind::TerminateSession => "terminate session",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs writes against a repository and keeps the query cache honest.
pub struct MutationCoordinator<R, S: QueryStore = InMemoryStore> {
    cache: QueryCache<S>,
    repo: Arc<R>,
    locale: Locale,
}

impl<R, S: QueryStore> Clone for MutationCoordinator<R, S> {
    fn clone(&self) -> Self {
        MutationCoordinator {
            cache: self.cache.clone(),
            repo: Arc::clone(&self.repo),
            locale: self.locale.clone(),
        }
    }
}

impl<R: AdminRepository, S: QueryStore> MutationCoordinator<R, S> {
    pub fn new(cache: QueryCache<S>, repo: Arc<R>, locale: Locale) -> Self {
        MutationCoordinator {
            cache,
            repo,
            locale,
        }
    }

    /// Invalidate every collection `kind` affects. Returns the number of
    /// entries marked stale.
    pub fn invalidate_for(&self, kind: MutationKind) -> usize {
        kind.affected()
            .iter()
            .map(|collection| self.cache.invalidate(&QueryKey::new(collection)))
            .sum()
    }

    async fn run<T, Fut>(&self, kind: MutationKind, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match call.await {
            Ok(response) => {
                let marked = self.invalidate_for(kind);
                info!("{} succeeded, {} cached queries marked stale", kind, marked);
                Ok(response)
            }
            Err(e) => {
                warn!("{} failed: {}", kind, e);
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Invoices
    // ------------------------------------------------------------------

    pub async fn create_invoice(
        &self,
        request: &CreateInvoiceRequest,
    ) -> Result<ApiResponse<Invoice>> {
        let request = validate_create_invoice(request)?;
        self.run(MutationKind::CreateInvoice, self.repo.create_invoice(&request))
            .await
    }

    pub async fn update_invoice(&self, form: &InvoiceUpdateForm) -> Result<ApiResponse<Invoice>> {
        let request = validate_update_invoice(form)?;
        self.run(MutationKind::UpdateInvoice, self.repo.update_invoice(&request))
            .await
    }

    pub async fn upload_payment_receipt(
        &self,
        invoice_id: i64,
        receipt: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        validate_image(receipt, "payment receipt")?;
        self.run(
            MutationKind::UploadPaymentReceipt,
            self.repo.upload_payment_receipt(invoice_id, receipt),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Notification setting
    // ------------------------------------------------------------------

    /// Save the setting, write the saved view into the cache, then mark it
    /// stale so the next read confirms it with the server.
    pub async fn save_notification_setting(
        &self,
        setting: &NotificationSettingView,
    ) -> Result<NotificationSettingView> {
        let request = notification_setting_request(setting);
        let saved = self.repo.save_notification_setting(&request).await;
        let saved = match saved {
            Ok(response) => notification_setting_view(&response.data, &self.locale),
            Err(e) => {
                warn!("{} failed: {}", MutationKind::SaveNotificationSetting, e);
                return Err(e);
            }
        };
        self.cache
            .set(&QueryKey::new(collections::NOTIFICATION_SETTING), &saved)?;
        let marked = self.invalidate_for(MutationKind::SaveNotificationSetting);
        info!(
            "{} succeeded, {} cached queries marked stale",
            MutationKind::SaveNotificationSetting,
            marked
        );
        Ok(saved)
    }

    // ------------------------------------------------------------------
    // Vessel members
    // ------------------------------------------------------------------

    pub async fn update_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> Result<ApiResponse<Value>> {
        validate_member(request)?;
        require(&request.user_role_code, "Please select a role")?;
        self.run(
            MutationKind::UpdateVesselMember,
            self.repo.update_vessel_member(request),
        )
        .await
    }

    pub async fn remove_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> Result<ApiResponse<Value>> {
        validate_member(request)?;
        self.run(
            MutationKind::RemoveVesselMember,
            self.repo.remove_vessel_member(request),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Companies
    // ------------------------------------------------------------------

    pub async fn create_company(&self, request: &CompanyRequest) -> Result<ApiResponse<Company>> {
        validate_company(request)?;
        self.run(MutationKind::CreateCompany, self.repo.create_company(request))
            .await
    }

    pub async fn update_company(
        &self,
        id: &str,
        request: &CompanyRequest,
    ) -> Result<ApiResponse<Company>> {
        require(id, "Company id is required")?;
        validate_company(request)?;
        self.run(
            MutationKind::UpdateCompany,
            self.repo.update_company(id, request),
        )
        .await
    }

    pub async fn update_company_logo(
        &self,
        id: &str,
        logo: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        require(id, "Company id is required")?;
        validate_image(logo, "company logo")?;
        self.run(
            MutationKind::UpdateCompanyLogo,
            self.repo.update_company_logo(id, logo),
        )
        .await
    }

    pub async fn delete_company(&self, id: &str) -> Result<ApiResponse<Value>> {
        require(id, "Company id is required")?;
        self.run(MutationKind::DeleteCompany, self.repo.delete_company(id))
            .await
    }

    // ------------------------------------------------------------------
    // Vessels
    // ------------------------------------------------------------------

    pub async fn create_vessel(&self, request: &VesselRequest) -> Result<ApiResponse<Vessel>> {
        validate_vessel(request)?;
        self.run(MutationKind::CreateVessel, self.repo.create_vessel(request))
            .await
    }

    pub async fn update_vessel(&self, request: &VesselRequest) -> Result<ApiResponse<Vessel>> {
        require(
            request.id.as_deref().unwrap_or_default(),
            "Vessel id is required",
        )?;
        validate_vessel(request)?;
        self.run(MutationKind::UpdateVessel, self.repo.update_vessel(request))
            .await
    }

    pub async fn update_vessel_image(
        &self,
        id: &str,
        image: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        require(id, "Vessel id is required")?;
        validate_image(image, "vessel image")?;
        self.run(
            MutationKind::UpdateVesselImage,
            self.repo.update_vessel_image(id, image),
        )
        .await
    }

    pub async fn delete_vessel(&self, id: &str) -> Result<ApiResponse<Value>> {
        require(id, "Vessel id is required")?;
        self.run(MutationKind::DeleteVessel, self.repo.delete_vessel(id))
            .await
    }

    // ------------------------------------------------------------------
    // Licenses
    // ------------------------------------------------------------------

    pub async fn create_license(&self, form: &LicenseForm) -> Result<ApiResponse<License>> {
        let request = validate_create_license(form)?;
        self.run(MutationKind::CreateLicense, self.repo.create_license(&request))
            .await
    }

    pub async fn update_license(&self, form: &LicenseUpdateForm) -> Result<ApiResponse<License>> {
        let request = validate_update_license(form)?;
        self.run(MutationKind::UpdateLicense, self.repo.update_license(&request))
            .await
    }

    // ------------------------------------------------------------------
    // Contact messages and sessions
    // ------------------------------------------------------------------

    /// Move a contact message to `status`. The backend performs the
    /// transition on a GET; the cache is invalidated all the same.
    pub async fn set_contact_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<ApiResponse<Value>> {
        self.run(
            MutationKind::SetContactStatus,
            self.repo.set_contact_status(id, status),
        )
        .await
    }

    pub async fn terminate_session(&self, id: i64) -> Result<ApiResponse<Value>> {
        self.run(MutationKind::TerminateSession, self.repo.delete_session(id))
            .await
    }
}

fn validate_member(request: &VesselMemberRequest) -> Result<()> {
    require(&request.vessel_id, "Please select a vessel")?;
    require(&request.user_id, "Please select a user")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::error::Error;
    use crate::model::{Invoice, NotificationSetting};
    use crate::repository::{InMemoryRepository, RepositoryData};

    fn setup() -> (
        QueryCache,
        InMemoryRepository,
        MutationCoordinator<InMemoryRepository>,
    ) {
        let cache = create_cache();
        let repo = InMemoryRepository::new(RepositoryData {
            invoices: vec![Invoice {
                id: 1,
                invoice_code: "INV-00001".to_string(),
                price: "150000".to_string(),
                payment_method: "BANK".to_string(),
                ..Invoice::default()
            }],
            ..RepositoryData::default()
        });
        let coordinator =
            MutationCoordinator::new(cache.clone(), Arc::new(repo.clone()), Locale::default());
        (cache, repo, coordinator)
    }

    #[test]
    fn test_affected_collections() {
        assert_eq!(MutationKind::CreateInvoice.affected(), &["invoices"]);
        assert_eq!(
            MutationKind::DeleteCompany.affected(),
            &["companies", "vessels", "crews"]
        );
        assert_eq!(MutationKind::CreateLicense.affected(), &["licenses", "invoices"]);
        assert_eq!(MutationKind::SetContactStatus.affected(), &["contact-us"]);
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_call() {
        let (_, repo, coordinator) = setup();
        let err = coordinator
            .create_invoice(&CreateInvoiceRequest {
                price: "0".to_string(),
                payment_method: "BANK".to_string(),
            })
            .await
            .expect_err("price 0 is rejected");

        assert!(matches!(
            err,
            Error::ValidationError(ref m) if m.contains("must be a valid positive number")
        ));
        assert_eq!(repo.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_success_invalidates() {
        let (cache, _, coordinator) = setup();
        let invoices = QueryKey::new("invoices");
        let licenses = QueryKey::new("licenses");
        cache.set(&invoices, &vec![1_i64]).expect("set");
        cache.set(&licenses, &vec![2_i64]).expect("set");

        coordinator
            .update_invoice(&InvoiceUpdateForm {
                id: 1,
                price: "200000".to_string(),
                payment_method: "CASH".to_string(),
                ..InvoiceUpdateForm::default()
            })
            .await
            .expect("update succeeds");

        assert!(cache.state::<Vec<i64>>(&invoices).is_stale);
        assert!(!cache.state::<Vec<i64>>(&licenses).is_stale);
    }

    #[tokio::test]
    async fn test_failure_invalidates_nothing() {
        let (cache, repo, coordinator) = setup();
        let invoices = QueryKey::new("invoices");
        cache.set(&invoices, &vec![1_i64]).expect("set");
        repo.fail("create-invoice", Error::http(500, "API Error: 500 Internal Server Error"));

        let err = coordinator
            .create_invoice(&CreateInvoiceRequest {
                price: "1000".to_string(),
                payment_method: "BANK".to_string(),
            })
            .await
            .expect_err("server failure");

        assert_eq!(err, Error::http(500, "API Error: 500 Internal Server Error"));
        assert!(!cache.state::<Vec<i64>>(&invoices).is_stale);
    }

    #[tokio::test]
    async fn test_save_notification_setting_writes_view() {
        let (cache, repo, coordinator) = setup();
        let view = notification_setting_view(&NotificationSetting::default(), &Locale::default());
        assert!(view.is_new);

        let saved = coordinator
            .save_notification_setting(&NotificationSettingView {
                telegram_username: "@harbor".to_string(),
                ..view
            })
            .await
            .expect("saved");

        assert!(!saved.is_new);
        let cached: Option<NotificationSettingView> = cache
            .get(&QueryKey::new("notification-setting"))
            .expect("decodes");
        assert_eq!(cached, Some(saved));
        assert_eq!(repo.calls("save-notification-setting"), 1);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let (_, repo, coordinator) = setup();
        let file = FileUpload::new("receipt.pdf", "application/pdf", vec![1]);
        let err = coordinator
            .upload_payment_receipt(1, &file)
            .await
            .expect_err("not an image");

        assert_eq!(
            err,
            Error::ValidationError("Please select an image file for payment receipt".to_string())
        );
        assert_eq!(repo.calls("upload-payment-receipt"), 0);
    }
}
