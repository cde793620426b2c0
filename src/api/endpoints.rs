use super::{ApiResponse, RestClient};
use crate::error::Result;
use crate::model::{
    Company, CompanyRequest, ContactMessage, ContactStatus, CreateInvoiceRequest,
    CreateLicenseRequest, CrewMember, DashboardOverview, FileUpload, Invitation, Invoice, License,
    NotificationSetting, NotificationSettingRequest, Session, UpdateInvoiceRequest,
    UpdateLicenseRequest, User, UserRole, Vessel, VesselMemberRequest, VesselRequest, VesselType,
};
use crate::repository::AdminRepository;
use serde_json::Value;

impl AdminRepository for RestClient {
    async fn list_invoices(&self) -> Result<ApiResponse<Vec<Invoice>>> {
        self.get("get-invoices").await
    }

    async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<ApiResponse<Invoice>> {
        self.post_json("create-invoice", request).await
    }

    async fn update_invoice(&self, request: &UpdateInvoiceRequest) -> Result<ApiResponse<Invoice>> {
        self.post_json("update-invoice", request).await
    }

    async fn upload_payment_receipt(
        &self,
        invoice_id: i64,
        receipt: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        self.post_file(
            "upload-payment-receipt",
            "receipt",
            receipt,
            &[("invoice_id", invoice_id.to_string())],
        )
        .await
    }

    async fn list_companies(&self) -> Result<ApiResponse<Vec<Company>>> {
        self.get("get-companies").await
    }

    async fn get_company(&self, id: &str) -> Result<ApiResponse<Company>> {
        self.get(&format!("get-company/{}", id)).await
    }

    async fn create_company(&self, request: &CompanyRequest) -> Result<ApiResponse<Company>> {
        self.post_json("create-company", request).await
    }

    async fn update_company(
        &self,
        id: &str,
        request: &CompanyRequest,
    ) -> Result<ApiResponse<Company>> {
        self.post_json(&format!("update-company/{}", id), request)
            .await
    }

    async fn update_company_logo(&self, id: &str, logo: &FileUpload) -> Result<ApiResponse<Value>> {
        self.post_file(&format!("update-company-logo/{}", id), "logo", logo, &[])
            .await
    }

    async fn delete_company(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.delete(&format!("delete-company/{}", id)).await
    }

    async fn list_vessels_by_company(&self, company_id: &str) -> Result<ApiResponse<Vec<Vessel>>> {
        self.get(&format!("get-vessels-by-company/{}", company_id)).await
    }

    async fn create_vessel(&self, request: &VesselRequest) -> Result<ApiResponse<Vessel>> {
        self.post_json("create-vessel", request).await
    }

    async fn update_vessel(&self, request: &VesselRequest) -> Result<ApiResponse<Vessel>> {
        self.post_json("update-vessel", request).await
    }

    async fn update_vessel_image(
        &self,
        id: &str,
        image: &FileUpload,
    ) -> Result<ApiResponse<Value>> {
        self.post_file(&format!("update-vessel-image/{}", id), "image", image, &[])
            .await
    }

    async fn delete_vessel(&self, id: &str) -> Result<ApiResponse<Value>> {
        self.delete(&format!("delete-vessel/{}", id)).await
    }

    async fn list_crews_by_vessel(&self, vessel_id: &str) -> Result<ApiResponse<Vec<CrewMember>>> {
        self.get(&format!("get-crews-by-vessel/{}", vessel_id)).await
    }

    async fn list_crews_by_company(
        &self,
        company_id: &str,
    ) -> Result<ApiResponse<Vec<CrewMember>>> {
        self.get(&format!("get-crews-by-company/{}", company_id)).await
    }

    async fn update_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> Result<ApiResponse<Value>> {
        self.post_json("update-vessel-member", request).await
    }

    async fn remove_vessel_member(
        &self,
        request: &VesselMemberRequest,
    ) -> Result<ApiResponse<Value>> {
        self.post_json("remove-vessel-member", request).await
    }

    async fn list_licenses(&self) -> Result<ApiResponse<Vec<License>>> {
        self.get("get-maintena-licenses").await
    }

    async fn create_license(&self, request: &CreateLicenseRequest) -> Result<ApiResponse<License>> {
        self.post_json("create-maintena-license", request).await
    }

    async fn update_license(&self, request: &UpdateLicenseRequest) -> Result<ApiResponse<License>> {
        self.post_json("update-maintena-license", request).await
    }

    async fn list_invitations(&self) -> Result<ApiResponse<Vec<Invitation>>> {
        self.get("get-invitations").await
    }

    async fn list_roles(&self) -> Result<ApiResponse<Vec<UserRole>>> {
        self.get("get-roles").await
    }

    async fn list_vessel_types(&self) -> Result<ApiResponse<Vec<VesselType>>> {
        self.get("get-vessel-types").await
    }

    async fn get_notification_setting(&self) -> Result<ApiResponse<Option<NotificationSetting>>> {
        self.get("get-notification-setting").await
    }

    async fn save_notification_setting(
        &self,
        request: &NotificationSettingRequest,
    ) -> Result<ApiResponse<NotificationSetting>> {
        self.post_json("save-notification-setting", request).await
    }

    async fn dashboard_overview(&self) -> Result<ApiResponse<DashboardOverview>> {
        self.get("dashboard-overview").await
    }

    async fn list_contact_messages(&self) -> Result<ApiResponse<Vec<ContactMessage>>> {
        self.get("all-contact-us").await
    }

    async fn set_contact_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<ApiResponse<Value>> {
        self.get(&format!("contact-us/{}/{}", id, status.as_str())).await
    }

    async fn list_users(&self) -> Result<ApiResponse<Vec<User>>> {
        self.get("get-all-users").await
    }

    async fn list_sessions(&self) -> Result<ApiResponse<Vec<Session>>> {
        self.get("get-sessions").await
    }

    async fn delete_session(&self, id: i64) -> Result<ApiResponse<Value>> {
        self.delete(&format!("delete-session/{}", id)).await
    }
}
