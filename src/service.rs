//! High-level service for the dashboard.
//!
//! `AdminService` binds a [`QueryCache`], an [`AdminRepository`], a
//! [`Clock`] and a display [`Locale`], and exposes one cached query per
//! dashboard resource plus the [`MutationCoordinator`] for writes.

use crate::api::RestClient;
use crate::backend::{InMemoryStore, QueryStore};
use crate::cache::{create_cache, fan_out, QueryCache};
use crate::clock::{Clock, SystemClock};
use crate::config::AdminConfig;
use crate::error::{Error, Result};
use crate::filter::{
    ContactFilter, CrewFilter, Filter, InvoiceFilter, LicenseFilter, SessionFilter, UserFilter,
};
use crate::format::Locale;
use crate::key::{collections, QueryKey};
use crate::model::{
    CompanyView, ContactMessage, CrewMemberView, DashboardOverview, InvitationView, InvoiceView,
    LicenseView, NotificationSettingView, Session, User, UserRole, VesselType, VesselView,
};
use crate::mutation::MutationCoordinator;
use crate::repository::AdminRepository;
use crate::strategy::{FetchStrategy, QueryOptions, Retry};
use crate::transform::{
    company_view, crew_view, invitation_view, invoice_view, license_view,
    notification_setting_view, vessel_view,
};
use std::future::Future;
use std::sync::Arc;

/// Dashboard data service.
///
/// Cloning is cheap; clones share the cache, the repository and the clock.
///
/// # Example
///
/// ```
/// use fleetdesk::repository::{InMemoryRepository, RepositoryData};
/// use fleetdesk::model::Invoice;
/// use fleetdesk::{create_cache, AdminService};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> fleetdesk::Result<()> {
/// let repo = InMemoryRepository::new(RepositoryData {
///     invoices: vec![Invoice { id: 1, price: "150000".into(), ..Invoice::default() }],
///     ..RepositoryData::default()
/// });
/// let service = AdminService::new(create_cache(), Arc::new(repo.clone()));
///
/// let invoices = service.invoices().await?;
/// assert_eq!(invoices[0].formatted_price, "Rp 150.000");
///
/// // Second read is served from the cache.
/// service.invoices().await?;
/// assert_eq!(repo.calls("get-invoices"), 1);
/// # Ok(())
/// # }
/// ```
pub struct AdminService<R, S: QueryStore = InMemoryStore> {
    cache: QueryCache<S>,
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    locale: Locale,
    mutations: MutationCoordinator<R, S>,
}

impl<R, S: QueryStore> Clone for AdminService<R, S> {
    fn clone(&self) -> Self {
        AdminService {
            cache: self.cache.clone(),
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
            locale: self.locale.clone(),
            mutations: self.mutations.clone(),
        }
    }
}

impl AdminService<RestClient> {
    /// Service over the REST backend described by `config`, with a fresh
    /// in-memory cache and the system clock.
    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        let client = RestClient::from_config(config)?;
        Ok(AdminService::new(create_cache(), Arc::new(client)).with_locale(config.locale()))
    }
}

impl<R: AdminRepository, S: QueryStore> AdminService<R, S> {
    pub fn new(cache: QueryCache<S>, repo: Arc<R>) -> Self {
        let locale = Locale::default();
        AdminService {
            mutations: MutationCoordinator::new(cache.clone(), Arc::clone(&repo), locale.clone()),
            cache,
            repo,
            clock: Arc::new(SystemClock),
            locale,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.mutations =
            MutationCoordinator::new(self.cache.clone(), Arc::clone(&self.repo), locale.clone());
        self.locale = locale;
        self
    }

    pub fn cache(&self) -> &QueryCache<S> {
        &self.cache
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Coordinators for every write.
    pub fn mutations(&self) -> &MutationCoordinator<R, S> {
        &self.mutations
    }

    /// Loader closure that hands a clone of the service to `load` on every
    /// attempt.
    fn loader<T, F, Fut>(&self, load: F) -> impl FnMut() -> Fut + Send + 'static
    where
        F: Fn(Self) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let service = self.clone();
        move || load(service.clone())
    }

    // ------------------------------------------------------------------
    // Invoices and settings
    // ------------------------------------------------------------------

    pub async fn invoices(&self) -> Result<Vec<InvoiceView>> {
        let key = QueryKey::new(collections::INVOICES);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move {
                    let response = svc.repo.list_invoices().await?;
                    Ok(response
                        .data
                        .iter()
                        .map(|invoice| invoice_view(invoice, &svc.locale))
                        .collect())
                }),
            )
            .await
    }

    /// A setting never saved comes back as an empty view with `is_new`.
    pub async fn notification_setting(&self) -> Result<NotificationSettingView> {
        let key = QueryKey::new(collections::NOTIFICATION_SETTING);
        let options = QueryOptions::default().with_retry(Retry::exponential(1));
        self.cache
            .fetch_with(
                &key,
                options,
                FetchStrategy::Refresh,
                self.loader(|svc| async move {
                    let response = svc.repo.get_notification_setting().await?;
                    let setting = response.data.unwrap_or_default();
                    Ok(notification_setting_view(&setting, &svc.locale))
                }),
            )
            .await
    }

    pub async fn dashboard_overview(&self) -> Result<DashboardOverview> {
        let key = QueryKey::new(collections::DASHBOARD_OVERVIEW);
        let options = QueryOptions::default().with_retry(Retry::exponential(3));
        self.cache
            .fetch_with(
                &key,
                options,
                FetchStrategy::Refresh,
                self.loader(|svc| async move {
                    Ok(svc.repo.dashboard_overview().await?.data)
                }),
            )
            .await
    }

    // ------------------------------------------------------------------
    // Companies and vessels
    // ------------------------------------------------------------------

    pub async fn companies(&self) -> Result<Vec<CompanyView>> {
        let key = QueryKey::new(collections::COMPANIES);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move {
                    let response = svc.repo.list_companies().await?;
                    Ok(response
                        .data
                        .iter()
                        .map(|company| company_view(company, &svc.locale))
                        .collect())
                }),
            )
            .await
    }

    /// # Errors
    ///
    /// `Error::ValidationError` for an empty `id`; no request is made.
    pub async fn company(&self, id: &str) -> Result<CompanyView> {
        if id.trim().is_empty() {
            return Err(Error::ValidationError("Company id is required".to_string()));
        }
        let key = QueryKey::new(collections::COMPANIES)
            .with("detail")
            .with(id);
        let id = id.to_string();
        self.cache
            .fetch(
                &key,
                self.loader(move |svc| {
                    let id = id.clone();
                    async move {
                        let response = svc.repo.get_company(&id).await?;
                        Ok(company_view(&response.data, &svc.locale))
                    }
                }),
            )
            .await
    }

    /// Vessels of one company, labelled with the company's name when the
    /// company list is available.
    pub async fn vessels_by_company(&self, company_id: &str) -> Result<Vec<VesselView>> {
        if company_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let key = QueryKey::new(collections::VESSELS)
            .with("company")
            .with(company_id);
        let company_id = company_id.to_string();
        self.cache
            .fetch(
                &key,
                self.loader(move |svc| {
                    let company_id = company_id.clone();
                    async move {
                        let response = svc.repo.list_vessels_by_company(&company_id).await?;
                        let companies = svc.companies().await.unwrap_or_default();
                        let company_name = companies
                            .iter()
                            .find(|c| c.id == company_id)
                            .map(|c| c.name.as_str());
                        Ok(response
                            .data
                            .iter()
                            .map(|vessel| vessel_view(vessel, company_name))
                            .collect())
                    }
                }),
            )
            .await
    }

    /// Company ids for the aggregate queries, or `None` when the company
    /// list failed or is empty.
    async fn company_ids(&self, aggregate: &str) -> Option<Vec<String>> {
        match self.companies().await {
            Ok(companies) if !companies.is_empty() => {
                Some(companies.into_iter().map(|c| c.id).collect())
            }
            Ok(_) => {
                debug!("No companies, {} is empty", aggregate);
                None
            }
            Err(e) => {
                warn!("Companies unavailable, {} is empty: {}", aggregate, e);
                None
            }
        }
    }

    /// Every vessel of every company.
    ///
    /// Issues one `vessels:company:{id}` query per company. A company whose
    /// vessels fail to load is skipped. If the company list itself fails or
    /// is empty the result is empty, nothing else is requested and nothing
    /// is cached.
    pub async fn all_vessels(&self) -> Result<Vec<VesselView>> {
        let Some(company_ids) = self.company_ids("vessels:all").await else {
            return Ok(Vec::new());
        };
        let key = QueryKey::new(collections::VESSELS).with("all");
        self.cache
            .fetch(
                &key,
                self.loader(move |svc| {
                    let company_ids = company_ids.clone();
                    async move {
                        let vessels = fan_out(company_ids, "vessels", |company_id| {
                            let svc = svc.clone();
                            async move { svc.vessels_by_company(&company_id).await }
                        })
                        .await;
                        Ok(vessels.items)
                    }
                }),
            )
            .await
    }

    fn vessel_name(vessels: &[VesselView], vessel_id: &str) -> Option<String> {
        vessels
            .iter()
            .find(|v| v.id == vessel_id)
            .map(|v| v.name.clone())
    }

    // ------------------------------------------------------------------
    // Crews
    // ------------------------------------------------------------------

    pub async fn crews_by_vessel(&self, vessel_id: &str) -> Result<Vec<CrewMemberView>> {
        if vessel_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let key = QueryKey::new(collections::CREWS)
            .with("vessel")
            .with(vessel_id);
        let vessel_id = vessel_id.to_string();
        self.cache
            .fetch(
                &key,
                self.loader(move |svc| {
                    let vessel_id = vessel_id.clone();
                    async move {
                        let response = svc.repo.list_crews_by_vessel(&vessel_id).await?;
                        let vessels = svc.all_vessels().await.unwrap_or_default();
                        let vessel_name = Self::vessel_name(&vessels, &vessel_id);
                        Ok(response
                            .data
                            .iter()
                            .map(|crew| crew_view(crew, vessel_name.as_deref(), &svc.locale))
                            .collect())
                    }
                }),
            )
            .await
    }

    pub async fn crews_by_company(&self, company_id: &str) -> Result<Vec<CrewMemberView>> {
        if company_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let key = QueryKey::new(collections::CREWS)
            .with("company")
            .with(company_id);
        let company_id = company_id.to_string();
        self.cache
            .fetch(
                &key,
                self.loader(move |svc| {
                    let company_id = company_id.clone();
                    async move {
                        let response = svc.repo.list_crews_by_company(&company_id).await?;
                        let vessels = svc.all_vessels().await.unwrap_or_default();
                        Ok(response
                            .data
                            .iter()
                            .map(|crew| {
                                let vessel_name = Self::vessel_name(&vessels, &crew.vessel_id);
                                crew_view(crew, vessel_name.as_deref(), &svc.locale)
                            })
                            .collect())
                    }
                }),
            )
            .await
    }

    /// Every crew member of every company, one `crews:company:{id}` query
    /// per company. Same empty-result rules as [`all_vessels`](Self::all_vessels).
    pub async fn all_crews(&self) -> Result<Vec<CrewMemberView>> {
        let Some(company_ids) = self.company_ids("crews:all").await else {
            return Ok(Vec::new());
        };
        let key = QueryKey::new(collections::CREWS).with("all");
        self.cache
            .fetch(
                &key,
                self.loader(move |svc| {
                    let company_ids = company_ids.clone();
                    async move {
                        let crews = fan_out(company_ids, "crews", |company_id| {
                            let svc = svc.clone();
                            async move { svc.crews_by_company(&company_id).await }
                        })
                        .await;
                        Ok(crews.items)
                    }
                }),
            )
            .await
    }

    // ------------------------------------------------------------------
    // Licenses, invitations and lookups
    // ------------------------------------------------------------------

    pub async fn licenses(&self) -> Result<Vec<LicenseView>> {
        let key = QueryKey::new(collections::LICENSES);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move {
                    let response = svc.repo.list_licenses().await?;
                    let now = svc.clock.now_millis();
                    Ok(response
                        .data
                        .iter()
                        .map(|license| license_view(license, now, &svc.locale))
                        .collect())
                }),
            )
            .await
    }

    pub async fn invitations(&self) -> Result<Vec<InvitationView>> {
        let key = QueryKey::new(collections::INVITATIONS);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move {
                    let response = svc.repo.list_invitations().await?;
                    let now = svc.clock.now_millis();
                    Ok(response
                        .data
                        .iter()
                        .map(|invitation| invitation_view(invitation, now, &svc.locale))
                        .collect())
                }),
            )
            .await
    }

    pub async fn roles(&self) -> Result<Vec<UserRole>> {
        let key = QueryKey::new(collections::ROLES);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move { Ok(svc.repo.list_roles().await?.data) }),
            )
            .await
    }

    pub async fn vessel_types(&self) -> Result<Vec<VesselType>> {
        let key = QueryKey::new(collections::VESSEL_TYPES);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move { Ok(svc.repo.list_vessel_types().await?.data) }),
            )
            .await
    }

    // ------------------------------------------------------------------
    // Contact messages, users and sessions
    // ------------------------------------------------------------------

    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let key = QueryKey::new(collections::CONTACT_US);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move {
                    Ok(svc.repo.list_contact_messages().await?.data)
                }),
            )
            .await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        let key = QueryKey::new(collections::USERS);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move { Ok(svc.repo.list_users().await?.data) }),
            )
            .await
    }

    pub async fn sessions(&self) -> Result<Vec<Session>> {
        let key = QueryKey::new(collections::SESSIONS);
        self.cache
            .fetch(
                &key,
                self.loader(|svc| async move { Ok(svc.repo.list_sessions().await?.data) }),
            )
            .await
    }

    // ------------------------------------------------------------------
    // Filtered views
    // ------------------------------------------------------------------

    pub async fn filtered_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceView>> {
        Ok(filter.apply(&self.invoices().await?))
    }

    pub async fn filtered_crews(&self, filter: &CrewFilter) -> Result<Vec<CrewMemberView>> {
        Ok(filter.apply(&self.all_crews().await?))
    }

    pub async fn filtered_licenses(&self, filter: &LicenseFilter) -> Result<Vec<LicenseView>> {
        Ok(filter.apply(&self.licenses().await?))
    }

    pub async fn filtered_contact_messages(
        &self,
        filter: &ContactFilter,
    ) -> Result<Vec<ContactMessage>> {
        Ok(filter.apply(&self.contact_messages().await?))
    }

    pub async fn filtered_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        Ok(filter.apply(&self.users().await?))
    }

    pub async fn filtered_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>> {
        Ok(filter.apply(&self.sessions().await?))
    }
}
