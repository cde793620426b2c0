//! Integration tests for fleetdesk
//!
//! These tests drive `AdminService` and its mutation coordinator end to end
//! against the in-memory repository.

use fleetdesk::model::{
    Company, CompanyRequest, ContactMessage, ContactStatus, CreateInvoiceRequest, CrewMember,
    Invoice, License, LicenseStatus, PaymentStatus, StatusTone, Vessel,
};
use fleetdesk::status::MILLIS_PER_DAY;
use fleetdesk::validation::LicenseForm;
use fleetdesk::{
    create_cache, drive, AdminService, ContactFilter, Error, FixedClock, InMemoryRepository,
    InvoiceFilter, LicenseFilter, MountToken, QueryKey, RepositoryData, ViewState,
};
use std::sync::Arc;
use std::time::Duration;

const NOW: i64 = 1_700_000_000_000;

fn company(id: &str, name: &str) -> Company {
    Company {
        id: id.to_string(),
        name: name.to_string(),
        city: "Surabaya".to_string(),
        province: "Jawa Timur".to_string(),
        ..Company::default()
    }
}

fn vessel(id: &str, name: &str, company_id: &str) -> Vessel {
    Vessel {
        id: id.to_string(),
        name: name.to_string(),
        imo: format!("IMO{}", id),
        company_id: Some(company_id.to_string()),
        ..Vessel::default()
    }
}

fn license(code: &str, days_from_now: i64) -> License {
    License {
        license_code: code.to_string(),
        valid_until: (NOW + days_from_now * MILLIS_PER_DAY).to_string(),
        company: company("c-1", "PT Samudra"),
        vessel: vessel("v-1", "KM Bahari", "c-1"),
    }
}

fn seed() -> RepositoryData {
    RepositoryData {
        invoices: vec![Invoice {
            id: 1,
            invoice_code: "INV-00001".to_string(),
            price: "150000".to_string(),
            payment_method: "BANK".to_string(),
            payment_status: false,
            created_at: "1714867200000".to_string(),
            ..Invoice::default()
        }],
        companies: vec![company("c-1", "PT Samudra"), company("c-2", "PT Nusantara")],
        vessels: vec![
            vessel("v-1", "KM Bahari", "c-1"),
            vessel("v-2", "KM Lestari", "c-2"),
            vessel("v-3", "KM Sentosa", "c-2"),
        ],
        crews: vec![
            CrewMember {
                id: "m-1".to_string(),
                vessel_id: "v-1".to_string(),
                company: company("c-1", "PT Samudra"),
                ..CrewMember::default()
            },
            CrewMember {
                id: "m-2".to_string(),
                vessel_id: "v-2".to_string(),
                company: company("c-2", "PT Nusantara"),
                ..CrewMember::default()
            },
        ],
        licenses: vec![
            license("LIC-EXPIRED", -1),
            license("LIC-TODAY", 0),
            license("LIC-30", 30),
            license("LIC-31", 31),
        ],
        contact_messages: vec![ContactMessage {
            id: 9,
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
            ..ContactMessage::default()
        }],
        ..RepositoryData::default()
    }
}

fn setup() -> (AdminService<InMemoryRepository>, InMemoryRepository) {
    let repo = InMemoryRepository::new(seed());
    let service = AdminService::new(create_cache(), Arc::new(repo.clone()))
        .with_clock(Arc::new(FixedClock::new(NOW)));
    (service, repo)
}

/// Test 1: Invoice view-model
///
/// A raw unpaid invoice becomes a display-ready record with Indonesian
/// currency and date formatting.
#[tokio::test]
async fn test_invoice_view_model() {
    let (service, _) = setup();

    let invoices = service.invoices().await.expect("invoices load");
    let invoice = &invoices[0];

    assert_eq!(invoice.formatted_price, "Rp 150.000");
    assert_eq!(invoice.payment_status, PaymentStatus::Unpaid);
    assert_eq!(invoice.formatted_paid_at, "-");
    assert_eq!(invoice.formatted_created_at, "05 Mei 2024");
    assert_eq!(invoice.status_color, StatusTone::Danger);
}

/// Test 2: In-flight deduplication
///
/// Two concurrent reads of the same key share one request.
#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let (service, repo) = setup();
    repo.set_latency(Some(Duration::from_millis(50)));

    let (first, second) = tokio::join!(service.invoices(), service.invoices());

    assert_eq!(first.expect("first read"), second.expect("second read"));
    assert_eq!(repo.calls("get-invoices"), 1);
}

/// Test 3: Reads within the staleness window are served from cache
#[tokio::test]
async fn test_repeat_reads_hit_cache() {
    let (service, repo) = setup();

    service.companies().await.expect("first read");
    service.companies().await.expect("second read");
    service.companies().await.expect("third read");

    assert_eq!(repo.calls("get-companies"), 1);
}

/// Test 4: A successful write invalidates the affected collection
#[tokio::test]
async fn test_create_invoice_invalidates_invoices() {
    let (service, repo) = setup();
    assert_eq!(service.invoices().await.expect("invoices").len(), 1);

    let created = service
        .mutations()
        .create_invoice(&CreateInvoiceRequest {
            price: " 250000 ".to_string(),
            payment_method: "BANK".to_string(),
        })
        .await
        .expect("invoice created");
    assert_eq!(created.data.price, "250000");

    let key = QueryKey::new("invoices");
    assert!(service.cache().state::<Vec<fleetdesk::model::InvoiceView>>(&key).is_stale);

    let invoices = service.invoices().await.expect("invoices reload");
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[1].formatted_price, "Rp 250.000");
    assert_eq!(repo.calls("get-invoices"), 2);
}

/// Test 5: Local validation never reaches the network
#[tokio::test]
async fn test_invalid_price_makes_no_request() {
    let (service, repo) = setup();

    let err = service
        .mutations()
        .create_invoice(&CreateInvoiceRequest {
            price: "0".to_string(),
            payment_method: "BANK".to_string(),
        })
        .await
        .expect_err("zero price is rejected");

    assert_eq!(
        err,
        Error::ValidationError("Price must be a valid positive number".to_string())
    );
    assert_eq!(repo.total_calls(), 0);
}

/// Test 6: A failed write invalidates nothing
#[tokio::test]
async fn test_failed_write_keeps_cache() {
    let (service, repo) = setup();
    service.companies().await.expect("companies");
    repo.fail("create-company", Error::http(500, "API Error: 500 Internal Server Error"));

    let err = service
        .mutations()
        .create_company(&CompanyRequest {
            name: "PT Baru".to_string(),
            ..CompanyRequest::default()
        })
        .await
        .expect_err("server rejects the write");
    assert!(matches!(err, Error::NetworkError { status: Some(500), .. }));

    service.companies().await.expect("companies");
    assert_eq!(repo.calls("get-companies"), 1);
}

/// Test 7: Aggregate over a failed prerequisite
///
/// When the company list fails, the all-vessels aggregate is empty and no
/// per-company request is issued.
#[tokio::test]
async fn test_all_vessels_when_companies_fail() {
    let (service, repo) = setup();
    repo.fail("get-companies", Error::http(500, "API Error: 500 Internal Server Error"));

    let vessels = service.all_vessels().await.expect("aggregate never fails");

    assert!(vessels.is_empty());
    assert_eq!(repo.calls("get-vessels-by-company"), 0);
}

/// Test 8: Partial fan-out
///
/// A company whose vessel list fails is skipped; the rest are kept in
/// company order.
#[tokio::test]
async fn test_all_vessels_skips_failed_company() {
    let (service, repo) = setup();
    repo.fail(
        "get-vessels-by-company/c-2",
        Error::http(503, "API Error: 503 Service Unavailable"),
    );

    let vessels = service.all_vessels().await.expect("vessels");

    let names: Vec<_> = vessels.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["KM Bahari"]);
    assert_eq!(vessels[0].company, "PT Samudra");
    assert_eq!(repo.calls("get-vessels-by-company/c-1"), 1);
    assert_eq!(repo.calls("get-vessels-by-company/c-2"), 1);
}

/// Test 9: Deleting a company refreshes every dependent aggregate
#[tokio::test]
async fn test_delete_company_cascades() {
    let (service, _) = setup();
    assert_eq!(service.all_vessels().await.expect("vessels").len(), 3);
    assert_eq!(service.all_crews().await.expect("crews").len(), 2);

    service
        .mutations()
        .delete_company("c-2")
        .await
        .expect("company deleted");

    let companies = service.companies().await.expect("companies");
    assert_eq!(companies.len(), 1);
    let vessels = service.all_vessels().await.expect("vessels");
    assert_eq!(vessels.len(), 1);
    assert_eq!(vessels[0].name, "KM Bahari");
    let crews = service.all_crews().await.expect("crews");
    assert_eq!(crews.len(), 1);
    assert_eq!(crews[0].vessel, "KM Bahari");
}

/// Test 10: License status boundaries
#[tokio::test]
async fn test_license_status_boundaries() {
    let (service, _) = setup();

    let licenses = service.licenses().await.expect("licenses");
    let status_of = |code: &str| {
        licenses
            .iter()
            .find(|l| l.license_code == code)
            .map(|l| (l.status, l.days_remaining))
            .expect("license present")
    };

    assert_eq!(status_of("LIC-EXPIRED"), (LicenseStatus::Expired, -1));
    assert_eq!(status_of("LIC-TODAY"), (LicenseStatus::ExpiringSoon, 0));
    assert_eq!(status_of("LIC-30"), (LicenseStatus::ExpiringSoon, 30));
    assert_eq!(status_of("LIC-31"), (LicenseStatus::Valid, 31));

    let expiring = service
        .filtered_licenses(&LicenseFilter {
            status: "Expiring Soon".to_string(),
            ..LicenseFilter::default()
        })
        .await
        .expect("filtered licenses");
    assert_eq!(expiring.len(), 2);
}

/// Test 11: License form validation order
#[tokio::test]
async fn test_create_license_requires_vessel() {
    let (service, repo) = setup();

    let err = service
        .mutations()
        .create_license(&LicenseForm {
            company_id: "c-1".to_string(),
            price: "500000".to_string(),
            ..LicenseForm::default()
        })
        .await
        .expect_err("vessel is required");

    assert_eq!(err, Error::ValidationError("Please select a vessel".to_string()));
    assert_eq!(repo.total_calls(), 0);
}

/// Test 12: A result arriving after unmount is dropped
#[tokio::test]
async fn test_unmounted_view_ignores_late_result() {
    let (service, repo) = setup();
    repo.set_latency(Some(Duration::from_millis(20)));

    let token = MountToken::new();
    let mut view: ViewState<Vec<fleetdesk::model::InvoiceView>> = ViewState::default();

    let closing = token.clone();
    let applied = drive(&mut view, &token, async move {
        let result = service.invoices().await;
        closing.unmount();
        result
    })
    .await;

    assert!(!applied);
    assert!(view.data.is_none());
    assert!(view.is_loading());
}

/// Test 13: A failed query surfaces its error to the view
#[tokio::test]
async fn test_view_receives_error() {
    let (service, repo) = setup();
    repo.fail("get-invoices", Error::http(500, "API Error: 500 Internal Server Error"));

    let token = MountToken::new();
    let mut view: ViewState<Vec<fleetdesk::model::InvoiceView>> = ViewState::default();
    let applied = drive(&mut view, &token, service.invoices()).await;

    assert!(applied);
    assert!(view.is_error());
    assert!(view.data.is_none());
}

/// Test 14: Contact status transition
#[tokio::test]
async fn test_contact_status_transition() {
    let (service, repo) = setup();
    let open = service
        .filtered_contact_messages(&ContactFilter {
            status: "open".to_string(),
            ..ContactFilter::default()
        })
        .await
        .expect("messages");
    assert_eq!(open.len(), 1);

    service
        .mutations()
        .set_contact_status(9, ContactStatus::Closed)
        .await
        .expect("status changed");

    let messages = service.contact_messages().await.expect("messages");
    assert_eq!(messages[0].status, ContactStatus::Closed);
    assert_eq!(repo.calls("contact-us/9"), 1);
    assert_eq!(repo.calls("all-contact-us"), 2);
}

/// Test 15: Filters compose over cached data
#[tokio::test]
async fn test_filtered_invoices() {
    let (service, repo) = setup();

    let paid = service
        .filtered_invoices(&InvoiceFilter {
            payment_status: "Paid".to_string(),
            ..InvoiceFilter::default()
        })
        .await
        .expect("invoices");
    assert!(paid.is_empty());

    let searched = service
        .filtered_invoices(&InvoiceFilter {
            search: "inv-0000".to_string(),
            ..InvoiceFilter::default()
        })
        .await
        .expect("invoices");
    assert_eq!(searched.len(), 1);
    assert_eq!(repo.calls("get-invoices"), 1);
}
