//! Integration tests for cache serialization of every query result.
//!
//! Each view-model the service caches must survive the Postcard envelope:
//! written once by a query, then read back unchanged from storage.

use fleetdesk::backend::QueryStore;
use fleetdesk::model::{
    Company, ContactMessage, CrewMember, DashboardOverview, Invitation, Invoice, License,
    NotificationSetting, Session, User, UserRole, Vessel, VesselType,
};
use fleetdesk::serialization::{CACHE_MAGIC, CURRENT_SCHEMA_VERSION};
use fleetdesk::{create_cache, AdminService, InMemoryRepository, QueryKey, RepositoryData};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;

fn seeded_service() -> AdminService<InMemoryRepository> {
    let company = Company {
        id: "c-1".to_string(),
        name: "PT Samudra".to_string(),
        city: "Surabaya".to_string(),
        province: "Jawa Timur".to_string(),
        created_at: "1714867200000".to_string(),
        ..Company::default()
    };
    let vessel = Vessel {
        id: "v-1".to_string(),
        name: "KM Bahari".to_string(),
        imo: "9123456".to_string(),
        gross_tonnage: Some(1520.5),
        year_of_build: Some(2009),
        company_id: Some("c-1".to_string()),
        vessel_type: VesselType {
            id: 3,
            name: "Tanker".to_string(),
        },
        ..Vessel::default()
    };
    let user = User {
        id: "u-1".to_string(),
        name: "Dewi".to_string(),
        username: "dewi".to_string(),
        user_status: true,
        ..User::default()
    };

    let repo = InMemoryRepository::new(RepositoryData {
        invoices: vec![Invoice {
            id: 1,
            invoice_code: "INV-00001".to_string(),
            price: "150000".to_string(),
            payment_status: true,
            paid_at: "1714953600000".to_string(),
            ..Invoice::default()
        }],
        companies: vec![company.clone()],
        vessels: vec![vessel.clone()],
        crews: vec![CrewMember {
            id: "m-1".to_string(),
            vessel_id: "v-1".to_string(),
            start_at: Some("1714867200000".to_string()),
            user: user.clone(),
            user_role: UserRole {
                code: "CAPTAIN".to_string(),
                name: "Captain".to_string(),
                description: String::new(),
            },
            company: company.clone(),
        }],
        licenses: vec![License {
            license_code: "LIC-1".to_string(),
            valid_until: "1893456000000".to_string(),
            company: company.clone(),
            vessel: vessel.clone(),
        }],
        invitations: vec![Invitation {
            id: 4,
            email: "crew@example.com".to_string(),
            company,
            vessel: Some(vessel),
            expired_at: "1893456000000".to_string(),
            ..Invitation::default()
        }],
        roles: vec![UserRole::default()],
        vessel_types: vec![VesselType::default()],
        notification_setting: Some(NotificationSetting {
            id: 2,
            telegram_username: "@dewi".to_string(),
            ..NotificationSetting::default()
        }),
        dashboard: DashboardOverview::default(),
        contact_messages: vec![ContactMessage::default()],
        users: vec![user.clone()],
        sessions: vec![Session {
            id: 5,
            device: "Pixel 8".to_string(),
            user,
            ..Session::default()
        }],
    });
    AdminService::new(create_cache(), Arc::new(repo))
}

fn assert_cached<T>(service: &AdminService<InMemoryRepository>, key: &str, loaded: &T)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    let cached: Option<T> = service
        .cache()
        .get(&QueryKey::parse(key))
        .expect("cached entry decodes");
    assert_eq!(cached.as_ref(), Some(loaded), "{} round trip", key);
}

#[tokio::test]
async fn test_every_query_result_survives_the_envelope() {
    let service = seeded_service();

    let invoices = service.invoices().await.expect("invoices");
    assert_cached(&service, "invoices", &invoices);

    let companies = service.companies().await.expect("companies");
    assert_cached(&service, "companies", &companies);

    let vessels = service.all_vessels().await.expect("vessels");
    assert_eq!(vessels.len(), 1);
    assert_cached(&service, "vessels:all", &vessels);
    assert_cached(&service, "vessels:company:c-1", &vessels);

    let crews = service.all_crews().await.expect("crews");
    assert_eq!(crews[0].vessel, "KM Bahari");
    assert_cached(&service, "crews:all", &crews);

    let licenses = service.licenses().await.expect("licenses");
    assert_cached(&service, "licenses", &licenses);

    let invitations = service.invitations().await.expect("invitations");
    assert_cached(&service, "invitations", &invitations);

    let setting = service.notification_setting().await.expect("setting");
    assert!(!setting.is_new);
    assert_cached(&service, "notification-setting", &setting);

    let overview = service.dashboard_overview().await.expect("overview");
    assert_cached(&service, "dashboard-overview", &overview);

    let messages = service.contact_messages().await.expect("messages");
    assert_cached(&service, "contact-us", &messages);

    let users = service.users().await.expect("users");
    assert_cached(&service, "users", &users);

    let sessions = service.sessions().await.expect("sessions");
    assert_cached(&service, "sessions", &sessions);

    let roles = service.roles().await.expect("roles");
    assert_cached(&service, "roles", &roles);

    let vessel_types = service.vessel_types().await.expect("vessel types");
    assert_cached(&service, "vessel-types", &vessel_types);
}

#[tokio::test]
async fn test_stored_entries_carry_envelope_header() {
    let service = seeded_service();
    service.invoices().await.expect("invoices");
    service.all_crews().await.expect("crews");

    let store = service.cache().store();
    assert!(!store.is_empty());
    for key in store.keys() {
        let entry = store.get(&key).expect("entry present");
        let bytes = entry.data.expect("entry has data");
        let (magic, rest): ([u8; 4], &[u8]) =
            postcard::take_from_bytes(&bytes).expect("magic decodes");
        let (version, _): (u32, &[u8]) = postcard::take_from_bytes(rest).expect("version decodes");
        assert_eq!(magic, CACHE_MAGIC, "{} magic", key);
        assert_eq!(version, CURRENT_SCHEMA_VERSION, "{} version", key);
    }
}
