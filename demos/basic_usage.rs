//! Basic usage of the dashboard data layer against seeded in-memory data.

use fleetdesk::model::{Company, CompanyView, CreateInvoiceRequest, Invoice, License, Vessel};
use fleetdesk::status::MILLIS_PER_DAY;
use fleetdesk::{
    create_cache, drive, AdminService, Error, InMemoryRepository, InvoiceFilter, MountToken,
    RepositoryData, Result, ViewState,
};
use std::sync::Arc;

fn company(id: &str, name: &str, city: &str) -> Company {
    Company {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        province: "Jawa Timur".to_string(),
        ..Company::default()
    }
}

fn vessel(id: &str, name: &str, company_id: &str) -> Vessel {
    Vessel {
        id: id.to_string(),
        name: name.to_string(),
        company_id: Some(company_id.to_string()),
        ..Vessel::default()
    }
}

fn seed() -> RepositoryData {
    let now = chrono::Utc::now().timestamp_millis();
    RepositoryData {
        invoices: vec![Invoice {
            id: 1,
            invoice_code: "INV-00001".to_string(),
            price: "150000".to_string(),
            payment_method: "BANK".to_string(),
            created_at: "1714867200000".to_string(),
            ..Invoice::default()
        }],
        companies: vec![
            company("c-1", "PT Samudra", "Surabaya"),
            company("c-2", "PT Nusantara", "Gresik"),
        ],
        vessels: vec![
            vessel("v-1", "KM Bahari", "c-1"),
            vessel("v-2", "KM Lestari", "c-2"),
        ],
        licenses: vec![License {
            license_code: "LIC-0001".to_string(),
            valid_until: (now + 12 * MILLIS_PER_DAY).to_string(),
            company: company("c-1", "PT Samudra", "Surabaya"),
            vessel: vessel("v-1", "KM Bahari", "c-1"),
        }],
        ..RepositoryData::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== fleetdesk - Basic Example ===\n");

    // 1. Wire the service
    println!("1. Creating the service over an in-memory backend...");
    let repo = InMemoryRepository::new(seed());
    let service = AdminService::new(create_cache(), Arc::new(repo.clone()));
    println!("   ✓ Service ready\n");

    // 2. First read loads, second read is served from cache
    println!("2. Reading invoices twice:");
    let invoices = service.invoices().await?;
    service.invoices().await?;
    for invoice in &invoices {
        println!(
            "   ✓ {} {} {} (created {})",
            invoice.invoice_code,
            invoice.formatted_price,
            invoice.payment_status,
            invoice.formatted_created_at
        );
    }
    println!("   ✓ Requests made: {}\n", repo.calls("get-invoices"));

    // 3. Dependent query: one vessel request per company
    println!("3. Reading every vessel:");
    for vessel in service.all_vessels().await? {
        println!("   ✓ {} ({})", vessel.name, vessel.company);
    }
    println!(
        "   ✓ Per-company requests: {}\n",
        repo.calls("get-vessels-by-company")
    );

    // 4. Derived license status
    println!("4. License status:");
    for license in service.licenses().await? {
        println!(
            "   ✓ {} {} ({} days left)",
            license.license_code, license.status, license.days_remaining
        );
    }
    println!();

    // 5. A write invalidates what it affects
    println!("5. Creating an invoice:");
    let created = service
        .mutations()
        .create_invoice(&CreateInvoiceRequest {
            price: "275000".to_string(),
            payment_method: "CASH".to_string(),
        })
        .await?;
    println!("   ✓ Created {}", created.data.invoice_code);
    let unpaid = service
        .filtered_invoices(&InvoiceFilter {
            payment_status: "Unpaid".to_string(),
            ..InvoiceFilter::default()
        })
        .await?;
    println!(
        "   ✓ Unpaid invoices after reload: {} (requests: {})\n",
        unpaid.len(),
        repo.calls("get-invoices")
    );

    // 6. Validation happens before the network
    println!("6. Rejecting an invalid price:");
    let rejected = service
        .mutations()
        .create_invoice(&CreateInvoiceRequest {
            price: "0".to_string(),
            payment_method: "CASH".to_string(),
        })
        .await;
    if let Err(Error::ValidationError(message)) = rejected {
        println!("   ✓ {}\n", message);
    }

    // 7. Feeding a view
    println!("7. Feeding a view state:");
    let token = MountToken::new();
    let mut companies: ViewState<Vec<CompanyView>> = ViewState::default();
    drive(&mut companies, &token, service.companies()).await;
    if let Some(companies) = &companies.data {
        for company in companies {
            println!("   ✓ {} - {}", company.name, company.location);
        }
    }

    println!("\n=== Example complete ===\n");
    Ok(())
}
