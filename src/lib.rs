//! # fleetdesk
//!
//! Client-side data layer for a maritime fleet administration dashboard.
//!
//! ## Features
//!
//! - **Query cache:** per-key staleness windows, in-flight deduplication,
//!   prefix invalidation and dependent (fan-out) queries
//! - **Remote resource client:** one typed method per backend endpoint, over
//!   reqwest or an in-memory stand-in for tests
//! - **View-models:** pure transformers from raw API records to
//!   display-ready records (`Rp 150.000`, `05 Mei 2024`, license status)
//! - **Filters:** closed per-entity filter types compiled into predicates
//! - **Mutations:** validate, write, then invalidate what the write affects
//!
//! ## Quick Start
//!
//! ```no_run
//! use fleetdesk::{AdminConfig, AdminService, InvoiceFilter};
//!
//! # async fn run() -> fleetdesk::Result<()> {
//! // FLEETDESK_API_ORIGIN, FLEETDESK_API_KEY, FLEETDESK_AUTH_TOKEN
//! let config = AdminConfig::load()?;
//! let service = AdminService::from_config(&config)?;
//!
//! let unpaid = service
//!     .filtered_invoices(&InvoiceFilter {
//!         payment_status: "Unpaid".to_string(),
//!         ..InvoiceFilter::default()
//!     })
//!     .await?;
//! for invoice in &unpaid {
//!     println!("{} {}", invoice.invoice_code, invoice.formatted_price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Lower-level API
//!
//! [`QueryCache`] works with any loader closure:
//!
//! ```
//! use fleetdesk::{create_cache, QueryKey};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fleetdesk::Result<()> {
//! let cache = create_cache();
//! let key = QueryKey::new("vessel-types");
//! let types: Vec<String> = cache
//!     .fetch(&key, || async { Ok(vec!["Tanker".to_string()]) })
//!     .await?;
//! assert_eq!(types.len(), 1);
//!
//! cache.invalidate(&QueryKey::new("vessel-types"));
//! assert!(cache.state::<Vec<String>>(&key).is_stale);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod api;
pub mod backend;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod filter;
pub mod format;
pub mod key;
pub mod model;
pub mod mutation;
pub mod observability;
pub mod repository;
pub mod serialization;
pub mod service;
pub mod status;
pub mod strategy;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use api::{ApiResponse, AuthProvider, RestClient, StaticAuth};
pub use backend::{FetchStatus, InMemoryStore, QueryStore};
pub use cache::{create_cache, fan_out, FanOut, QueryCache, QueryState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AdminConfig;
pub use error::{Error, Result};
pub use export::{export_invoice, render_invoice_html, PdfExporter, Recipient};
pub use feed::{drive, MountToken, QueryFeed, ViewState};
pub use filter::{
    ContactFilter, CrewFilter, Filter, InvoiceFilter, LicenseFilter, Predicate, SessionFilter,
    UserFilter,
};
pub use format::Locale;
pub use key::QueryKey;
pub use mutation::{MutationCoordinator, MutationKind};
pub use observability::{LogMetrics, NoOpMetrics, QueryMetrics, StalePolicy};
pub use repository::{AdminRepository, InMemoryRepository, RepositoryData};
pub use service::AdminService;
pub use strategy::{FetchStrategy, QueryOptions, Retry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
