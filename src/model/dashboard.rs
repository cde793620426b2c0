use serde::{Deserialize, Serialize};

/// Summary counters for the dashboard landing page. The backend may omit
/// any of them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOverview {
    pub total_companies: Option<u64>,
    pub total_vessels: Option<u64>,
    pub total_crews: Option<u64>,
    pub total_users: Option<u64>,
    pub total_invoices: Option<u64>,
    pub unpaid_invoices: Option<u64>,
    pub total_revenue: Option<f64>,
    pub active_licenses: Option<u64>,
    pub expiring_licenses: Option<u64>,
    pub open_messages: Option<u64>,
}
