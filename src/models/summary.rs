//! Aggregate summary model returned by the backend reporting endpoint.

use serde::{Deserialize, Serialize};

/// Organization-wide donation totals for the summary screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    pub total_amount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub donator_count: i64,
    pub donation_count: i64,
}
