//! Donor list aggregation & filter engine.
//!
//! Pure, synchronous transformations over the already-fetched donator list.
//! The list screens re-run the engine on every source or filter change (every
//! search keystroke included), so nothing in here performs I/O, takes locks,
//! or caches state between calls.

mod donations;
mod filter;

pub use donations::*;
pub use filter::*;

use serde::Serialize;

use crate::models::{Donation, Donator, PaymentStatus};

/// Balance above which a donator is high priority; also the floor of the HIGH
/// balance bucket. Shared so the two classifications cannot drift apart.
pub const HIGH_BALANCE_FLOOR: f64 = 10_000.0;
/// Ceiling of the low-priority band and of the LOW balance bucket.
pub const LOW_BALANCE_CEILING: f64 = 1_000.0;
/// Inclusive bounds of the MEDIUM amount bucket; SMALL and LARGE sit outside.
pub const MEDIUM_AMOUNT_MIN: f64 = 5_000.0;
pub const MEDIUM_AMOUNT_MAX: f64 = 25_000.0;

/// Per-donator totals, recomputed on every engine pass from
/// `amount`/`paidAmount`. The server-supplied per-donation `balance` is never
/// summed here, so filters always agree with the displayed totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonatorMetrics {
    pub total_amount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub status: PaymentStatus,
}

impl DonatorMetrics {
    pub fn compute(donator: &Donator) -> Self {
        let total_amount: f64 = donator.donations.iter().map(|d| d.amount).sum();
        let total_paid: f64 = donator.donations.iter().map(|d| d.paid_amount).sum();

        Self {
            total_amount,
            total_paid,
            total_balance: total_amount - total_paid,
            status: derive_status(total_amount, total_paid),
        }
    }

    /// Fraction paid in `[0, 1]` for the progress bar. A donator with nothing
    /// pledged shows 0% even though they classify as PAID.
    pub fn progress(&self) -> f64 {
        if self.total_amount <= 0.0 {
            0.0
        } else {
            (self.total_paid / self.total_amount).clamp(0.0, 1.0)
        }
    }
}

/// Settlement status from recomputed totals.
///
/// The `>=` comparison makes overpayment and the zero-donations case
/// (`0 >= 0`) both classify as PAID.
pub fn derive_status(total_amount: f64, total_paid: f64) -> PaymentStatus {
    if total_paid >= total_amount {
        PaymentStatus::Paid
    } else if total_paid > 0.0 {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}

/// Settlement status of a single donation, from its own amounts.
///
/// Shared by the donations screen so per-donation and per-donator
/// classification use the same rule.
pub fn donation_status(donation: &Donation) -> PaymentStatus {
    derive_status(donation.amount, donation.paid_amount)
}

/// Client-side aggregate over a donator list for the summary screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTotals {
    pub total_amount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub paid_donators: usize,
    pub partial_donators: usize,
    pub pending_donators: usize,
    pub donation_count: usize,
}

/// Aggregate the whole list in one pass.
pub fn totals(donators: &[Donator]) -> ListTotals {
    let mut out = ListTotals::default();
    for donator in donators {
        let metrics = DonatorMetrics::compute(donator);
        out.total_amount += metrics.total_amount;
        out.total_paid += metrics.total_paid;
        out.total_balance += metrics.total_balance;
        out.donation_count += donator.donations.len();
        match metrics.status {
            PaymentStatus::Paid => out.paid_donators += 1,
            PaymentStatus::Partial => out.partial_donators += 1,
            PaymentStatus::Pending => out.pending_donators += 1,
        }
    }
    out
}

/// Most recently added donators for the dashboard.
pub fn recent_donators(donators: &[Donator], limit: usize) -> Vec<&Donator> {
    let mut recent: Vec<&Donator> = donators.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent
}
