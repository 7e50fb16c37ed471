//! Filter state and the deterministic filter/sort pipeline for the donators
//! list screen.
//!
//! One pass: derive metrics, apply the AND-combined predicates, order with a
//! stable total-order comparator, and report the active-filter count for the
//! badge. Calling it twice with identical inputs yields identical outputs.

use serde::{Deserialize, Serialize};

use super::{
    DonatorMetrics, HIGH_BALANCE_FLOOR, LOW_BALANCE_CEILING, MEDIUM_AMOUNT_MAX, MEDIUM_AMOUNT_MIN,
};
use crate::models::{Donator, PaymentStatus};

/// Status filter selection. `All` is the neutral value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Partial,
    Pending,
}

impl StatusFilter {
    pub(crate) fn accepts(&self, status: PaymentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => status == PaymentStatus::Paid,
            StatusFilter::Partial => status == PaymentStatus::Partial,
            StatusFilter::Pending => status == PaymentStatus::Pending,
        }
    }
}

/// Total-amount bucket selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountRange {
    #[default]
    All,
    /// Below 5000
    Small,
    /// 5000 to 25000, both inclusive
    Medium,
    /// Above 25000
    Large,
    /// User-supplied `[min, max]` bounds from the custom range form
    Custom,
}

/// Outstanding-balance bucket selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceRange {
    #[default]
    All,
    /// Exactly settled
    Zero,
    /// (0, 1000]
    Low,
    /// (1000, 10000]
    Medium,
    /// Above 10000
    High,
}

/// Donation-count bucket selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationCountFilter {
    #[default]
    All,
    Single,
    Multiple,
}

/// Follow-up priority selection. A fully settled donator (balance exactly 0)
/// matches neither band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityFilter {
    #[default]
    All,
    High,
    Low,
}

/// Sort key for the donators list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    NameAsc,
    NameDesc,
    AmountAsc,
    AmountDesc,
    BalanceAsc,
    BalanceDesc,
    /// Descending by number of donations; ties keep their input order
    DonationsCount,
}

/// The complete set of active filter selections on the donators screen.
///
/// Created with all-neutral defaults, mutated in place by the UI, reset
/// wholesale by "clear all". Never persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    pub amount_range: AmountRange,
    /// Raw text of the custom range bounds; unparsable input means unbounded
    pub custom_min: String,
    pub custom_max: String,
    pub balance_range: BalanceRange,
    /// Staff name selection; `None` means no constraint
    pub added_by: Option<String>,
    pub donation_count: DonationCountFilter,
    pub priority: PriorityFilter,
    pub sort_by: SortBy,
}

impl FilterState {
    /// Reset every selection to its neutral default ("clear all").
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of non-neutral filter dimensions, plus one when the trimmed
    /// search text is non-empty. The sort key is presentation state and is
    /// not counted.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.status != StatusFilter::All {
            count += 1;
        }
        if self.amount_range != AmountRange::All {
            count += 1;
        }
        if self.balance_range != BalanceRange::All {
            count += 1;
        }
        if self.added_by.is_some() {
            count += 1;
        }
        if self.donation_count != DonationCountFilter::All {
            count += 1;
        }
        if self.priority != PriorityFilter::All {
            count += 1;
        }
        if !self.search.trim().is_empty() {
            count += 1;
        }
        count
    }
}

/// Result of one engine pass: the rows to render, in order, each paired with
/// its derived metrics, plus the badge count.
#[derive(Debug)]
pub struct FilterOutcome<'a> {
    pub rows: Vec<(&'a Donator, DonatorMetrics)>,
    pub active_filters: usize,
}

impl FilterOutcome<'_> {
    /// Resulting list size for the "N donators" caption.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run the full pipeline over an already-fetched donator list.
pub fn run<'a>(donators: &'a [Donator], state: &FilterState) -> FilterOutcome<'a> {
    let needle = state.search.trim().to_lowercase();

    let mut rows: Vec<(&Donator, DonatorMetrics)> = donators
        .iter()
        .map(|d| (d, DonatorMetrics::compute(d)))
        .filter(|(d, m)| matches(d, m, state, &needle))
        .collect();

    sort_rows(&mut rows, state.sort_by);

    FilterOutcome {
        rows,
        active_filters: state.active_count(),
    }
}

fn matches(donator: &Donator, metrics: &DonatorMetrics, state: &FilterState, needle: &str) -> bool {
    if !needle.is_empty() && !text_matches(donator, needle) {
        return false;
    }
    if !state.status.accepts(metrics.status) {
        return false;
    }
    if !amount_in_range(state, metrics.total_amount) {
        return false;
    }
    if !balance_in_range(state.balance_range, metrics.total_balance) {
        return false;
    }
    if let Some(staff) = &state.added_by {
        let recorded_by_staff = donator
            .donations
            .iter()
            .any(|d| d.user.as_ref().is_some_and(|u| &u.name == staff));
        if !recorded_by_staff {
            return false;
        }
    }
    let count_ok = match state.donation_count {
        DonationCountFilter::All => true,
        DonationCountFilter::Single => donator.donations.len() == 1,
        DonationCountFilter::Multiple => donator.donations.len() > 1,
    };
    if !count_ok {
        return false;
    }
    match state.priority {
        PriorityFilter::All => true,
        PriorityFilter::High => metrics.total_balance > HIGH_BALANCE_FLOOR,
        PriorityFilter::Low => {
            metrics.total_balance > 0.0 && metrics.total_balance <= LOW_BALANCE_CEILING
        }
    }
}

/// Case-insensitive substring match on name, phone, or address. Missing
/// fields never match.
fn text_matches(donator: &Donator, needle: &str) -> bool {
    let field_matches = |field: &Option<String>| {
        field
            .as_ref()
            .is_some_and(|v| v.to_lowercase().contains(needle))
    };
    donator.name.to_lowercase().contains(needle)
        || field_matches(&donator.phone)
        || field_matches(&donator.address)
}

fn amount_in_range(state: &FilterState, total_amount: f64) -> bool {
    match state.amount_range {
        AmountRange::All => true,
        AmountRange::Small => total_amount < MEDIUM_AMOUNT_MIN,
        AmountRange::Medium => {
            total_amount >= MEDIUM_AMOUNT_MIN && total_amount <= MEDIUM_AMOUNT_MAX
        }
        AmountRange::Large => total_amount > MEDIUM_AMOUNT_MAX,
        AmountRange::Custom => {
            let min = parse_bound(&state.custom_min).unwrap_or(0.0);
            let max = parse_bound(&state.custom_max).unwrap_or(f64::INFINITY);
            total_amount >= min && total_amount <= max
        }
    }
}

fn balance_in_range(range: BalanceRange, total_balance: f64) -> bool {
    match range {
        BalanceRange::All => true,
        BalanceRange::Zero => total_balance == 0.0,
        BalanceRange::Low => total_balance > 0.0 && total_balance <= LOW_BALANCE_CEILING,
        BalanceRange::Medium => {
            total_balance > LOW_BALANCE_CEILING && total_balance <= HIGH_BALANCE_FLOOR
        }
        BalanceRange::High => total_balance > HIGH_BALANCE_FLOOR,
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Stable sort with a total order per key. `total_cmp` keeps the numeric
/// comparators total even over pathological float inputs.
fn sort_rows(rows: &mut [(&Donator, DonatorMetrics)], sort_by: SortBy) {
    match sort_by {
        SortBy::NameAsc => {
            rows.sort_by(|a, b| a.0.name.to_lowercase().cmp(&b.0.name.to_lowercase()))
        }
        SortBy::NameDesc => {
            rows.sort_by(|a, b| b.0.name.to_lowercase().cmp(&a.0.name.to_lowercase()))
        }
        SortBy::AmountAsc => rows.sort_by(|a, b| a.1.total_amount.total_cmp(&b.1.total_amount)),
        SortBy::AmountDesc => rows.sort_by(|a, b| b.1.total_amount.total_cmp(&a.1.total_amount)),
        SortBy::BalanceAsc => rows.sort_by(|a, b| a.1.total_balance.total_cmp(&b.1.total_balance)),
        SortBy::BalanceDesc => rows.sort_by(|a, b| b.1.total_balance.total_cmp(&a.1.total_balance)),
        SortBy::DonationsCount => {
            rows.sort_by(|a, b| b.0.donations.len().cmp(&a.0.donations.len()))
        }
    }
}
