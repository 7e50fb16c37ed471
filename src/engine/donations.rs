//! Flat donations-list filtering for the donations screen.
//!
//! Reuses the donator engine's status derivation so the two screens can never
//! disagree on what counts as paid.

use serde::{Deserialize, Serialize};

use super::{donation_status, StatusFilter};
use crate::models::{Donation, PaymentMethod};

/// Payment-method filter selection. `All` is the neutral value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodFilter {
    #[default]
    All,
    Cash,
    Online,
    NotDone,
}

impl MethodFilter {
    fn accepts(&self, method: PaymentMethod) -> bool {
        match self {
            MethodFilter::All => true,
            MethodFilter::Cash => method == PaymentMethod::Cash,
            MethodFilter::Online => method == PaymentMethod::Online,
            MethodFilter::NotDone => method == PaymentMethod::NotDone,
        }
    }
}

/// Sort key for the donations list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationSortBy {
    #[default]
    AmountDesc,
    AmountAsc,
}

/// Active filter selections on the donations screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationFilterState {
    pub search: String,
    pub status: StatusFilter,
    pub method: MethodFilter,
    /// Exact receipt-book match; `None` means no constraint
    pub book_number: Option<String>,
    pub sort_by: DonationSortBy,
}

impl DonationFilterState {
    /// Reset every selection to its neutral default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Badge count, same rules as the donators screen.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.status != StatusFilter::All {
            count += 1;
        }
        if self.method != MethodFilter::All {
            count += 1;
        }
        if self.book_number.is_some() {
            count += 1;
        }
        if !self.search.trim().is_empty() {
            count += 1;
        }
        count
    }
}

/// Result of one pass over the flat donation list.
#[derive(Debug)]
pub struct DonationFilterOutcome<'a> {
    pub donations: Vec<&'a Donation>,
    pub active_filters: usize,
}

/// Filter and sort an already-fetched donation list.
pub fn run_donations<'a>(
    donations: &'a [Donation],
    state: &DonationFilterState,
) -> DonationFilterOutcome<'a> {
    let needle = state.search.trim().to_lowercase();

    let mut rows: Vec<&Donation> = donations
        .iter()
        .filter(|d| matches(d, state, &needle))
        .collect();

    match state.sort_by {
        DonationSortBy::AmountDesc => rows.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        DonationSortBy::AmountAsc => rows.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
    }

    DonationFilterOutcome {
        donations: rows,
        active_filters: state.active_count(),
    }
}

fn matches(donation: &Donation, state: &DonationFilterState, needle: &str) -> bool {
    if !needle.is_empty() {
        let book_hit = donation
            .book_number
            .as_ref()
            .is_some_and(|b| b.to_lowercase().contains(needle));
        let staff_hit = donation
            .user
            .as_ref()
            .is_some_and(|u| u.name.to_lowercase().contains(needle));
        if !book_hit && !staff_hit {
            return false;
        }
    }
    // Status recomputed from the amounts, never read from the wire field.
    if !state.status.accepts(donation_status(donation)) {
        return false;
    }
    if !state.method.accepts(donation.payment_method) {
        return false;
    }
    if let Some(book) = &state.book_number {
        if donation.book_number.as_deref() != Some(book.as_str()) {
            return false;
        }
    }
    true
}
