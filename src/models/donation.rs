//! Donation model matching the backend donation records.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// How a donation was (or will be) collected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Online,
    #[serde(rename = "Not Done")]
    NotDone,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Online => "Online",
            PaymentMethod::NotDone => "Not Done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Cash" => Some(PaymentMethod::Cash),
            "Online" => Some(PaymentMethod::Online),
            "Not Done" => Some(PaymentMethod::NotDone),
            _ => None,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::NotDone
    }
}

/// Settlement state of a donation or a donator's ledger.
///
/// The backend sends this on donation records, but it can be stale relative
/// to `paidAmount`; the engine always re-derives it before filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "PARTIAL")]
    Partial,
    #[serde(rename = "PENDING")]
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Pending => "PENDING",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PAID" => Some(PaymentStatus::Paid),
            "PARTIAL" => Some(PaymentStatus::Partial),
            "PENDING" => Some(PaymentStatus::Pending),
            _ => None,
        }
    }
}

/// Staff member who recorded a donation. Only the name travels on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonationUser {
    pub name: String,
}

/// A single pledged/paid amount tied to one donator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    /// Pledged amount, non-negative
    pub amount: f64,
    /// Amount actually paid so far; may exceed `amount` in malformed data
    #[serde(default)]
    pub paid_amount: f64,
    /// Server-computed remainder, kept for display parity only
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Physical receipt-book identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_number: Option<String>,
    /// Server-side classification; possibly stale, never trusted for filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<DonationUser>,
}

/// Request body for recording a new donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub book_number: Option<String>,
}

impl CreateDonationRequest {
    /// Validate the donation entry form.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(AppError::Validation(
                "Donation amount must be a non-negative number".to_string(),
            ));
        }
        if !self.paid_amount.is_finite() || self.paid_amount < 0.0 {
            return Err(AppError::Validation(
                "Paid amount must be a non-negative number".to_string(),
            ));
        }
        if self.paid_amount > self.amount {
            return Err(AppError::Validation(
                "Paid amount cannot exceed the donation amount".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request body for editing an existing donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonationRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub book_number: Option<String>,
}

impl UpdateDonationRequest {
    /// Validate the donation edit form. Only supplied fields are checked.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(AppError::Validation(
                    "Donation amount must be a non-negative number".to_string(),
                ));
            }
        }
        if let Some(paid) = self.paid_amount {
            if !paid.is_finite() || paid < 0.0 {
                return Err(AppError::Validation(
                    "Paid amount must be a non-negative number".to_string(),
                ));
            }
        }
        if let (Some(amount), Some(paid)) = (self.amount, self.paid_amount) {
            if paid > amount {
                return Err(AppError::Validation(
                    "Paid amount cannot exceed the donation amount".to_string(),
                ));
            }
        }
        Ok(())
    }
}
