//! Donator model matching the backend donator records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{CreateDonationRequest, Donation};

/// Maximum accepted length for names and contact strings.
const MAX_FIELD_LEN: usize = 255;

/// A person or entity who has made one or more donations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donator {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Owned for display purposes; the backend remains the source of truth.
    /// Missing or null arrays deserialize as empty.
    #[serde(default, deserialize_with = "donations_or_empty")]
    pub donations: Vec<Donation>,
    /// Used only for recency sorting on the dashboard
    pub created_at: DateTime<Utc>,
}

/// Request body for adding a donator together with their initial donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonatorRequest {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub donation: CreateDonationRequest,
}

impl CreateDonatorRequest {
    /// Validate the add-donator form.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        self.donation.validate()
    }
}

/// Request body for editing a donator's contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonatorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateDonatorRequest {
    /// Validate the edit-donator form. Only supplied fields are checked.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

fn donations_or_empty<'de, D>(deserializer: D) -> Result<Vec<Donation>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let donations = Option::<Vec<Donation>>::deserialize(deserializer)?;
    Ok(donations.unwrap_or_default())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if name.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "Name must be at most {} characters",
            MAX_FIELD_LEN
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') || trimmed.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation("Email address is invalid".to_string()));
    }
    Ok(())
}
