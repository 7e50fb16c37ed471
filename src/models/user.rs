//! Staff user and login models matching the backend auth contract.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A staff member of the organization running the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Role string as assigned by the backend (e.g. "admin", "collector")
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for the login form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Validate the login form.
    pub fn validate(&self) -> Result<(), AppError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

/// Authenticated session returned by the backend and persisted locally
/// between app launches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub token: String,
    pub user: StaffUser,
}
