//! Backend API module.
//!
//! The envelope contract the backend wraps every JSON payload in, plus the
//! HTTP client the screens call.

mod client;

pub use client::*;

use serde::Deserialize;

use crate::errors::{AppError, ErrorDetails};

/// Response envelope for every backend JSON endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorDetails>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload of a successful envelope.
    pub fn into_data(self) -> Result<T, AppError> {
        match self.into_unit_and_data()? {
            Some(data) => Ok(data),
            None => Err(AppError::BadResponse(
                "Response marked success but carried no data".to_string(),
            )),
        }
    }

    /// Check the envelope outcome for endpoints whose payload is irrelevant
    /// (deletes return `data: null`).
    pub fn into_unit(self) -> Result<(), AppError> {
        self.into_unit_and_data().map(|_| ())
    }

    fn into_unit_and_data(self) -> Result<Option<T>, AppError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .map(ErrorDetails::into_app_error)
                .unwrap_or_else(|| {
                    AppError::BadResponse(
                        "Response marked failure without error details".to_string(),
                    )
                }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_unwraps_data() {
        let envelope: ApiEnvelope<i64> =
            serde_json::from_str(r#"{"success":true,"data":42}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), 42);
    }

    #[test]
    fn test_failure_envelope_maps_error() {
        let envelope: ApiEnvelope<i64> = serde_json::from_str(
            r#"{"success":false,"error":{"code":"NOT_FOUND","message":"gone"}}"#,
        )
        .unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(AppError::NotFound(msg)) if msg == "gone"
        ));
    }

    #[test]
    fn test_null_data_is_fine_for_unit_endpoints() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert!(envelope.into_unit().is_ok());
    }
}
