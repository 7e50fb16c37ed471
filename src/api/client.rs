//! HTTP client for the DonorTrack backend.
//!
//! One method per screen operation. Request bodies are validated locally
//! before anything goes on the wire, and every response passes through the
//! shared envelope handling so errors surface as `AppError` uniformly.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ApiEnvelope;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    CreateDonationRequest, CreateDonatorRequest, Donation, DonationSummary, Donator, LoginRequest,
    LoginSession, UpdateDonationRequest, UpdateDonatorRequest,
};

/// Client for the DonorTrack backend API.
///
/// Holds the bearer token for the current session; `login` populates it,
/// `logout` drops it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build an unauthenticated client from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Build a client resuming a previously persisted session.
    pub fn with_session(config: &Config, session: &LoginSession) -> Result<Self, AppError> {
        let mut client = Self::new(config)?;
        client.token = Some(session.token.clone());
        Ok(client)
    }

    /// The bearer token of the current session, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// POST /auth/login - Authenticate and remember the session token.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<LoginSession, AppError> {
        request.validate()?;

        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        let session: LoginSession = handle(response).await?;

        self.token = Some(session.token.clone());
        tracing::info!("Logged in as {}", session.user.email);
        Ok(session)
    }

    /// Forget the session token. The backend keeps no server-side session.
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// GET /donators - Full donator list with nested donations.
    pub async fn list_donators(&self) -> Result<Vec<Donator>, AppError> {
        self.get_json("/donators").await
    }

    /// GET /donators/:id - A single donator.
    pub async fn get_donator(&self, id: i64) -> Result<Donator, AppError> {
        self.get_json(&format!("/donators/{}", id)).await
    }

    /// POST /donators - Add a donator together with their initial donation.
    pub async fn create_donator(&self, request: &CreateDonatorRequest) -> Result<Donator, AppError> {
        request.validate()?;
        self.post_json("/donators", request).await
    }

    /// PUT /donators/:id - Edit a donator's contact details.
    pub async fn update_donator(
        &self,
        id: i64,
        request: &UpdateDonatorRequest,
    ) -> Result<Donator, AppError> {
        request.validate()?;
        self.put_json(&format!("/donators/{}", id), request).await
    }

    /// DELETE /donators/:id - Remove a donator and their donations.
    pub async fn delete_donator(&self, id: i64) -> Result<(), AppError> {
        let response = self
            .authorize(self.http.delete(self.url(&format!("/donators/{}", id))))
            .send()
            .await?;
        handle_unit(response).await
    }

    /// POST /donators/:id/donations - Record a new donation.
    pub async fn add_donation(
        &self,
        donator_id: i64,
        request: &CreateDonationRequest,
    ) -> Result<Donation, AppError> {
        request.validate()?;
        self.post_json(&format!("/donators/{}/donations", donator_id), request)
            .await
    }

    /// PUT /donations/:id - Edit a donation (amount, payment, book number).
    pub async fn update_donation(
        &self,
        id: i64,
        request: &UpdateDonationRequest,
    ) -> Result<Donation, AppError> {
        request.validate()?;
        self.put_json(&format!("/donations/{}", id), request).await
    }

    /// GET /summary - Organization-wide totals.
    pub async fn summary(&self) -> Result<DonationSummary, AppError> {
        self.get_json("/summary").await
    }

    /// GET /reports/donations - Download the donations report as PDF bytes.
    pub async fn download_report(&self) -> Result<Vec<u8>, AppError> {
        let response = self
            .authorize(self.http.get(self.url("/reports/donations")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(error_from_body(status, body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token),
            ),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        handle(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        handle(response).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .authorize(self.http.put(self.url(path)).json(body))
            .send()
            .await?;
        handle(response).await
    }
}

/// Parse an envelope response, falling back to status mapping when the body
/// is not envelope-shaped (proxies, HTML error pages).
async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<ApiEnvelope<T>>(&body) {
        Ok(envelope) => envelope.into_data(),
        Err(_) if !status.is_success() => Err(error_from_body(status, body)),
        Err(e) => Err(AppError::BadResponse(format!("Malformed response: {}", e))),
    }
}

/// Like `handle` but for endpoints whose success payload is `null`.
async fn handle_unit(response: reqwest::Response) -> Result<(), AppError> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body) {
        Ok(envelope) => envelope.into_unit(),
        Err(_) if !status.is_success() => Err(error_from_body(status, body)),
        Err(e) => Err(AppError::BadResponse(format!("Malformed response: {}", e))),
    }
}

fn error_from_body(status: StatusCode, body: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized("Session rejected".to_string()),
        StatusCode::NOT_FOUND => AppError::NotFound("Resource not found".to_string()),
        StatusCode::BAD_REQUEST => AppError::Validation(body),
        _ => AppError::Http(format!("Unexpected status {}: {}", status, body)),
    }
}
