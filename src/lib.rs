//! DonorTrack client core
//!
//! The screen-independent half of the DonorTrack donation tracking app:
//! wire contracts, the backend API client, local session persistence, and the
//! donor list filter engine the list screens run on every update.

pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod session;

pub use api::ApiClient;
pub use config::Config;
pub use errors::AppError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for a host app embedding this crate.
///
/// `RUST_LOG` wins when set; otherwise the configured level is used.
pub fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests;
