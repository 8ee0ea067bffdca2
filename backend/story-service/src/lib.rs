/// Story Service Library
///
/// Handles the ephemeral-story lifecycle for the Kahani social platform:
/// creation and listing of 24-hour stories, media upload, sequential
/// playback state, token-gated paid downloads, and DigiLocker identity
/// verification.
///
/// # Modules
///
/// - `handlers`: Story-related HTTP request handlers
/// - `models`: Data structures for stories, items, and users
/// - `services`: Business logic layer (lifecycle, sequencer, access gate)
/// - `store`: In-memory data layer
/// - `jobs`: Background expiry cleanup
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
