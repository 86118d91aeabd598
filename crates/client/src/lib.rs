//! HTTP client for the SochSamajh router backend.
//!
//! All calls share one base URL and one per-request timeout. Health probes
//! never fail; route and feedback calls surface a [`ClientError`] that callers
//! are expected to turn into their own user-facing wording.

mod client;
mod error;
mod http_utils;

pub use client::{ApiClient, RouterApi};
pub use error::ClientError;
