//! AI content provider: prompt construction, the Gemini HTTP client, JSON
//! scraping, and background fetches for the UI.

use thiserror::Error;

pub mod client;
pub mod extract;
pub mod fetch;
pub mod prompts;
pub mod service;

pub use client::{ContentProvider, GeminiClient, provider_from_env};
pub use fetch::{Fetch, Load};

/// What can go wrong talking to the content provider. Nothing here is
/// fatal: every variant surfaces in the UI as a "try again" state.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured (set {var})")]
    MissingApiKey { var: &'static str },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("response contained no text")]
    Empty,

    #[error("response contained no usable JSON")]
    Unparseable,
}
