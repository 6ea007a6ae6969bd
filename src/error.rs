//! Error taxonomy shared by the repository and the headlines controller.
//!
//! Failures flow through three layers:
//!
//! - [`FetchError`]: raw transport, HTTP and decoding failures from the client
//! - [`DomainError`]: the small taxonomy the rest of the crate reasons about
//! - [`PresentationError`]: the coarse category shown to the user
//!
//! Both narrowing steps are pure and total.
use crate::api::FetchError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DomainError {
    #[error("Authentication required")]
    AuthRequired,
    #[error("Rate limited")]
    RateLimited,
    #[error("Network unavailable")]
    NetworkUnavailable,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Decoding failed")]
    DecodingFailed,
    #[error("Unknown error")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PresentationError {
    #[error("Missing API key")]
    MissingAuth,
    #[error("Rate limited")]
    RateLimited,
    #[error("Network unavailable")]
    NetworkUnavailable,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Unable to load")]
    Unknown,
}

impl DomainError {
    pub const ALL: [DomainError; 6] = [
        DomainError::AuthRequired,
        DomainError::RateLimited,
        DomainError::NetworkUnavailable,
        DomainError::InvalidResponse,
        DomainError::DecodingFailed,
        DomainError::Unknown,
    ];
}

impl PresentationError {
    /// User-facing message for the error screen.
    pub fn message(&self) -> &'static str {
        match self {
            PresentationError::NetworkUnavailable => {
                "You appear to be offline. Check your connection and try again."
            }
            PresentationError::MissingAuth => {
                "No valid API key is configured. Set GNEWS_API_KEY and try again."
            }
            PresentationError::RateLimited => {
                "Too many requests. Please wait a moment and try again."
            }
            PresentationError::InvalidResponse => {
                "The news service sent an unexpected response."
            }
            PresentationError::Unknown => "Unable to load news.",
        }
    }
}

/// Classify a raw fetch failure into the domain taxonomy.
pub fn classify(error: &FetchError) -> DomainError {
    match error {
        FetchError::MissingApiKey | FetchError::AuthRequired(_) => DomainError::AuthRequired,
        FetchError::RateLimited => DomainError::RateLimited,
        FetchError::InvalidResponse(_) | FetchError::ResponseTooLarge(_) => {
            DomainError::InvalidResponse
        }
        FetchError::Decoding(_) => DomainError::DecodingFailed,
        FetchError::Network(e) => classify_transport(e),
        FetchError::Timeout(_) | FetchError::InvalidUrl | FetchError::InsecureBaseUrl => {
            DomainError::Unknown
        }
    }
}

fn classify_transport(error: &reqwest::Error) -> DomainError {
    if error.is_connect() || error.is_request() || error.is_body() {
        DomainError::NetworkUnavailable
    } else if error.is_decode() {
        DomainError::DecodingFailed
    } else {
        DomainError::Unknown
    }
}

/// Narrow a domain error to the category shown to the user.
pub fn present(error: DomainError) -> PresentationError {
    match error {
        DomainError::AuthRequired => PresentationError::MissingAuth,
        DomainError::RateLimited => PresentationError::RateLimited,
        DomainError::NetworkUnavailable => PresentationError::NetworkUnavailable,
        DomainError::InvalidResponse | DomainError::DecodingFailed => {
            PresentationError::InvalidResponse
        }
        DomainError::Unknown => PresentationError::Unknown,
    }
}

impl From<&FetchError> for DomainError {
    fn from(error: &FetchError) -> Self {
        classify(error)
    }
}

impl From<FetchError> for DomainError {
    fn from(error: FetchError) -> Self {
        classify(&error)
    }
}

impl From<DomainError> for PresentationError {
    fn from(error: DomainError) -> Self {
        present(error)
    }
}
