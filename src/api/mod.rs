//! Remote news API access.
//!
//! - `client` - HTTP client for the `top-headlines` and `search` endpoints
//! - `token` - Pluggable API token sources
//! - `types` - Wire types decoded from the JSON envelope

mod client;
mod token;
mod types;

pub use client::{build_http_client, Endpoint, FetchError, NewsApi, NewsClient, DEFAULT_TIMEOUT};
pub use token::{EnvTokenProvider, StaticTokenProvider, TokenProvider, API_KEY_ENV};
pub use types::{Article, ArticleSource, ArticlesEnvelope};
