use secrecy::{ExposeSecret, SecretString};
use std::sync::OnceLock;

/// Environment variable consulted by [`EnvTokenProvider`].
pub const API_KEY_ENV: &str = "GNEWS_API_KEY";

/// Supplies the API token attached to every request.
///
/// A blank token is treated by the client as "no key configured".
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> SecretString;
}

/// Fixed token, mostly for tests and for keys passed on the command line.
pub struct StaticTokenProvider(SecretString);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> SecretString {
        self.0.clone()
    }
}

/// Reads the token from `GNEWS_API_KEY`, falling back to the config file value.
///
/// The env var is read once and cached. Env takes precedence over config.
pub struct EnvTokenProvider {
    var: &'static str,
    fallback: Option<SecretString>,
    cached: OnceLock<Option<SecretString>>,
}

impl EnvTokenProvider {
    pub fn new(fallback: Option<String>) -> Self {
        Self::with_var(API_KEY_ENV, fallback)
    }

    pub fn with_var(var: &'static str, fallback: Option<String>) -> Self {
        Self {
            var,
            fallback: fallback.map(SecretString::from),
            cached: OnceLock::new(),
        }
    }

    fn from_env(&self) -> Option<&SecretString> {
        self.cached
            .get_or_init(|| {
                std::env::var(self.var)
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(SecretString::from)
            })
            .as_ref()
    }
}

impl TokenProvider for EnvTokenProvider {
    fn token(&self) -> SecretString {
        if let Some(token) = self.from_env() {
            tracing::trace!(source = self.var, "Using API token from environment");
            return token.clone();
        }
        match &self.fallback {
            Some(token) if !token.expose_secret().trim().is_empty() => token.clone(),
            _ => SecretString::from(String::new()),
        }
    }
}
