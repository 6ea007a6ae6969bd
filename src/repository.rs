use crate::api::{Article, NewsApi};
use crate::error::{classify, DomainError};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of articles for the headlines controller.
///
/// Implementations only ever fail with [`DomainError`]; transport details
/// stay below this seam.
#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn top_headlines(
        &self,
        language: &str,
        max: u32,
        country: Option<&str>,
    ) -> Result<Vec<Article>, DomainError>;

    async fn search(
        &self,
        query: &str,
        language: &str,
        max: u32,
    ) -> Result<Vec<Article>, DomainError>;
}

/// Repository backed by a remote [`NewsApi`].
pub struct RemoteNewsRepository {
    api: Arc<dyn NewsApi>,
}

impl RemoteNewsRepository {
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl NewsRepository for RemoteNewsRepository {
    async fn top_headlines(
        &self,
        language: &str,
        max: u32,
        country: Option<&str>,
    ) -> Result<Vec<Article>, DomainError> {
        self.api
            .top_headlines(language, max, country)
            .await
            .map_err(|e| {
                let domain = classify(&e);
                tracing::warn!(error = %e, classified = ?domain, "Top headlines fetch failed");
                domain
            })
    }

    async fn search(
        &self,
        query: &str,
        language: &str,
        max: u32,
    ) -> Result<Vec<Article>, DomainError> {
        self.api.search(query, language, max).await.map_err(|e| {
            let domain = classify(&e);
            tracing::warn!(query = %query, error = %e, classified = ?domain, "Search fetch failed");
            domain
        })
    }
}
