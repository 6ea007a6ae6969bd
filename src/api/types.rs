use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outer JSON object returned by both `top-headlines` and `search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_articles: Option<u64>,
    pub articles: Vec<Article>,
}

/// A single article as delivered by the news API.
///
/// Only `title` and `source` are required on the wire; every other key may be
/// missing or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub source: ArticleSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Article {
    /// Identity used to key list rows.
    ///
    /// The article URL when there is one. Otherwise a SHA-256 of title and
    /// publish time, so the same article keeps its id across re-fetches.
    pub fn list_id(&self) -> String {
        if let Some(url) = self.url.as_deref() {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }

        let input = format!(
            "{}|{}",
            self.title,
            self.published_at
                .map(|p| p.to_rfc3339())
                .unwrap_or_default()
        );
        let hash = Sha256::digest(input.as_bytes());
        format!("{:x}", hash)
    }
}
