use crate::api::Article;
use chrono::{DateTime, Utc};
use url::Url;

/// Placeholder shown when an article has no source name.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Display-ready row derived 1:1 from an [`Article`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadlineItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub image_url: Option<Url>,
    pub published_relative: Option<String>,
    pub article_url: Option<Url>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

/// Converts articles into list rows. Swappable so tests can pin the output.
pub trait ViewDataMapper: Send + Sync {
    fn map(&self, article: &Article) -> HeadlineItem;
}

/// Default mapper. Relative times are computed against the wall clock at the
/// moment of mapping, so mapping the same article twice can differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlineMapper;

impl HeadlineMapper {
    /// Map against an explicit "now". Used by [`ViewDataMapper::map`] and tests.
    pub fn map_at(&self, article: &Article, now: DateTime<Utc>) -> HeadlineItem {
        HeadlineItem {
            id: article.list_id(),
            title: article.title.clone(),
            source: article
                .source
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            image_url: parse_url(article.image.as_deref()),
            published_relative: article.published_at.map(|at| relative_time(at, now)),
            article_url: parse_url(article.url.as_deref()),
            summary: article.description.clone(),
            content: article.content.clone(),
        }
    }
}

impl ViewDataMapper for HeadlineMapper {
    fn map(&self, article: &Article) -> HeadlineItem {
        self.map_at(article, Utc::now())
    }
}

fn parse_url(raw: Option<&str>) -> Option<Url> {
    raw.and_then(|s| Url::parse(s.trim()).ok())
}

/// Humanize `then` relative to `now`: "just now", "5 minutes ago", "in 2 hours".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let delta = now.signed_duration_since(then).num_seconds();
    let future = delta < 0;
    let secs = delta.saturating_abs();

    if secs < MINUTE {
        return "just now".to_string();
    }

    let (value, unit) = match secs {
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s if s < MONTH => (s / WEEK, "week"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };
    let plural = if value == 1 { "" } else { "s" };

    if future {
        format!("in {value} {unit}{plural}")
    } else {
        format!("{value} {unit}{plural} ago")
    }
}
