use std::fmt;
use std::str::FromStr;

/// Trending topics offered as one-tap queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Technology,
    Apple,
    Ai,
    Ios,
    Swift,
    Business,
    Science,
    Health,
    Sports,
    Entertainment,
    Politics,
    Climate,
}

impl Topic {
    pub const ALL: [Topic; 12] = [
        Topic::Technology,
        Topic::Apple,
        Topic::Ai,
        Topic::Ios,
        Topic::Swift,
        Topic::Business,
        Topic::Science,
        Topic::Health,
        Topic::Sports,
        Topic::Entertainment,
        Topic::Politics,
        Topic::Climate,
    ];

    /// Lowercase key, also what a normalized query must equal to select it.
    pub fn key(self) -> &'static str {
        match self {
            Topic::Technology => "technology",
            Topic::Apple => "apple",
            Topic::Ai => "ai",
            Topic::Ios => "ios",
            Topic::Swift => "swift",
            Topic::Business => "business",
            Topic::Science => "science",
            Topic::Health => "health",
            Topic::Sports => "sports",
            Topic::Entertainment => "entertainment",
            Topic::Politics => "politics",
            Topic::Climate => "climate",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Topic::Technology => "Technology",
            Topic::Apple => "Apple",
            Topic::Ai => "AI",
            Topic::Ios => "iOS",
            Topic::Swift => "Swift",
            Topic::Business => "Business",
            Topic::Science => "Science",
            Topic::Health => "Health",
            Topic::Sports => "Sports",
            Topic::Entertainment => "Entertainment",
            Topic::Politics => "Politics",
            Topic::Climate => "Climate",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|t| t.key() == normalized)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}
