//! Headlines screen controller.
//!
//! Owns the [`ScreenState`] for one screen and decides what to fetch:
//!
//! - `load_initial_data` runs once, from `Idle` only
//! - `refresh` refetches the current query immediately
//! - `query_changed` debounces free-text edits before searching
//!
//! Every fetch is tagged with a generation number. Its result is applied only
//! if no newer fetch has started since, so a slow stale response can never
//! overwrite a fresher one. All transitions go through a single lock and are
//! published on a `watch` channel.

use crate::api::Article;
use crate::error::DomainError;
use crate::headlines::state::{LoadKind, ScreenState};
use crate::headlines::topic::Topic;
use crate::headlines::view_data::{HeadlineMapper, ViewDataMapper};
use crate::repository::NewsRepository;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet period after the last query edit before a search starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Result cap applied to both headlines and search.
pub const DEFAULT_MAX_ARTICLES: u32 = 50;

/// Tunables for [`HeadlinesController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Two-letter language code sent as `lang`.
    pub language: String,
    /// Country filter for top headlines. `None` sends no `country` parameter.
    pub country: Option<String>,
    pub max_articles: u32,
    pub debounce: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: None,
            max_articles: DEFAULT_MAX_ARTICLES,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Mutable bookkeeping guarded by one lock.
#[derive(Default)]
struct Core {
    query: String,
    /// Bumped each time a fetch starts. Only the latest may publish.
    generation: u64,
    /// Pending debounce (and the search it leads to).
    debounce: Option<JoinHandle<()>>,
}

struct Inner {
    repository: Arc<dyn NewsRepository>,
    mapper: Arc<dyn ViewDataMapper>,
    settings: ControllerSettings,
    state_tx: watch::Sender<ScreenState>,
    core: Mutex<Core>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new fetch: claim a generation and publish `Loading(kind)`.
    fn begin(&self, kind: LoadKind) -> u64 {
        let mut core = self.lock();
        core.generation = core.generation.wrapping_add(1);
        self.state_tx.send_replace(ScreenState::Loading(kind));
        core.generation
    }

    /// Publish the outcome of fetch `generation` unless it has been superseded.
    fn finish(&self, generation: u64, result: Result<Vec<Article>, DomainError>) -> bool {
        let core = self.lock();
        if generation != core.generation {
            tracing::debug!(
                expected = core.generation,
                got = generation,
                "Ignoring stale headlines result (generation mismatch)"
            );
            return false;
        }

        let next = match result {
            Ok(articles) => {
                tracing::debug!(count = articles.len(), generation, "Headlines loaded");
                ScreenState::Loaded(articles.iter().map(|a| self.mapper.map(a)).collect())
            }
            Err(e) => {
                tracing::warn!(error = %e, generation, "Headlines load failed");
                ScreenState::Error(e.into())
            }
        };
        self.state_tx.send_replace(next);
        true
    }

    /// Empty query means top headlines, anything else is a search.
    async fn fetch(&self, query: &str) -> Result<Vec<Article>, DomainError> {
        let settings = &self.settings;
        if query.is_empty() {
            self.repository
                .top_headlines(
                    &settings.language,
                    settings.max_articles,
                    settings.country.as_deref(),
                )
                .await
        } else {
            self.repository
                .search(query, &settings.language, settings.max_articles)
                .await
        }
    }

    async fn run(&self, query: &str, kind: LoadKind) {
        let query = query.trim();
        let generation = self.begin(kind);
        tracing::debug!(query = %query, ?kind, generation, "Fetching headlines");
        let result = self.fetch(query).await;
        self.finish(generation, result);
    }
}

/// State machine behind the headlines screen.
///
/// Methods that spawn work (`query_changed`, `toggle_topic`) must be called
/// from within a tokio runtime.
pub struct HeadlinesController {
    inner: Arc<Inner>,
}

impl HeadlinesController {
    pub fn new(repository: Arc<dyn NewsRepository>, settings: ControllerSettings) -> Self {
        Self::with_mapper(repository, Arc::new(HeadlineMapper), settings)
    }

    pub fn with_mapper(
        repository: Arc<dyn NewsRepository>,
        mapper: Arc<dyn ViewDataMapper>,
        settings: ControllerSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(ScreenState::Idle);
        Self {
            inner: Arc::new(Inner {
                repository,
                mapper,
                settings,
                state_tx,
                core: Mutex::new(Core::default()),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ScreenState {
        self.inner.state_tx.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.inner.state_tx.subscribe()
    }

    pub fn query(&self) -> String {
        self.inner.lock().query.clone()
    }

    /// Query trimmed and lowercased, as used for topic matching.
    pub fn normalized_query(&self) -> String {
        self.query().trim().to_lowercase()
    }

    /// First load of the screen. A no-op unless the state is still `Idle`.
    pub async fn load_initial_data(&self) {
        let generation = {
            let mut core = self.inner.lock();
            let idle = self.inner.state_tx.borrow().is_idle();
            if !idle {
                tracing::debug!("Initial load skipped, screen already loaded or loading");
                return;
            }
            core.generation = core.generation.wrapping_add(1);
            self.inner
                .state_tx
                .send_replace(ScreenState::Loading(LoadKind::Initial));
            core.generation
        };

        tracing::debug!(generation, "Loading initial headlines");
        let result = self.inner.fetch("").await;
        self.inner.finish(generation, result);
    }

    /// Refetch the current query now, skipping the debounce.
    ///
    /// Also the retry action after an error.
    pub async fn refresh(&self) {
        let query = {
            let mut core = self.inner.lock();
            if let Some(handle) = core.debounce.take() {
                handle.abort();
                tracing::debug!("Aborted pending debounced search for refresh");
            }
            core.query.clone()
        };
        self.inner.run(&query, LoadKind::Refresh).await;
    }

    /// Replace the query without scheduling a search. Cancels any pending
    /// debounce; call [`refresh`](Self::refresh) to fetch it.
    pub fn set_query(&self, text: impl Into<String>) {
        let mut core = self.inner.lock();
        core.query = text.into();
        if let Some(handle) = core.debounce.take() {
            handle.abort();
            tracing::debug!("Aborted pending debounced search for explicit query");
        }
    }

    /// Record a query edit and (re)start the debounce timer.
    ///
    /// Only the last edit within the quiet period triggers a search.
    pub fn query_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let mut core = self.inner.lock();
        core.query = text.clone();

        if let Some(handle) = core.debounce.take() {
            handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        let debounce = inner.settings.debounce;
        core.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tracing::debug!(query = %text, "Debounce elapsed, searching");
            inner.run(&text, LoadKind::Search).await;
        }));
    }

    pub fn selected_topic(&self) -> Option<Topic> {
        self.normalized_query().parse().ok()
    }

    pub fn is_topic_selected(&self, topic: Topic) -> bool {
        self.normalized_query() == topic.key()
    }

    /// Select `topic`, or clear the query if it is already selected.
    pub fn toggle_topic(&self, topic: Topic) {
        let next = if self.is_topic_selected(topic) {
            String::new()
        } else {
            topic.display_name().to_string()
        };
        self.query_changed(next);
    }

    /// Message for a successful load that returned nothing.
    pub fn empty_message(&self) -> String {
        let query = self.query();
        if query.is_empty() {
            return "No news articles available at the moment.".to_string();
        }
        match self.selected_topic() {
            Some(topic) => format!("No articles found for '{}'.", topic.display_name()),
            None => format!("No articles found for '{}'.", query),
        }
    }
}

impl Drop for HeadlinesController {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.lock().debounce.take() {
            handle.abort();
            tracing::debug!("Aborted debounce task on controller drop");
        }
    }
}
