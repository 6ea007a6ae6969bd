//! Headlines screen: state machine, view data and topics.
//!
//! - `controller` - Debounced query orchestration and last-request-wins loading
//! - `state` - Published screen state
//! - `view_data` - Article to list-row mapping
//! - `topic` - Trending topic chips

mod controller;
mod state;
mod topic;
mod view_data;

pub use controller::{
    ControllerSettings, HeadlinesController, DEFAULT_DEBOUNCE, DEFAULT_MAX_ARTICLES,
};
pub use state::{LoadKind, ScreenState};
pub use topic::{Topic, UnknownTopic};
pub use view_data::{relative_time, HeadlineItem, HeadlineMapper, ViewDataMapper, UNKNOWN_SOURCE};
