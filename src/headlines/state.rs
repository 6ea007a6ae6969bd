use crate::error::PresentationError;
use crate::headlines::view_data::HeadlineItem;

/// What triggered a load. Lets the rendering layer pick a spinner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    Initial,
    Refresh,
    Search,
}

/// Screen state published by the headlines controller.
///
/// `Loading` replaces any previously loaded items; nothing stale is kept
/// while a refresh or search is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScreenState {
    #[default]
    Idle,
    Loading(LoadKind),
    Loaded(Vec<HeadlineItem>),
    Error(PresentationError),
}

impl ScreenState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ScreenState::Idle)
    }

    /// Loaded items, or an empty slice in any other state.
    pub fn items(&self) -> &[HeadlineItem] {
        match self {
            ScreenState::Loaded(items) => items,
            _ => &[],
        }
    }
}
