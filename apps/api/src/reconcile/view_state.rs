use serde::Serialize;

use super::DataSource;

/// What a list view should render. A view starts in `Loading` and settles once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Loaded,
    ErrorWithCache,
    ErrorNoCache,
    EmptyResult,
}

impl ViewState {
    /// Transition out of `Loading` after a list fetch. Settled states stay put.
    pub fn settle_fetch(self, source: DataSource, item_count: usize) -> ViewState {
        if self != ViewState::Loading {
            return self;
        }
        match source {
            DataSource::Live if item_count == 0 => ViewState::EmptyResult,
            DataSource::Live => ViewState::Loaded,
            DataSource::Cache => ViewState::ErrorWithCache,
            DataSource::Example => ViewState::ErrorNoCache,
        }
    }

    /// Transition out of `Loading` after a successful search.
    pub fn settle_search(self, item_count: usize) -> ViewState {
        self.settle_fetch(DataSource::Live, item_count)
    }
}
