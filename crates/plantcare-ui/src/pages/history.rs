//! Prediction history list (`/history`).

use plantcare_api::ApiClient;
use plantcare_core::PredictionSummary;

use crate::effect::Effects;
use crate::lifecycle::{FetchPage, ViewState};

/// Fallback shown when the history request fails without a server message.
pub const HISTORY_FALLBACK: &str = "Failed to fetch prediction history.";

/// Controller for the history list.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    page: FetchPage<Vec<PredictionSummary>>,
}

impl HistoryPage {
    /// Creates an idle page.
    pub fn new() -> Self {
        Self {
            page: FetchPage::new(true, HISTORY_FALLBACK),
        }
    }

    /// Current render state.
    pub fn state(&self) -> &ViewState<Vec<PredictionSummary>> {
        self.page.state()
    }

    /// Fetches the history. Entries without an image are skipped; an empty or
    /// fully skipped list renders as Empty.
    pub fn mount(&mut self, api: &ApiClient) -> Effects {
        self.page.load(
            api.session().as_ref(),
            || api.list_predictions(),
            Vec::is_empty,
        )
    }

    /// Leaves the page.
    pub fn unmount(&mut self) {
        self.page.unmount();
    }
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self::new()
    }
}
