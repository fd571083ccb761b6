//! Dashboard (`/`): upload area plus recent predictions.

use plantcare_api::ApiClient;
use plantcare_core::PredictionSummary;

use crate::effect::Effects;
use crate::lifecycle::{FetchPage, ViewState};
use crate::pages::history::HISTORY_FALLBACK;
use crate::upload::UploadFlow;

/// Controller for the dashboard.
#[derive(Debug, Clone)]
pub struct HomePage {
    recent: FetchPage<Vec<PredictionSummary>>,
    upload: UploadFlow,
}

impl HomePage {
    /// Creates an idle dashboard.
    pub fn new() -> Self {
        Self {
            recent: FetchPage::new(true, HISTORY_FALLBACK),
            upload: UploadFlow::new(),
        }
    }

    /// Render state of the recent predictions panel.
    pub fn recent(&self) -> &ViewState<Vec<PredictionSummary>> {
        self.recent.state()
    }

    /// Upload area.
    pub fn upload(&self) -> &UploadFlow {
        &self.upload
    }

    /// Mutable upload area, for selection and submit.
    pub fn upload_mut(&mut self) -> &mut UploadFlow {
        &mut self.upload
    }

    /// Fetches recent predictions.
    pub fn mount(&mut self, api: &ApiClient) -> Effects {
        self.recent.load(
            api.session().as_ref(),
            || api.list_predictions(),
            Vec::is_empty,
        )
    }

    /// Leaves the page, abandoning both the list fetch and any upload.
    pub fn unmount(&mut self) {
        self.recent.unmount();
        self.upload.unmount();
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}
