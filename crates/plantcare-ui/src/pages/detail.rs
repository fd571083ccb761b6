//! Single prediction (`/history/:id`).

use plantcare_api::ApiClient;
use plantcare_core::PredictionDetail;

use crate::effect::Effects;
use crate::lifecycle::{FetchPage, ViewState};

const DETAIL_FALLBACK: &str = "Failed to fetch prediction.";

/// Controller for one prediction. Every mount re-fetches.
#[derive(Debug, Clone)]
pub struct DetailPage {
    id: String,
    page: FetchPage<PredictionDetail>,
}

impl DetailPage {
    /// Creates an idle page for prediction `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page: FetchPage::new(true, DETAIL_FALLBACK),
        }
    }

    /// Prediction id from the route.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current render state.
    pub fn state(&self) -> &ViewState<PredictionDetail> {
        self.page.state()
    }

    /// Fetches the prediction. A blank id renders as Empty after the auth
    /// gate, without a request.
    pub fn mount(&mut self, api: &ApiClient) -> Effects {
        let session = api.session().as_ref();
        let ticket = match self.page.begin(session) {
            Ok(ticket) => ticket,
            Err(effects) => return effects,
        };

        if self.id.trim().is_empty() {
            self.page.mark_empty();
            return Effects::new();
        }

        let result = api.get_prediction(&self.id);
        self.page.settle(ticket, result, session, |_| false)
    }

    /// Leaves the page.
    pub fn unmount(&mut self) {
        self.page.unmount();
    }
}
