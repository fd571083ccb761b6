//! Upload area of the dashboard: select, validate, submit, jump to result.

use std::path::Path;

use plantcare_api::{ApiClient, ApiError};
use plantcare_core::SubmissionData;
use plantcare_session::SessionStore;
use plantcare_upload::{ImageFile, UploadError};

use crate::effect::Effects;
use crate::lifecycle::{Lifecycle, Ticket, ViewState, missing_session_effects, report_failure};
use crate::route::Route;

const UPLOAD_FALLBACK: &str = "Something went wrong.";

/// Upload controller. `state` holds the id of the last accepted submission.
#[derive(Debug, Clone)]
pub struct UploadFlow {
    selected: Option<ImageFile>,
    lifecycle: Lifecycle,
    state: ViewState<String>,
}

impl UploadFlow {
    /// Creates an empty upload area.
    pub fn new() -> Self {
        Self {
            selected: None,
            lifecycle: Lifecycle::default(),
            state: ViewState::Idle,
        }
    }

    /// Replaces the selection with the outcome of a file pick. A rejected pick
    /// clears the previous selection.
    pub fn select(&mut self, picked: Result<ImageFile, UploadError>) -> Effects {
        let mut effects = Effects::new();
        match picked {
            Ok(image) => {
                tracing::info!(
                    stage = "upload",
                    action = "select",
                    media_type = image.media_type(),
                    size = image.len(),
                    sha256 = %image.digest()
                );
                self.selected = Some(image);
                self.state = ViewState::Idle;
            }
            Err(error) => {
                tracing::warn!(stage = "upload", action = "reject", %error);
                self.selected = None;
                let message = error.user_message();
                effects.error(message.clone());
                self.state = ViewState::Error(message);
            }
        }
        effects
    }

    /// Selects a file from disk.
    pub fn select_path(&mut self, path: impl AsRef<Path>) -> Effects {
        self.select(ImageFile::from_path(path))
    }

    /// Selects an in-memory file with a caller-supplied media type.
    pub fn select_file(
        &mut self,
        file_name: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Effects {
        self.select(ImageFile::new(file_name, media_type, bytes))
    }

    /// Current selection.
    pub fn selected(&self) -> Option<&ImageFile> {
        self.selected.as_ref()
    }

    /// Submit state.
    pub fn state(&self) -> &ViewState<String> {
        &self.state
    }

    /// Returns `true` when the submit trigger is enabled.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.lifecycle.in_flight()
    }

    /// Runs local checks and starts a submission.
    ///
    /// # Errors
    /// Returns the effects to apply when nothing must be sent: duplicate
    /// submit, empty selection, or missing session.
    pub fn begin_submit(
        &mut self,
        session: &dyn SessionStore,
    ) -> Result<(Ticket, ImageFile), Effects> {
        if self.lifecycle.in_flight() {
            tracing::debug!(stage = "upload", action = "duplicate_submit");
            return Err(self.local_failure(UploadError::InFlight));
        }

        let Some(image) = self.selected.clone() else {
            return Err(self.local_failure(UploadError::NoFileSelected));
        };

        if !session.has_token() {
            self.state = ViewState::Idle;
            return Err(missing_session_effects());
        }

        tracing::info!(stage = "upload", action = "submit", sha256 = %image.digest());
        self.state = ViewState::Loading;
        Ok((self.lifecycle.begin(), image))
    }

    /// Applies the submission outcome. Success navigates to the new record.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        result: Result<SubmissionData, ApiError>,
        session: &dyn SessionStore,
    ) -> Effects {
        let mut effects = Effects::new();
        if !self.lifecycle.accept(ticket) {
            return effects;
        }

        match result {
            Ok(submission) => {
                tracing::info!(stage = "upload", action = "accepted", id = %submission.id);
                self.selected = None;
                effects.navigate(Route::HistoryDetail(submission.id.clone()));
                self.state = ViewState::Ready(submission.id);
            }
            Err(error) => {
                let message = report_failure(&error, session, true, UPLOAD_FALLBACK, &mut effects);
                self.state = ViewState::Error(message);
            }
        }
        effects
    }

    /// Submits the selection.
    pub fn submit(&mut self, api: &ApiClient) -> Effects {
        let session = api.session().as_ref();
        match self.begin_submit(session) {
            Ok((ticket, image)) => {
                let result = api.submit_prediction(image.into_part());
                self.finish_submit(ticket, result, session)
            }
            Err(effects) => effects,
        }
    }

    /// Leaves the page; an in-flight submission result is discarded.
    pub fn unmount(&mut self) {
        self.lifecycle.invalidate();
        self.selected = None;
        self.state = ViewState::Idle;
    }

    fn local_failure(&mut self, error: UploadError) -> Effects {
        let mut effects = Effects::new();
        effects.error(error.user_message());
        if !self.lifecycle.in_flight() {
            self.state = ViewState::Error(error.user_message());
        }
        effects
    }
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new()
    }
}
