use std::sync::Arc;
use thiserror::Error;

use crate::browser::Launcher;
use crate::client::{Choice, ServiceError, UrlService};
use crate::logger::LogSink;
use crate::selection::SelectionSource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("No text selected. Please select some text and try again.")]
    NoSelection,
    #[error("{0}")]
    Rejected(String),
    #[error("No URL returned from the API.")]
    MissingUrl,
    #[error("Failed to call API: {0}")]
    Transport(String),
    #[error("Failed to open browser: {0}")]
    Launch(String),
}

impl ControlError {
    /// Fatal errors end the session once reported; the rest allow a retry.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::NoSelection | Self::Transport(_) | Self::Launch(_))
    }
}

impl From<ServiceError> for ControlError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rejected(detail) => Self::Rejected(detail),
            ServiceError::MissingUrl => Self::MissingUrl,
            ServiceError::Transport(msg) => Self::Transport(msg),
        }
    }
}

/// Drives one user action from selection to an opened browser tab.
pub struct Controller {
    selection: Box<dyn SelectionSource>,
    service: Box<dyn UrlService>,
    launcher: Box<dyn Launcher>,
    log: Arc<dyn LogSink>,
}

impl Controller {
    pub fn new(
        selection: Box<dyn SelectionSource>,
        service: Box<dyn UrlService>,
        launcher: Box<dyn Launcher>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            selection,
            service,
            launcher,
            log,
        }
    }

    pub fn selected_text(&self) -> Result<String, ControlError> {
        let text = self.selection.read().unwrap_or_else(|e| {
            self.log.error(&format!("Failed to get clipboard text: {}", e));
            String::new()
        });
        if text.is_empty() {
            self.log.error("No text selected. Exiting application.");
            return Err(ControlError::NoSelection);
        }
        Ok(text)
    }

    pub fn models(&self) -> Result<Vec<String>, ControlError> {
        let models = self.service.models().map_err(|e| {
            self.log.error(&format!("Failed to fetch models from API: {}", e));
            ControlError::from(e)
        })?;
        if models.is_empty() {
            self.log.warn("No models available from the API.");
        }
        Ok(models)
    }

    /// Returns the URL that was opened.
    pub fn run(&self, choice: &Choice) -> Result<String, ControlError> {
        self.log.info(&format!("Calling API with params: {:?}", choice.query()));
        let url = self.service.build(choice).map_err(|e| {
            match &e {
                ServiceError::MissingUrl => self.log.warn(&e.to_string()),
                _ => self.log.error(&e.to_string()),
            }
            ControlError::from(e)
        })?;
        self.log.info(&format!("API returned URL: {}", url));
        self.launcher.open(&url).map_err(|e| {
            self.log.error(&format!("Failed to open browser: {:#}", e));
            ControlError::Launch(format!("{:#}", e))
        })?;
        Ok(url)
    }
}
