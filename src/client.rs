use once_cell::sync::OnceCell;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Runtime;

use crate::builder::{Action, Template};

static CLIENT: OnceCell<Client> = OnceCell::new();

/// What the user picked in the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub action: Action,
    pub text: String,
    pub template: Option<Template>,
    pub model: Option<String>,
}

impl Choice {
    pub fn plain(action: Action, text: impl Into<String>) -> Self {
        Self {
            action,
            text: text.into(),
            template: None,
            model: None,
        }
    }

    pub fn ai(text: impl Into<String>, template: Template, model: impl Into<String>) -> Self {
        Self {
            action: Action::Ai,
            text: text.into(),
            template: Some(template),
            model: Some(model.into()),
        }
    }

    /// Query pairs; absent or empty optional values are left out.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("action", self.action.to_string()), ("text", self.text.clone())];
        if let Some(template) = self.template {
            params.push(("template", template.number().to_string()));
        }
        if let Some(model) = self.model.as_ref().filter(|m| !m.is_empty()) {
            params.push(("model", model.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Rejected(String),
    #[error("No URL returned from the API.")]
    MissingUrl,
    #[error("{0}")]
    Transport(String),
}

pub trait UrlService {
    fn build(&self, choice: &Choice) -> Result<String, ServiceError>;
    fn models(&self) -> Result<Vec<String>, ServiceError>;
}

#[derive(Deserialize)]
struct UrlResponse {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Talks to the builder service over HTTP, blocking the caller per request.
pub struct HttpService {
    base: String,
    client: &'static Client,
    rt: Runtime,
}

impl HttpService {
    pub fn new(base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = CLIENT.get_or_try_init(|| Client::builder().timeout(timeout).build())?;
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client,
            rt,
        })
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base, path))
            .query(query)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::BAD_REQUEST {
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.detail)
                .unwrap_or(text);
            return Err(ServiceError::Rejected(detail));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Transport(format!("{} {}", status, text)));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))
    }
}

impl UrlService for HttpService {
    fn build(&self, choice: &Choice) -> Result<String, ServiceError> {
        let query = choice.query();
        let resp: UrlResponse = self.rt.block_on(self.get("/translate", &query))?;
        resp.url.filter(|u| !u.is_empty()).ok_or(ServiceError::MissingUrl)
    }

    fn models(&self) -> Result<Vec<String>, ServiceError> {
        let resp: ModelsResponse = self.rt.block_on(self.get("/models", &[]))?;
        Ok(resp.models)
    }
}
