//! HTTP client for the REST backend.
//!
//! Every endpoint returns a JSON array and is authenticated with a bearer token
//! taken from `ACADEMY_API_TOKEN`.

use super::documents::{EmployeeDocument, StudentDocument, TimetableDocument};
use super::import::RemoteSource;
use crate::{
    config::academy::RemoteConfig,
    errors::{Error, Result},
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the bearer token
pub const API_TOKEN_ENV: &str = "ACADEMY_API_TOKEN";

const STUDENTS_PATH: &str = "/api/data/students";
const EMPLOYEES_PATH: &str = "/api/data/employees";
const TIMETABLE_PATH: &str = "/api/data/timetable";

/// Client for the academy REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional bearer token.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Builds a client from configuration, `None` when no base URL is configured.
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>> {
        let Some(base_url) = config.base_url.as_deref() else {
            return Ok(None);
        };
        let token = std::env::var(API_TOKEN_ENV).ok();
        Self::new(base_url, token).map(Some)
    }

    /// Full URL of an endpoint path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    #[instrument(skip(self))]
    async fn fetch_array<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                message: format!("GET {path} returned {status}"),
            });
        }

        let items: Vec<T> = response.json().await?;
        debug!(count = items.len(), "Fetched documents");
        Ok(items)
    }
}

impl RemoteSource for ApiClient {
    async fn fetch_students(&self) -> Result<Vec<StudentDocument>> {
        self.fetch_array(STUDENTS_PATH).await
    }

    async fn fetch_employees(&self) -> Result<Vec<EmployeeDocument>> {
        self.fetch_array(EMPLOYEES_PATH).await
    }

    async fn fetch_timetable(&self) -> Result<Vec<TimetableDocument>> {
        self.fetch_array(TIMETABLE_PATH).await
    }
}
