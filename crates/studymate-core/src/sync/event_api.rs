//! HTTP client for the StudyMate events backend.
//!
//! A thin reqwest wrapper over the fixed-base-URL JSON API. Every
//! non-success status is mapped onto [`ApiError`] so callers get a
//! user-readable message without inspecting responses themselves.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use super::types::{ApiError, EventPayload, RemoteEvent};
use crate::storage::ApiConfig;

/// Client for the events API.
#[derive(Debug, Clone)]
pub struct EventApi {
    http: Client,
    base_url: String,
}

impl EventApi {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        // Validate eagerly; a bad override in config.toml should fail here,
        // not on the first request.
        Url::parse(&config.base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::from_request)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `GET /hello` connectivity probe.
    pub async fn hello(&self) -> Result<Value, ApiError> {
        self.get_json("hello").await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Value, ApiError> {
        self.get_json("health").await
    }

    /// `GET /events` -- the full event list.
    pub async fn list_events(&self) -> Result<Vec<RemoteEvent>, ApiError> {
        self.get_json("events").await
    }

    /// `GET /events/{id}`.
    pub async fn event(&self, id: i64) -> Result<RemoteEvent, ApiError> {
        self.get_json(&format!("events/{id}")).await
    }

    /// `POST /events`.
    pub async fn create_event(&self, payload: &EventPayload) -> Result<RemoteEvent, ApiError> {
        let url = self.endpoint("events");
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(ApiError::from_request)?;
        let response = check(response).await?;
        response.json().await.map_err(ApiError::from_request)
    }

    /// `PUT /events/{id}`.
    pub async fn update_event(
        &self,
        id: i64,
        payload: &EventPayload,
    ) -> Result<RemoteEvent, ApiError> {
        let url = self.endpoint(&format!("events/{id}"));
        debug!("PUT {url}");
        let response = self
            .http
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(ApiError::from_request)?;
        let response = check(response).await?;
        response.json().await.map_err(ApiError::from_request)
    }

    /// `DELETE /events/{id}`.
    pub async fn delete_event(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("events/{id}"));
        debug!("DELETE {url}");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::from_request)?;
        check(response).await?;
        Ok(())
    }

    /// `GET /events/upcoming`.
    pub async fn upcoming_events(&self) -> Result<Vec<RemoteEvent>, ApiError> {
        self.get_json("events/upcoming").await
    }

    /// `GET /events/today`.
    pub async fn today_events(&self) -> Result<Vec<RemoteEvent>, ApiError> {
        self.get_json("events/today").await
    }

    /// `GET /events/week`.
    pub async fn week_events(&self) -> Result<Vec<RemoteEvent>, ApiError> {
        self.get_json("events/week").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from_request)?;
        let response = check(response).await?;
        debug!("{} {url}", response.status());
        response.json().await.map_err(ApiError::from_request)
    }
}

/// Map a non-success status onto the error taxonomy.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    error!("request to {} failed with status {status}", response.url());

    if status.is_server_error() {
        return Err(ApiError::Server {
            status: status.as_u16(),
        });
    }
    if status == StatusCode::BAD_REQUEST {
        let body: Value = response.json().await.unwrap_or(Value::Null);
        return Err(classify_bad_request(&body));
    }
    Err(ApiError::Status {
        status: status.as_u16(),
    })
}

/// A 400 whose body is a JSON object carries field-level validation
/// messages; join them into one displayable string.
fn classify_bad_request(body: &Value) -> ApiError {
    match body.as_object() {
        Some(fields) if !fields.is_empty() => {
            let message = fields
                .values()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            ApiError::Validation { message }
        }
        _ => ApiError::BadRequest,
    }
}
