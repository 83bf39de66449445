//! PostgREST persistence adapter.
//!
//! Speaks Supabase's REST dialect over the `submissions` table. Every
//! operation is a single HTTP call with no retries. Inserts and reads use
//! the public (anon) key; updates and deletes use the privileged
//! (service) key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use url::Url;

use super::model::{AcceptedPatch, NewSubmission, PublicSubmission, Submission};
use super::store::{StoreError, SubmissionStore};
use crate::config::{Config, ConfigError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production store speaking PostgREST
pub struct PostgrestStore {
    http: Client,
    table_url: Url,
    anon_key: String,
    service_key: String,
}

impl PostgrestStore {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let table_url = Url::parse(&format!(
            "{}/rest/v1/submissions",
            config.supabase_url.trim_end_matches('/')
        ))
        .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            table_url,
            anon_key: config.anon_key.clone(),
            service_key: config.service_key.clone(),
        })
    }

    fn request(&self, method: Method, key: &str) -> RequestBuilder {
        self.http
            .request(method, self.table_url.clone())
            .header("apikey", key)
            .bearer_auth(key)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::rejection(response).await)
        }
    }

    /// PostgREST error responses carry a `message` field; fall back to the
    /// raw body, then to the bare status.
    async fn rejection(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(body);
        if message.is_empty() {
            StoreError::Rejected(format!("HTTP {status}"))
        } else {
            StoreError::Rejected(message)
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Rejected(e.to_string()))
    }
}

#[async_trait]
impl SubmissionStore for PostgrestStore {
    async fn insert(&self, new: NewSubmission) -> Result<Submission, StoreError> {
        let response = Self::send(
            self.request(Method::POST, &self.anon_key)
                .query(&[("select", "*")])
                .header("Prefer", "return=representation")
                .json(&new),
        )
        .await?;
        let rows: Vec<Submission> = Self::decode(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected("insert returned no row".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        let response = Self::send(self.request(Method::GET, &self.anon_key).query(&[
            ("select", "id,email,phone,name,created_at,accepted"),
            ("order", "created_at.desc"),
        ]))
        .await?;
        Self::decode(response).await
    }

    async fn list_accepted_names(&self) -> Result<Vec<PublicSubmission>, StoreError> {
        let response = Self::send(self.request(Method::GET, &self.anon_key).query(&[
            ("select", "name"),
            ("accepted", "eq.true"),
            ("order", "created_at.desc"),
        ]))
        .await?;
        Self::decode(response).await
    }

    async fn set_accepted(
        &self,
        id: &str,
        accepted: bool,
    ) -> Result<Option<Submission>, StoreError> {
        let id_filter = format!("eq.{id}");
        let response = Self::send(
            self.request(Method::PATCH, &self.service_key)
                .query(&[("id", id_filter.as_str()), ("select", "*")])
                .header("Prefer", "return=representation")
                .json(&AcceptedPatch { accepted }),
        )
        .await?;
        let rows: Vec<Submission> = Self::decode(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id_filter = format!("eq.{id}");
        Self::send(
            self.request(Method::DELETE, &self.service_key)
                .query(&[("id", id_filter.as_str())]),
        )
        .await?;
        Ok(())
    }
}
