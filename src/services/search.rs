use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::core::feed::{CandidateSource, FeedError};
use crate::models::CandidateProfile;

/// Errors that can occur when querying the geo-search backend
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("search backend returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<SearchError> for FeedError {
    fn from(err: SearchError) -> Self {
        FeedError::SearchUnavailable(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: serde_json::Value,
}

/// HTTP client for the geo-distance search backend.
///
/// The index is fed asynchronously from primary-storage writes, so results
/// can lag: a profile created moments ago may be absent from the ranking,
/// which is expected and not an error.
pub struct SearchClient {
    base_url: String,
    index: String,
    api_key: Option<String>,
    client: Client,
}

impl SearchClient {
    pub fn new(base_url: String, index: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, index, api_key, client }
    }

    /// Ranked candidates within `radius_km` of the given point.
    pub async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<CandidateProfile>, SearchError> {
        let url = format!(
            "{}/{}/_search",
            self.base_url.trim_end_matches('/'),
            self.index
        );

        let query = serde_json::json!({
            "query": {
                "geo_distance": {
                    "distance": format!("{}km", radius_km),
                    "location": {
                        "lat": latitude,
                        "lon": longitude,
                    }
                }
            }
        });

        tracing::debug!("querying candidates at ({}, {}) within {}km", latitude, longitude, radius_km);

        let mut request = self.client.post(&url).json(&query);
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("ApiKey {}", api_key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError(format!(
                "search request failed: {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        // Documents that don't parse as profiles are dropped rather than
        // failing the whole ranking.
        let candidates: Vec<CandidateProfile> = parsed
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| serde_json::from_value(hit.source).ok())
            .collect();

        tracing::debug!("search returned {} candidates", candidates.len());

        Ok(candidates)
    }
}

#[async_trait]
impl CandidateSource for SearchClient {
    async fn retrieve_candidates(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<CandidateProfile>, FeedError> {
        Ok(self.search(latitude, longitude, radius_km).await?)
    }
}
