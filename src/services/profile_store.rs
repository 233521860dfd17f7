use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::core::geo::bounding_box;
use crate::models::{Preferences, Profile};

/// Errors from the profile-service collaborator. A fetch failure is
/// surfaced to the caller rather than degraded into a partial ranking.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("profile service returned error: {0}")]
    ApiError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Read-only client for the external profile service.
///
/// The engine borrows profile snapshots through this client and writes
/// nothing back; boost purchases and profile edits belong to other
/// services.
pub struct ProfileStoreClient {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ProfileList {
    profiles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BoostStateList {
    /// Candidate id to boost expiry; unboosted ids are absent.
    states: HashMap<String, DateTime<Utc>>,
}

impl ProfileStoreClient {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Fetch a single profile snapshot.
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, StoreError> {
        let url = self.url(&format!("/v1/profiles/{}", urlencoding::encode(user_id)));

        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!(
                "profile not found for user {}",
                user_id
            )));
        }
        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "failed to fetch profile: {}",
                response.status()
            )));
        }

        response
            .json::<Profile>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse profile: {}", e)))
    }

    /// Fetch an unscored candidate slice.
    ///
    /// Cheap constraints are pushed down into the query: gender, age
    /// window, a geospatial bounding box around the requester, and the
    /// exclusion set. Containment filters and scoring stay in-process.
    pub async fn fetch_candidates(
        &self,
        requester: &Profile,
        preferences: &Preferences,
        exclude_ids: &[String],
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError> {
        let mut params: Vec<(String, String)> = vec![
            ("excludeId".into(), requester.id.clone()),
            ("minAge".into(), preferences.age_min.to_string()),
            ("maxAge".into(), preferences.age_max.to_string()),
            ("limit".into(), limit.to_string()),
        ];

        if let Some(gender) = &preferences.gender {
            params.push(("gender".into(), gender.clone()));
        }

        if let Some(center) = &requester.location {
            let bbox = bounding_box(center, preferences.max_distance_km);
            params.push(("minLat".into(), bbox.min_lat.to_string()));
            params.push(("maxLat".into(), bbox.max_lat.to_string()));
            params.push(("minLon".into(), bbox.min_lon.to_string()));
            params.push(("maxLon".into(), bbox.max_lon.to_string()));
        }

        if !exclude_ids.is_empty() {
            params.push(("notIn".into(), exclude_ids.join(",")));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}?{}", self.url("/v1/profiles"), query);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "failed to query candidates: {}",
                response.status()
            )));
        }

        let list: ProfileList = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse slice: {}", e)))?;

        // A single malformed candidate record is logged and skipped;
        // it must not fail the whole page.
        let profiles: Vec<Profile> = list
            .profiles
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Profile>(value) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping malformed candidate record: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} candidates for {}", profiles.len(), requester.id);

        Ok(profiles)
    }

    /// Read the boost ledger state for a set of candidates: id to
    /// expiry timestamp, unboosted ids absent. Read once per ranking
    /// call; the result is a consistent snapshot.
    pub async fn fetch_boost_state(
        &self,
        candidate_ids: &[String],
    ) -> Result<HashMap<String, DateTime<Utc>>, StoreError> {
        if candidate_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = self.url("/v1/boosts/state");

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&serde_json::json!({ "ids": candidate_ids }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "failed to fetch boost state: {}",
                response.status()
            )));
        }

        let list: BoostStateList = response.json().await.map_err(|e| {
            StoreError::InvalidResponse(format!("failed to parse boost state: {}", e))
        })?;

        Ok(list.states)
    }
}
