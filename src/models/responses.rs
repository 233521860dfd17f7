use serde::{Deserialize, Serialize};

use crate::models::domain::SavedFilter;
use crate::models::requests::ProfileSummary;

/// One entry in a ranking response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub profile: ProfileSummary,
    /// Compatibility percentage before boosting; ordering also
    /// reflects the boost multiplier.
    pub match_percentage: u8,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

/// Response for the ranking endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub matches: Vec<RankedEntry>,
    pub total_results: usize,
}

/// Pagination block computed against the filtered, pre-page count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: usize,
    pub has_more: bool,
}

/// Response for the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<RankedEntry>,
    pub pagination: Pagination,
}

/// Saved filter collection for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFiltersResponse {
    pub filters: Vec<SavedFilter>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Interaction recording response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInteractionResponse {
    pub success: bool,
    pub interaction_id: String,
}
