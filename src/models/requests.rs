use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{
    EducationLevel, Lifestyle, Preferences, Profile, RelationshipGoal, DEFAULT_MAX_DISTANCE_KM,
};

/// Query parameters for the ranking endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RankingQuery {
    #[validate(length(min = 1))]
    #[serde(rename = "requesterId")]
    pub requester_id: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

/// Inclusive numeric range as sent on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: u16,
    pub max: u16,
}

/// Body of the search endpoint. Preference dimensions are optional;
/// absent ones contribute nothing to scoring.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default)]
    pub age_range: Option<AgeRange>,
    /// Maximum distance in kilometers.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub height_range: Option<HeightRange>,
    #[serde(default)]
    pub education_level: Option<Vec<EducationLevel>>,
    #[serde(default)]
    pub relationship_goals: Option<Vec<RelationshipGoal>>,
    #[serde(default)]
    pub lifestyle: Option<Lifestyle>,
    #[serde(default)]
    pub has_photos: Option<bool>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    /// Only include candidates active within this many days.
    #[serde(default, rename = "lastActive")]
    pub last_active_days: Option<u32>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl SearchRequest {
    /// Build the preference payload the scoring engine consumes.
    /// The requester's own stored preferences are not consulted; a
    /// search is always explicit.
    pub fn to_preferences(&self) -> Preferences {
        let defaults = Preferences::default();
        Preferences {
            gender: self.gender.clone(),
            age_min: self.age_range.map(|r| r.min).unwrap_or(defaults.age_min),
            age_max: self.age_range.map(|r| r.max).unwrap_or(defaults.age_max),
            max_distance_km: self.distance.unwrap_or(DEFAULT_MAX_DISTANCE_KM),
            interests: self.interests.clone().unwrap_or_default(),
            languages: self.languages.clone().unwrap_or_default(),
            education_levels: self.education_level.clone().unwrap_or_default(),
            relationship_goals: self.relationship_goals.clone().unwrap_or_default(),
            height_min_cm: self.height_range.map(|r| r.min),
            height_max_cm: self.height_range.map(|r| r.max),
            lifestyle: self.lifestyle.clone().unwrap_or_default(),
        }
    }
}

/// Body for creating or updating a saved filter.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertFilterRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Absent for creation, present for update.
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub preferences: Preferences,
    #[serde(default)]
    pub is_default: bool,
}

/// Body for recording a like/dislike/view interaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordInteractionRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub target_user_id: String,
    pub kind: String,
}

/// Narrow profile view returned in ranking responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub photo_ids: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub is_premium: bool,
}

impl ProfileSummary {
    pub fn from_profile(profile: &Profile, today: chrono::NaiveDate) -> Self {
        Self {
            id: profile.id.clone(),
            display_name: profile.display_name.clone(),
            age: profile.age_on(today),
            photo_ids: profile.photo_ids.clone(),
            bio: profile.bio.clone(),
            is_premium: profile.is_premium,
        }
    }
}
