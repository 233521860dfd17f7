use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic position. Latitude and longitude always travel together;
/// a profile either has a full position or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What a user is looking for on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipGoal {
    Casual,
    Dating,
    Relationship,
    Marriage,
    Friendship,
}

/// Highest completed education level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Vocational,
    Bachelors,
    Masters,
    Doctorate,
}

/// Lifestyle attributes. The same vocabulary is used on both the
/// candidate side and the preference side, so matching is plain
/// equality per sub-factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lifestyle {
    #[serde(default)]
    pub smoking: Option<String>,
    #[serde(default)]
    pub drinking: Option<String>,
    #[serde(default)]
    pub exercise: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
}

impl Lifestyle {
    /// Pairs of (candidate value, preferred value) for sub-factors
    /// present on both sides.
    pub fn comparable_pairs<'a>(&'a self, wanted: &'a Lifestyle) -> Vec<(&'a str, &'a str)> {
        [
            (&self.smoking, &wanted.smoking),
            (&self.drinking, &wanted.drinking),
            (&self.exercise, &wanted.exercise),
            (&self.diet, &wanted.diet),
        ]
        .into_iter()
        .filter_map(|(own, want)| match (own, want) {
            (Some(o), Some(w)) => Some((o.as_str(), w.as_str())),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.smoking.is_none()
            && self.drinking.is_none()
            && self.exercise.is_none()
            && self.diet.is_none()
    }
}

/// A candidate or requester profile.
///
/// Profiles are owned by the external profile service; the engine
/// borrows read-only snapshots for the duration of one ranking call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub relationship_goal: Option<RelationshipGoal>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub height_cm: Option<u16>,
    #[serde(default)]
    pub education: Option<EducationLevel>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub is_premium: bool,
    /// An expiry in the past is equivalent to "not boosted".
    #[serde(default)]
    pub boost_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photo_ids: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Age in whole years as of `today`, if a birth date is on file.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.map(|bd| {
            let mut years = today.years_since(bd).unwrap_or(0);
            if bd > today {
                years = 0;
            }
            years
        })
    }

    /// Whether the profile holds an unexpired boost at `now`.
    pub fn boosted_at(&self, now: DateTime<Utc>) -> bool {
        self.boost_expires_at.map(|exp| exp > now).unwrap_or(false)
    }
}

pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;
pub const MIN_PREFERENCE_AGE: u8 = 18;

/// Matching preferences attached to a requester at ranking time.
///
/// Every dimension is opt-out: an empty or absent dimension contributes
/// zero weight to scoring rather than a zero score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default = "default_age_min")]
    pub age_min: u8,
    #[serde(default = "default_age_max")]
    pub age_max: u8,
    #[serde(default = "default_max_distance")]
    pub max_distance_km: f64,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub education_levels: Vec<EducationLevel>,
    #[serde(default)]
    pub relationship_goals: Vec<RelationshipGoal>,
    #[serde(default)]
    pub height_min_cm: Option<u16>,
    #[serde(default)]
    pub height_max_cm: Option<u16>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
}

fn default_age_min() -> u8 {
    MIN_PREFERENCE_AGE
}

fn default_age_max() -> u8 {
    99
}

fn default_max_distance() -> f64 {
    DEFAULT_MAX_DISTANCE_KM
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            gender: None,
            age_min: default_age_min(),
            age_max: default_age_max(),
            max_distance_km: default_max_distance(),
            interests: Vec::new(),
            languages: Vec::new(),
            education_levels: Vec::new(),
            relationship_goals: Vec::new(),
            height_min_cm: None,
            height_max_cm: None,
            lifestyle: Lifestyle::default(),
        }
    }
}

impl Preferences {
    /// Boundary validation. Filtering and scoring assume validated
    /// input and are total; malformed payloads must be rejected here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.age_min < MIN_PREFERENCE_AGE {
            return Err(ValidationError::new(
                "ageRange.min",
                format!("minimum age must be at least {}", MIN_PREFERENCE_AGE),
            ));
        }
        if self.age_max < self.age_min {
            return Err(ValidationError::new(
                "ageRange.max",
                "maximum age must not be below minimum age",
            ));
        }
        if !self.max_distance_km.is_finite() || self.max_distance_km <= 0.0 {
            return Err(ValidationError::new(
                "distance",
                "maximum distance must be a positive number",
            ));
        }
        if let (Some(min), Some(max)) = (self.height_min_cm, self.height_max_cm) {
            if max < min {
                return Err(ValidationError::new(
                    "heightRange.max",
                    "maximum height must not be below minimum height",
                ));
            }
        }
        Ok(())
    }

    /// Whether both height bounds are declared.
    pub fn height_range(&self) -> Option<(u16, u16)> {
        match (self.height_min_cm, self.height_max_cm) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Malformed preferences payload, surfaced to the caller with a
/// field-level reason before any filtering or scoring work begins.
#[derive(Debug, Clone, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Per-candidate scoring outcome. Created per ranking call and
/// discarded once the response is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub profile: Profile,
    /// Weighted compatibility score before boosting, 0-100.
    pub raw_score: u8,
    #[serde(default)]
    pub distance_km: Option<f64>,
    /// Boost-adjusted score used for ordering, 0-100.
    pub final_score: u8,
}

/// A named, persisted preferences preset owned by one user.
/// At most one filter per user carries the default flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub preferences: Preferences,
    pub is_default: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Requested result ordering. Unrecognized values fall back to
/// `Newest`; an absent value means `Relevance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Newest,
    LastActive,
    Likes,
    Distance,
    MatchPercentage,
    Relevance,
}

impl SortBy {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => SortBy::Relevance,
            Some("newest") => SortBy::Newest,
            Some("lastActive") => SortBy::LastActive,
            Some("likes") => SortBy::Likes,
            Some("distance") => SortBy::Distance,
            Some("matchPercentage") => SortBy::MatchPercentage,
            Some("relevance") => SortBy::Relevance,
            Some(_) => SortBy::Newest,
        }
    }
}
