// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Coordinates, EducationLevel, Lifestyle, Preferences, Profile, RelationshipGoal, SavedFilter,
    ScoredCandidate, SortBy, ValidationError, DEFAULT_MAX_DISTANCE_KM, MIN_PREFERENCE_AGE,
};
pub use requests::{
    AgeRange, HeightRange, ProfileSummary, RankingQuery, RecordInteractionRequest, SearchRequest,
    UpsertFilterRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, Pagination, RankedEntry, RankingResponse,
    RecordInteractionResponse, SavedFiltersResponse, SearchResponse,
};
