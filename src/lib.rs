//! Ember Rank - candidate ranking engine for the Ember dating platform
//!
//! Given a requesting user and a candidate pool, this library computes
//! per-candidate compatibility scores, applies geographic and hard
//! filter constraints, applies a time-decaying visibility boost, and
//! produces a deterministic, paginated ranking.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    apply_boost, boost_multipliers, compatibility_score, haversine_km, RankedPage,
    RankingOptions, RankingPipeline, Refinements, ScoreInputs,
};
pub use crate::models::{
    Coordinates, Preferences, Profile, SavedFilter, ScoredCandidate, SearchRequest, SortBy,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_exports_work() {
        let a = Coordinates {
            latitude: 40.7128,
            longitude: -74.0060,
        };
        let b = Coordinates {
            latitude: 40.73,
            longitude: -74.0,
        };
        assert!(haversine_km(&a, &b) > 0.0);
    }
}
