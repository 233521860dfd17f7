// Core ranking engine exports
pub mod boost;
pub mod filters;
pub mod geo;
pub mod pipeline;
pub mod scoring;

pub use boost::{apply_boost, boost_multipliers, BOOST_MULTIPLIER_FLOOR, MAX_BOOST_DURATION_MS};
pub use filters::{is_eligible, FilterContext, Refinements};
pub use geo::{bounding_box, haversine_km, BoundingBox};
pub use pipeline::{RankedPage, RankingOptions, RankingPipeline};
pub use scoring::{compatibility_score, ScoreInputs, NEUTRAL_SCORE};
