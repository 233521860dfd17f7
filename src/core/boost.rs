use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Longest boost a profile can hold; the decay denominator.
pub const MAX_BOOST_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

/// A just-started boost decays toward this floor, never below it.
/// This is a floor, not a smooth decay curve; changing it changes
/// ranking outcomes platform-wide.
pub const BOOST_MULTIPLIER_FLOOR: f64 = 0.5;

/// Visibility multipliers for the candidates whose boost expiry is
/// strictly in the future at `now`. Candidates absent from the result
/// are unboosted.
///
/// Boost state is read once per ranking call; a boost expiring
/// mid-computation is not re-checked. One consistent snapshot wins
/// over perfect freshness.
pub fn boost_multipliers(
    expiries: &HashMap<String, DateTime<Utc>>,
    now: DateTime<Utc>,
) -> HashMap<String, f64> {
    expiries
        .iter()
        .filter(|(_, expiry)| **expiry > now)
        .map(|(id, expiry)| {
            let remaining_ms = (*expiry - now).num_milliseconds() as f64;
            let multiplier = (remaining_ms / MAX_BOOST_DURATION_MS as f64)
                .max(BOOST_MULTIPLIER_FLOOR);
            (id.clone(), multiplier)
        })
        .collect()
}

/// `min(100, round(raw * (1 + multiplier)))`: a boost can at most
/// double visibility impact and the result stays on the 0-100 scale.
pub fn apply_boost(raw_score: u8, multiplier: f64) -> u8 {
    let boosted = (raw_score as f64 * (1.0 + multiplier)).round();
    boosted.min(100.0) as u8
}
