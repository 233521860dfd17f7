use crate::models::{Preferences, Profile};

/// Score returned when no criterion applies: no comparable dimensions
/// means no opinion, not a zero.
pub const NEUTRAL_SCORE: u8 = 50;

/// Everything one criterion may look at. Distance is computed once by
/// the pipeline (it is also needed for the hard filter and the
/// response) and handed in here; `None` means at least one side has no
/// coordinates.
pub struct ScoreInputs<'a> {
    pub candidate: &'a Profile,
    pub preferences: &'a Preferences,
    pub distance_km: Option<f64>,
}

/// One weighted criterion. The scorer returns `None` when its
/// precondition is not met, in which case neither the score nor the
/// weight enters the aggregate.
struct Criterion {
    weight: f64,
    score: fn(&ScoreInputs) -> Option<f64>,
}

/// Fixed, ordered criteria set. Weights are design constants, not
/// runtime-configurable: goal alignment and shared interests dominate,
/// the premium bonus is a small monetization nudge rather than a
/// ranking override.
const CRITERIA: [Criterion; 8] = [
    Criterion { weight: 3.0, score: shared_interests },
    Criterion { weight: 2.5, score: distance },
    Criterion { weight: 4.0, score: relationship_goal },
    Criterion { weight: 2.0, score: shared_languages },
    Criterion { weight: 1.0, score: height_in_range },
    Criterion { weight: 2.0, score: education_match },
    Criterion { weight: 2.5, score: lifestyle_alignment },
    Criterion { weight: 0.5, score: premium_bonus },
];

/// Normalized 0-100 compatibility score for one candidate.
///
/// Accumulates `score_i * weight_i` over the criteria whose
/// preconditions hold, then normalizes by the applied weight sum.
/// Deterministic: identical inputs always produce identical output.
pub fn compatibility_score(inputs: &ScoreInputs) -> u8 {
    let mut total = 0.0;
    let mut weight_sum = 0.0;

    for criterion in &CRITERIA {
        if let Some(score) = (criterion.score)(inputs) {
            total += score * criterion.weight;
            weight_sum += criterion.weight;
        }
    }

    if weight_sum > 0.0 {
        (total / weight_sum * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        NEUTRAL_SCORE
    }
}

fn overlap_fraction(own: &[String], wanted: &[String]) -> Option<f64> {
    if own.is_empty() || wanted.is_empty() {
        return None;
    }
    let shared = own.iter().filter(|item| wanted.contains(item)).count();
    Some(shared as f64 / wanted.len() as f64)
}

fn shared_interests(inputs: &ScoreInputs) -> Option<f64> {
    overlap_fraction(&inputs.candidate.interests, &inputs.preferences.interests)
}

/// `1 - d/max`, deliberately unclamped: an over-range candidate that
/// survives the hard cut is penalized below in-range candidates
/// instead of being flattened to zero.
fn distance(inputs: &ScoreInputs) -> Option<f64> {
    let d = inputs.distance_km?;
    Some(1.0 - d / inputs.preferences.max_distance_km)
}

fn relationship_goal(inputs: &ScoreInputs) -> Option<f64> {
    if inputs.preferences.relationship_goals.is_empty() {
        return None;
    }
    let goal = inputs.candidate.relationship_goal?;
    Some(if inputs.preferences.relationship_goals.contains(&goal) {
        1.0
    } else {
        0.0
    })
}

fn shared_languages(inputs: &ScoreInputs) -> Option<f64> {
    overlap_fraction(&inputs.candidate.languages, &inputs.preferences.languages)
}

fn height_in_range(inputs: &ScoreInputs) -> Option<f64> {
    let (min, max) = inputs.preferences.height_range()?;
    let height = inputs.candidate.height_cm?;
    Some(if height >= min && height <= max { 1.0 } else { 0.0 })
}

fn education_match(inputs: &ScoreInputs) -> Option<f64> {
    if inputs.preferences.education_levels.is_empty() {
        return None;
    }
    let level = inputs.candidate.education?;
    Some(if inputs.preferences.education_levels.contains(&level) {
        1.0
    } else {
        0.0
    })
}

/// Fraction of lifestyle sub-factors matching exactly, over the
/// sub-factors declared on both sides.
fn lifestyle_alignment(inputs: &ScoreInputs) -> Option<f64> {
    let pairs = inputs
        .candidate
        .lifestyle
        .comparable_pairs(&inputs.preferences.lifestyle);
    if pairs.is_empty() {
        return None;
    }
    let matching = pairs.iter().filter(|(own, want)| own == want).count();
    Some(matching as f64 / pairs.len() as f64)
}

fn premium_bonus(inputs: &ScoreInputs) -> Option<f64> {
    inputs.candidate.is_premium.then_some(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, EducationLevel, Lifestyle, RelationshipGoal};

    fn blank_profile(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            display_name: format!("User {}", id),
            gender: None,
            birth_date: None,
            location: None,
            interests: vec![],
            relationship_goal: None,
            languages: vec![],
            height_cm: None,
            education: None,
            lifestyle: Lifestyle::default(),
            is_premium: false,
            boost_expires_at: None,
            photo_ids: vec![],
            bio: None,
            likes_count: 0,
            last_active_at: None,
            created_at: None,
        }
    }

    #[test]
    fn no_comparable_dimensions_yields_neutral_score() {
        // Candidate shares nothing with the declared preferences and
        // neither side has coordinates.
        let candidate = blank_profile("c");
        let prefs = Preferences::default();
        let score = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: None,
        });
        assert_eq!(score, NEUTRAL_SCORE);
    }

    #[test]
    fn two_perfect_criteria_score_one_hundred() {
        // Shared interests 1.0 and zero distance 1.0 as the only
        // active criteria normalize to exactly 100.
        let candidate = Profile {
            interests: vec!["hiking".into(), "music".into()],
            location: Some(Coordinates {
                latitude: 40.0,
                longitude: -74.0,
            }),
            ..blank_profile("c")
        };
        let prefs = Preferences {
            interests: vec!["hiking".into(), "music".into()],
            max_distance_km: 50.0,
            ..Preferences::default()
        };
        let score = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: Some(0.0),
        });
        assert_eq!(score, 100);
    }

    #[test]
    fn missing_coordinates_skip_the_distance_dimension() {
        let candidate = Profile {
            interests: vec!["hiking".into()],
            ..blank_profile("c")
        };
        let prefs = Preferences {
            interests: vec!["hiking".into()],
            ..Preferences::default()
        };
        // Only the interest criterion applies; full overlap is 100.
        let score = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: None,
        });
        assert_eq!(score, 100);
    }

    #[test]
    fn over_range_distance_penalizes_below_zero_contribution() {
        let prefs = Preferences {
            max_distance_km: 50.0,
            ..Preferences::default()
        };
        let candidate = blank_profile("c");
        let near = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: Some(10.0),
        });
        let far = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: Some(120.0),
        });
        assert!(near > far);
        // 1 - 120/50 = -1.4 normalized over weight 2.5 then clamped.
        assert_eq!(far, 0);
    }

    #[test]
    fn goal_alignment_dominates_premium_bonus() {
        let prefs = Preferences {
            relationship_goals: vec![RelationshipGoal::Relationship],
            ..Preferences::default()
        };
        let aligned = Profile {
            relationship_goal: Some(RelationshipGoal::Relationship),
            ..blank_profile("a")
        };
        let premium_only = Profile {
            relationship_goal: Some(RelationshipGoal::Casual),
            is_premium: true,
            ..blank_profile("b")
        };
        let aligned_score = compatibility_score(&ScoreInputs {
            candidate: &aligned,
            preferences: &prefs,
            distance_km: None,
        });
        let premium_score = compatibility_score(&ScoreInputs {
            candidate: &premium_only,
            preferences: &prefs,
            distance_km: None,
        });
        assert!(aligned_score > premium_score);
    }

    #[test]
    fn partial_language_overlap_is_fractional() {
        let candidate = Profile {
            languages: vec!["en".into()],
            ..blank_profile("c")
        };
        let prefs = Preferences {
            languages: vec!["en".into(), "de".into()],
            ..Preferences::default()
        };
        // Single active criterion at 0.5 overlap: round(0.5 * 100).
        let score = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: None,
        });
        assert_eq!(score, 50);
    }

    #[test]
    fn lifestyle_uses_only_comparable_sub_factors() {
        let candidate = Profile {
            lifestyle: Lifestyle {
                smoking: Some("never".into()),
                drinking: Some("socially".into()),
                exercise: None,
                diet: None,
            },
            ..blank_profile("c")
        };
        let prefs = Preferences {
            lifestyle: Lifestyle {
                smoking: Some("never".into()),
                drinking: Some("never".into()),
                exercise: Some("often".into()),
                diet: None,
            },
            ..Preferences::default()
        };
        // Two comparable sub-factors, one matching.
        let score = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: None,
        });
        assert_eq!(score, 50);
    }

    #[test]
    fn education_out_of_set_scores_zero_not_skipped() {
        let candidate = Profile {
            education: Some(EducationLevel::HighSchool),
            interests: vec!["art".into()],
            ..blank_profile("c")
        };
        let prefs = Preferences {
            education_levels: vec![EducationLevel::Masters],
            interests: vec!["art".into()],
            ..Preferences::default()
        };
        // interests 1.0 * 3.0 + education 0.0 * 2.0 over 5.0 = 60.
        let score = compatibility_score(&ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: None,
        });
        assert_eq!(score, 60);
    }

    #[test]
    fn scoring_is_deterministic() {
        let candidate = Profile {
            interests: vec!["hiking".into()],
            is_premium: true,
            ..blank_profile("c")
        };
        let prefs = Preferences {
            interests: vec!["hiking".into(), "music".into()],
            ..Preferences::default()
        };
        let inputs = ScoreInputs {
            candidate: &candidate,
            preferences: &prefs,
            distance_km: Some(12.5),
        };
        assert_eq!(compatibility_score(&inputs), compatibility_score(&inputs));
    }
}
