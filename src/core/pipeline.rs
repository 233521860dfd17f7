use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::core::{
    boost::apply_boost,
    filters::{is_eligible, FilterContext, Refinements},
    geo::haversine_km,
    scoring::{compatibility_score, ScoreInputs},
};
use crate::models::{Preferences, Profile, ScoredCandidate, SortBy};

/// Per-call knobs for one ranking run.
pub struct RankingOptions<'a> {
    pub sort_by: SortBy,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// The hard distance cutoff and the soft distance score are
    /// independent stages; the soft score always applies.
    pub apply_hard_distance_filter: bool,
    pub refinements: Refinements<'a>,
}

impl Default for RankingOptions<'_> {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Relevance,
            page: 1,
            page_size: 20,
            apply_hard_distance_filter: true,
            refinements: Refinements::default(),
        }
    }
}

/// One page of a ranking, with pagination computed against the
/// filtered pre-page count.
#[derive(Debug)]
pub struct RankedPage {
    pub results: Vec<ScoredCandidate>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: usize,
    pub has_more: bool,
}

/// Ranking orchestrator: filter, score, boost, sort, paginate.
///
/// Stateless and re-entrant. Each call is a side-effect-free
/// computation over borrowed snapshots of profile and boost data; the
/// collaborator reads happen before this is invoked.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingPipeline;

impl RankingPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn rank(
        &self,
        requester: &Profile,
        preferences: &Preferences,
        candidates: Vec<Profile>,
        excluded: &HashSet<String>,
        boosts: &HashMap<String, f64>,
        now: DateTime<Utc>,
        options: &RankingOptions<'_>,
    ) -> RankedPage {
        let ctx = FilterContext {
            requester_id: &requester.id,
            preferences,
            excluded,
            today: now.date_naive(),
            apply_hard_distance_filter: options.apply_hard_distance_filter,
            refinements: options.refinements,
        };

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter_map(|candidate| {
                if !coordinates_sane(&candidate) {
                    tracing::warn!(
                        "Skipping candidate {} with malformed coordinates",
                        candidate.id
                    );
                    return None;
                }

                let distance_km = match (&requester.location, &candidate.location) {
                    (Some(a), Some(b)) => Some(haversine_km(a, b)),
                    _ => None,
                };

                if !is_eligible(&candidate, distance_km, &ctx) {
                    return None;
                }

                let raw_score = compatibility_score(&ScoreInputs {
                    candidate: &candidate,
                    preferences,
                    distance_km,
                });

                let final_score = match boosts.get(&candidate.id) {
                    Some(multiplier) => apply_boost(raw_score, *multiplier),
                    None => raw_score,
                };

                Some(ScoredCandidate {
                    profile: candidate,
                    raw_score,
                    distance_km,
                    final_score,
                })
            })
            .collect();

        sort_candidates(&mut scored, options.sort_by);

        paginate(scored, options.page, options.page_size)
    }
}

fn coordinates_sane(profile: &Profile) -> bool {
    match &profile.location {
        Some(c) => {
            c.latitude.is_finite()
                && c.longitude.is_finite()
                && c.latitude.abs() <= 90.0
                && c.longitude.abs() <= 180.0
        }
        None => true,
    }
}

/// Descending/ascending primary key per sort mode, always with the
/// candidate id as the secondary key so that equal-score pages stay
/// stable across repeated identical requests.
fn sort_candidates(scored: &mut [ScoredCandidate], sort_by: SortBy) {
    scored.sort_by(|a, b| {
        let primary = match sort_by {
            SortBy::Relevance | SortBy::MatchPercentage => {
                b.final_score.cmp(&a.final_score)
            }
            SortBy::Newest => cmp_option_desc(&b.profile.created_at, &a.profile.created_at),
            SortBy::LastActive => {
                cmp_option_desc(&b.profile.last_active_at, &a.profile.last_active_at)
            }
            SortBy::Likes => b.profile.likes_count.cmp(&a.profile.likes_count),
            SortBy::Distance => cmp_distance(a.distance_km, b.distance_km),
        };
        primary.then_with(|| a.profile.id.cmp(&b.profile.id))
    });
}

/// Descending with `None` ordered last.
fn cmp_option_desc<T: Ord>(b: &Option<T>, a: &Option<T>) -> Ordering {
    match (b, a) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending with unknown distances ordered last.
fn cmp_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn paginate(scored: Vec<ScoredCandidate>, page: u32, page_size: u32) -> RankedPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_results = scored.len();
    let total_pages = total_results.div_ceil(page_size as usize) as u32;
    let has_more = (page as usize) * (page_size as usize) < total_results;

    let offset = (page as usize - 1) * page_size as usize;
    let results = scored
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();

    RankedPage {
        results,
        page,
        total_pages,
        total_results,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Lifestyle};
    use chrono::Duration;

    fn profile(id: &str) -> Profile {
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

    fn rank_simple(candidates: Vec<Profile>, options: &RankingOptions<'_>) -> RankedPage {
        let pipeline = RankingPipeline::new();
        pipeline.rank(
            &profile("me"),
            &Preferences::default(),
            candidates,
            &HashSet::new(),
            &HashMap::new(),
            Utc::now(),
            options,
        )
    }

    #[test]
    fn requester_never_appears_in_results() {
        let page = rank_simple(
            vec![profile("me"), profile("a"), profile("b")],
            &RankingOptions::default(),
        );
        assert_eq!(page.total_results, 2);
        assert!(page.results.iter().all(|r| r.profile.id != "me"));
    }

    #[test]
    fn equal_scores_break_ties_by_id_ascending() {
        let page = rank_simple(
            vec![profile("c"), profile("a"), profile("b")],
            &RankingOptions::default(),
        );
        let ids: Vec<&str> = page.results.iter().map(|r| r.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn identical_calls_produce_identical_pages() {
        let make = || {
            rank_simple(
                vec![profile("x"), profile("m"), profile("b")],
                &RankingOptions::default(),
            )
        };
        let first: Vec<String> = make().results.iter().map(|r| r.profile.id.clone()).collect();
        let second: Vec<String> = make().results.iter().map(|r| r.profile.id.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn boost_reorders_but_keeps_scores_in_range() {
        let pipeline = RankingPipeline::new();
        let requester = profile("me");
        let prefs = Preferences {
            interests: vec!["hiking".into(), "music".into()],
            ..Preferences::default()
        };
        // Both share one of two interests: raw score 50 each. The id
        // ordering alone would put "aaa" first.
        let mut plain = profile("aaa");
        plain.interests = vec!["hiking".into()];
        let mut boosted = profile("zzz");
        boosted.interests = vec!["hiking".into()];

        let boosts = HashMap::from([("zzz".to_string(), 0.8)]);
        let page = pipeline.rank(
            &requester,
            &prefs,
            vec![plain, boosted],
            &HashSet::new(),
            &boosts,
            Utc::now(),
            &RankingOptions::default(),
        );

        assert_eq!(page.results[0].profile.id, "zzz");
        assert_eq!(page.results[0].raw_score, 50);
        assert_eq!(page.results[0].final_score, 90);
        for entry in &page.results {
            assert!(entry.final_score <= 100);
            assert!(entry.raw_score <= 100);
        }
    }

    #[test]
    fn pagination_counts_the_filtered_pool_not_the_raw_pool() {
        let mut candidates: Vec<Profile> = (0..25).map(|i| profile(&format!("c{:02}", i))).collect();
        // Raw pool is larger than the eligible pool.
        candidates.push(profile("me"));

        let options = RankingOptions {
            page: 2,
            page_size: 10,
            ..RankingOptions::default()
        };
        let page = rank_simple(candidates, &options);

        assert_eq!(page.total_results, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 10);
        assert!(page.has_more);

        let options = RankingOptions {
            page: 3,
            page_size: 10,
            ..RankingOptions::default()
        };
        let last = rank_simple((0..25).map(|i| profile(&format!("c{:02}", i))).collect(), &options);
        assert_eq!(last.results.len(), 5);
        assert!(!last.has_more);
    }

    #[test]
    fn has_more_matches_the_pagination_invariant() {
        for (page_no, page_size, total) in [(1u32, 10u32, 25usize), (3, 10, 25), (1, 50, 25), (2, 25, 25)] {
            let candidates = (0..total).map(|i| profile(&format!("c{:03}", i))).collect();
            let options = RankingOptions {
                page: page_no,
                page_size,
                ..RankingOptions::default()
            };
            let ranked = rank_simple(candidates, &options);
            assert_eq!(
                ranked.has_more,
                (page_no as usize) * (page_size as usize) < total
            );
        }
    }

    #[test]
    fn empty_pool_is_a_valid_empty_page() {
        let page = rank_simple(vec![], &RankingOptions::default());
        assert_eq!(page.total_results, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.results.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn malformed_coordinates_skip_one_candidate_not_the_page() {
        let mut bad = profile("bad");
        bad.location = Some(Coordinates {
            latitude: f64::NAN,
            longitude: 13.4,
        });
        let page = rank_simple(vec![bad, profile("good")], &RankingOptions::default());
        assert_eq!(page.total_results, 1);
        assert_eq!(page.results[0].profile.id, "good");
    }

    #[test]
    fn distance_sort_orders_ascending_with_unknown_last() {
        let pipeline = RankingPipeline::new();
        let mut requester = profile("me");
        requester.location = Some(Coordinates {
            latitude: 52.52,
            longitude: 13.405,
        });

        let mut near = profile("near");
        near.location = Some(Coordinates {
            latitude: 52.53,
            longitude: 13.41,
        });
        let mut far = profile("far");
        far.location = Some(Coordinates {
            latitude: 52.75,
            longitude: 13.6,
        });
        let nowhere = profile("nowhere");

        let options = RankingOptions {
            sort_by: SortBy::Distance,
            ..RankingOptions::default()
        };
        let page = pipeline.rank(
            &requester,
            &Preferences::default(),
            vec![nowhere, far, near],
            &HashSet::new(),
            &HashMap::new(),
            Utc::now(),
            &options,
        );
        let ids: Vec<&str> = page.results.iter().map(|r| r.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far", "nowhere"]);
    }

    #[test]
    fn newest_sort_uses_created_at_descending() {
        let now = Utc::now();
        let mut old = profile("old");
        old.created_at = Some(now - Duration::days(30));
        let mut fresh = profile("fresh");
        fresh.created_at = Some(now - Duration::days(1));
        let undated = profile("undated");

        let options = RankingOptions {
            sort_by: SortBy::Newest,
            ..RankingOptions::default()
        };
        let page = rank_simple(vec![old, undated, fresh], &options);
        let ids: Vec<&str> = page.results.iter().map(|r| r.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "old", "undated"]);
    }
}
