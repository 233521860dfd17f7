use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use validator::Validate;

use crate::config::RankingSettings;
use crate::core::{boost_multipliers, RankingOptions, RankingPipeline, Refinements};
use crate::models::{
    ErrorResponse, HealthResponse, Pagination, Preferences, Profile, ProfileSummary, RankedEntry,
    RankingQuery, RankingResponse, SearchRequest, SearchResponse, SortBy, ValidationError,
};
use crate::services::{CacheKey, CacheManager, PostgresClient, ProfileStoreClient, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProfileStoreClient>,
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub pipeline: RankingPipeline,
    pub ranking: RankingSettings,
}

/// Configure ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ranking", web::get().to(get_ranking))
        .route("/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);
    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

fn validation_response(err: &ValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: format!("invalid_{}", err.field.replace('.', "_")),
        message: err.to_string(),
        status_code: 400,
    })
}

fn collaborator_response(context: &str, err: &StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    if matches!(err, StoreError::NotFound(_)) {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: err.to_string(),
            status_code: 404,
        });
    }
    HttpResponse::BadGateway().json(ErrorResponse {
        error: "profile_service_unavailable".to_string(),
        message: format!("{}: {}", context, err),
        status_code: 502,
    })
}

/// Requester profile snapshot with a short cache in front; location
/// and preference data tolerate a few minutes of staleness.
async fn load_requester(state: &AppState, user_id: &str) -> Result<Profile, StoreError> {
    let key = CacheKey::profile(user_id);
    if let Ok(profile) = state.cache.get::<Profile>(&key).await {
        return Ok(profile);
    }

    let profile = state.store.get_profile(user_id).await?;
    if let Err(e) = state.cache.set(&key, &profile).await {
        tracing::warn!("Failed to cache profile {}: {}", user_id, e);
    }
    Ok(profile)
}

/// Ids the requester already interacted with. A degraded interaction
/// store yields an unfiltered (but still valid) ranking, matching the
/// platform's availability preference for this read.
async fn load_excluded(state: &AppState, user_id: &str) -> HashSet<String> {
    match state.postgres.get_excluded_ids(user_id).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(
                "Failed to fetch exclusions for {}, proceeding without: {}",
                user_id,
                e
            );
            HashSet::new()
        }
    }
}

/// Ranking endpoint
///
/// GET /api/v1/ranking?requesterId={id}&limit=20
///
/// Preferences come from the requester's default saved filter when one
/// exists, otherwise platform defaults apply.
async fn get_ranking(
    state: web::Data<AppState>,
    query: web::Query<RankingQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let requester_id = &query.requester_id;
    let limit = query.limit.clamp(1, state.ranking.max_limit) as u32;

    tracing::info!("Ranking request for user: {}, limit: {}", requester_id, limit);

    let requester = match load_requester(&state, requester_id).await {
        Ok(profile) => profile,
        Err(e) => return collaborator_response("failed to fetch requester profile", &e),
    };

    let preferences = match state.postgres.get_default_filter(requester_id).await {
        Ok(Some(filter)) => filter.preferences,
        Ok(None) => Preferences::default(),
        Err(e) => {
            tracing::warn!("Failed to load default filter for {}: {}", requester_id, e);
            Preferences::default()
        }
    };

    if let Err(e) = preferences.validate() {
        // A stored filter can only become invalid through a bad write
        // elsewhere; reject rather than rank on garbage.
        return validation_response(&e);
    }

    let options = RankingOptions {
        sort_by: SortBy::Relevance,
        page: 1,
        page_size: limit,
        apply_hard_distance_filter: true,
        refinements: Refinements::default(),
    };

    match run_ranking(&state, &requester, &preferences, &options).await {
        Ok(page) => {
            let today = Utc::now().date_naive();
            let matches: Vec<RankedEntry> = page
                .results
                .iter()
                .map(|r| RankedEntry {
                    profile: ProfileSummary::from_profile(&r.profile, today),
                    match_percentage: r.raw_score,
                    distance_km: r.distance_km,
                })
                .collect();

            tracing::info!(
                "Returning {} of {} ranked candidates for {}",
                matches.len(),
                page.total_results,
                requester_id
            );

            HttpResponse::Ok().json(RankingResponse {
                matches,
                total_results: page.total_results,
            })
        }
        Err(response) => response,
    }
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// The body carries explicit preferences plus hard refinements
/// (photos, premium, recency, keyword) and a sort mode.
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let preferences = req.to_preferences();
    if let Err(e) = preferences.validate() {
        return validation_response(&e);
    }

    let requester = match load_requester(&state, &req.user_id).await {
        Ok(profile) => profile,
        Err(e) => return collaborator_response("failed to fetch requester profile", &e),
    };

    let now = Utc::now();
    let page_size = (req.limit as u16).clamp(1, state.ranking.max_limit) as u32;
    let options = RankingOptions {
        sort_by: SortBy::parse(req.sort_by.as_deref()),
        page: req.page.max(1),
        page_size,
        apply_hard_distance_filter: true,
        refinements: Refinements {
            has_photos: req.has_photos,
            is_premium: req.is_premium,
            active_since: req
                .last_active_days
                .map(|days| now - chrono::Duration::days(days as i64)),
            keyword: req.keyword.as_deref(),
        },
    };

    match run_ranking(&state, &requester, &preferences, &options).await {
        Ok(page) => {
            let today = now.date_naive();
            let results: Vec<RankedEntry> = page
                .results
                .iter()
                .map(|r| RankedEntry {
                    profile: ProfileSummary::from_profile(&r.profile, today),
                    match_percentage: r.raw_score,
                    distance_km: r.distance_km,
                })
                .collect();

            HttpResponse::Ok().json(SearchResponse {
                results,
                pagination: Pagination {
                    page: page.page,
                    total_pages: page.total_pages,
                    total_results: page.total_results,
                    has_more: page.has_more,
                },
            })
        }
        Err(response) => response,
    }
}

/// Shared fetch-and-rank path: candidate slice and boost snapshot are
/// collaborator reads whose failure aborts the request; the ranking
/// itself is pure CPU work.
async fn run_ranking(
    state: &AppState,
    requester: &Profile,
    preferences: &Preferences,
    options: &RankingOptions<'_>,
) -> Result<crate::core::RankedPage, HttpResponse> {
    let excluded = load_excluded(state, &requester.id).await;
    let exclude_list: Vec<String> = excluded.iter().cloned().collect();

    // Over-fetch so hard filters have headroom to fill the page.
    let factor = state.ranking.candidate_fetch_factor.max(1) as usize;
    let wanted = (options.page as usize)
        .saturating_mul(options.page_size as usize)
        .saturating_mul(factor)
        .min(500);

    let candidates = state
        .store
        .fetch_candidates(requester, preferences, &exclude_list, wanted)
        .await
        .map_err(|e| collaborator_response("failed to fetch candidate slice", &e))?;

    tracing::debug!("Fetched {} candidates for {}", candidates.len(), requester.id);

    let candidate_ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
    let expiries = state
        .store
        .fetch_boost_state(&candidate_ids)
        .await
        .map_err(|e| collaborator_response("failed to fetch boost state", &e))?;

    let now = Utc::now();
    let boosts = boost_multipliers(&expiries, now);

    Ok(state
        .pipeline
        .rank(requester, preferences, candidates, &excluded, &boosts, now, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_response_shape() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(response.status, "healthy");
    }
}
