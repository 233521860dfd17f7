use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, SavedFilter, SavedFiltersResponse, UpsertFilterRequest};
use crate::routes::ranking::AppState;
use crate::services::{CacheKey, PostgresError};

/// Configure saved filter routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/filters", web::get().to(list_filters))
        .route("/filters", web::post().to(upsert_filter))
        .route("/filters/{filter_id}", web::delete().to(delete_filter));
}

#[derive(Debug, serde::Deserialize)]
struct OwnerQuery {
    #[serde(rename = "userId")]
    user_id: String,
}

/// List saved filters for a user
///
/// GET /api/v1/filters?userId={userId}
async fn list_filters(
    state: web::Data<AppState>,
    query: web::Query<OwnerQuery>,
) -> impl Responder {
    let user_id = &query.user_id;
    let cache_key = CacheKey::saved_filters(user_id);

    if let Ok(filters) = state.cache.get::<Vec<SavedFilter>>(&cache_key).await {
        return HttpResponse::Ok().json(SavedFiltersResponse { filters });
    }

    match state.postgres.list_saved_filters(user_id).await {
        Ok(filters) => {
            if let Err(e) = state.cache.set(&cache_key, &filters).await {
                tracing::warn!("Failed to cache filters for {}: {}", user_id, e);
            }
            HttpResponse::Ok().json(SavedFiltersResponse { filters })
        }
        Err(e) => {
            tracing::error!("Failed to list filters for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list filters".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Create or update a saved filter
///
/// POST /api/v1/filters
///
/// Setting `isDefault` atomically clears any previous default for the
/// same user.
async fn upsert_filter(
    state: web::Data<AppState>,
    req: web::Json<UpsertFilterRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // The engine only persists preference payloads it would accept at
    // ranking time.
    if let Err(e) = req.preferences.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("invalid_{}", e.field.replace('.', "_")),
            message: e.to_string(),
            status_code: 400,
        });
    }

    match state.postgres.upsert_saved_filter(&req).await {
        Ok(filter) => {
            invalidate_filters_cache(&state, &req.user_id).await;
            HttpResponse::Ok().json(filter)
        }
        Err(PostgresError::NotFound(message)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Filter not found".to_string(),
            message,
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to upsert filter for {}: {}", req.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to save filter".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Delete a saved filter owned by the user
///
/// DELETE /api/v1/filters/{filterId}?userId={userId}
async fn delete_filter(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<OwnerQuery>,
) -> impl Responder {
    let filter_id = path.into_inner();
    let user_id = &query.user_id;

    match state.postgres.delete_saved_filter(user_id, &filter_id).await {
        Ok(true) => {
            invalidate_filters_cache(&state, user_id).await;
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "filterId": filter_id,
            }))
        }
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Filter not found".to_string(),
            message: format!("no filter {} owned by {}", filter_id, user_id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to delete filter {}: {}", filter_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to delete filter".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

async fn invalidate_filters_cache(state: &AppState, user_id: &str) {
    if let Err(e) = state.cache.delete(&CacheKey::saved_filters(user_id)).await {
        tracing::warn!("Failed to invalidate filter cache for {}: {}", user_id, e);
    }
}
