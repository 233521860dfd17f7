use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, RecordInteractionRequest, RecordInteractionResponse};
use crate::routes::ranking::AppState;
use crate::services::InteractionKind;

/// Configure interaction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/interactions", web::post().to(record_interaction))
        .route("/interactions/seen", web::get().to(get_seen));
}

/// Record a like/dislike/view interaction
///
/// POST /api/v1/interactions
///
/// Every recorded interaction removes the target from the requester's
/// future rankings.
async fn record_interaction(
    state: web::Data<AppState>,
    req: web::Json<RecordInteractionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let Some(kind) = InteractionKind::parse(&req.kind) else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid interaction kind".to_string(),
            message: "kind must be one of: viewed, liked, disliked, matched".to_string(),
            status_code: 400,
        });
    };

    match state
        .postgres
        .record_interaction(&req.user_id, &req.target_user_id, kind)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(RecordInteractionResponse {
            success: true,
            interaction_id: uuid::Uuid::new_v4().to_string(),
        }),
        Err(e) => {
            tracing::error!("Failed to record interaction: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record interaction".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct SeenQuery {
    #[serde(rename = "userId")]
    user_id: String,
}

/// List candidate ids excluded for a user
///
/// GET /api/v1/interactions/seen?userId={userId}
async fn get_seen(state: web::Data<AppState>, query: web::Query<SeenQuery>) -> impl Responder {
    match state.postgres.get_excluded_ids(&query.user_id).await {
        Ok(ids) => {
            let count = ids.len();
            HttpResponse::Ok().json(serde_json::json!({
                "userId": query.user_id,
                "excluded": ids,
                "count": count,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to fetch exclusions for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch exclusions".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
