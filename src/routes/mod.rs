// Route exports
pub mod filters;
pub mod interactions;
pub mod ranking;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(ranking::configure)
            .configure(filters::configure)
            .configure(interactions::configure),
    );
}
