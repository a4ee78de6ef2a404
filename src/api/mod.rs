//! HTTP layer: response envelope, authentication middleware and routes

pub mod error_code;
pub mod helpers;
pub mod middleware;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

use crate::auth::TokenVerifier;
use middleware::{AdminAuth, BearerAuth};
use services::{
    RedirectService, admin_users_routes, analytics_routes, health_routes, links_routes,
    redirect_routes, users_routes,
};

pub const API_PREFIX: &str = "/api/v1";
pub const ADMIN_PREFIX: &str = "/admin/v1";

/// Everything the route table needs besides the `web::Data` services.
#[derive(Clone)]
pub struct RouteSettings {
    pub verifier: Arc<dyn TokenVerifier>,
    pub auth_timeout: Duration,
    pub admin_token: String,
}

/// Registers every route. Order matters: the public resolve endpoint sits in
/// front of the authenticated API scope and the catch-all redirect goes last.
pub fn configure_routes(cfg: &mut web::ServiceConfig, settings: &RouteSettings) {
    cfg.app_data(web::JsonConfig::default().error_handler(helpers::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(helpers::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(helpers::path_error_handler))
        .service(health_routes())
        .service(
            web::resource(format!("{}/resolve", API_PREFIX))
                .route(web::get().to(RedirectService::resolve)),
        )
        .service(
            web::scope(API_PREFIX)
                .wrap(BearerAuth::new(
                    settings.verifier.clone(),
                    settings.auth_timeout,
                ))
                .service(links_routes())
                .service(analytics_routes())
                .service(users_routes()),
        )
        .service(
            web::scope(ADMIN_PREFIX)
                .wrap(AdminAuth::new(&settings.admin_token))
                .service(admin_users_routes()),
        )
        .service(redirect_routes());
}
