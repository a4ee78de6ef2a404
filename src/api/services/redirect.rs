use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::api::error_code::ErrorCode;
use crate::api::helpers::{error_from_leanurls, error_response, success_response};
use crate::services::LinkService;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Full short URL or bare alias
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub url: String,
}

pub struct RedirectService;

impl RedirectService {
    /// `GET /{alias}`: 307 to the destination, recording a hit.
    pub async fn handle_redirect(
        path: web::Path<String>,
        links: web::Data<LinkService>,
    ) -> HttpResponse {
        let alias = path.into_inner();

        match links.resolve(&alias).await {
            Ok(Some(url)) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                .insert_header(("Location", url))
                .finish(),
            Ok(None) => {
                debug!("Redirect target not found: {}", alias);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Redirect lookup for '{}' failed: {}", alias, e);
                HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
                    .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                    .body("Internal Server Error")
            }
        }
    }

    /// `GET /api/v1/resolve?url=...`: JSON variant for clients that follow
    /// the redirect themselves.
    pub async fn resolve(
        query: web::Query<ResolveQuery>,
        links: web::Data<LinkService>,
    ) -> HttpResponse {
        match links.resolve(&query.url).await {
            Ok(Some(url)) => success_response(ResolveResponse { url }),
            Ok(None) => error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::LinkNotFound,
                "Link not found",
            ),
            Err(e) => error_from_leanurls(&e),
        }
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{alias}", web::get().to(RedirectService::handle_redirect))
        .route("/{alias}", web::head().to(RedirectService::handle_redirect))
}
