//! `/api/v1/links`

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::helpers::api_result;
use crate::auth::Identity;
use crate::config::get_config;
use crate::services::{CreateLinkRequest, LinkService};
use crate::storage::Link;

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub url: String,
    pub alias: String,
    /// Present when `server.public_base_url` is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    fn from_link(link: Link, base_url: Option<&str>) -> Self {
        let short_url = base_url.map(|base| format!("{}/{}", base.trim_end_matches('/'), link.alias));
        Self {
            id: link.id,
            url: link.url,
            alias: link.alias,
            short_url,
            created_at: link.created_at,
        }
    }
}

pub async fn post_link(
    identity: Identity,
    body: web::Json<CreateLinkRequest>,
    links: web::Data<LinkService>,
) -> HttpResponse {
    let config = get_config();
    let base_url = config.server.public_base_url.as_deref();

    let result = links
        .create_link(&identity, body.into_inner())
        .await
        .map(|link| LinkResponse::from_link(link, base_url));
    api_result(result)
}

pub async fn delete_link(
    identity: Identity,
    path: web::Path<i64>,
    links: web::Data<LinkService>,
) -> HttpResponse {
    api_result(links.delete_owned(&identity, path.into_inner()).await)
}

pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::post().to(post_link))
        .route("/{id}", web::delete().to(delete_link))
}
