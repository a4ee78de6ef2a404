//! `/api/v1/users/me` and the admin listing

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::api::error_code::ErrorCode;
use crate::api::helpers::{api_result, error_from_leanurls, error_response, success_response};
use crate::auth::Identity;
use crate::services::{UpdateFieldRequest, UpsertUserRequest, UserService};

pub async fn get_me(identity: Identity, users: web::Data<UserService>) -> HttpResponse {
    match users.find_me(&identity).await {
        Ok(Some(user)) => success_response(user),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::UserNotFound,
            "User not found",
        ),
        Err(e) => error_from_leanurls(&e),
    }
}

pub async fn upsert_me(
    identity: Identity,
    body: web::Json<UpsertUserRequest>,
    users: web::Data<UserService>,
) -> HttpResponse {
    api_result(users.upsert(&identity, body.into_inner()).await)
}

pub async fn update_me(
    identity: Identity,
    body: web::Json<UpsertUserRequest>,
    users: web::Data<UserService>,
) -> HttpResponse {
    api_result(users.update_profile(&identity, body.into_inner()).await)
}

pub async fn update_my_field(
    identity: Identity,
    body: web::Json<UpdateFieldRequest>,
    users: web::Data<UserService>,
) -> HttpResponse {
    let req = body.into_inner();
    api_result(users.update_field(&identity, &req.field, &req.value).await)
}

pub async fn delete_me(identity: Identity, users: web::Data<UserService>) -> HttpResponse {
    api_result(users.delete(&identity).await)
}

pub async fn list_users(users: web::Data<UserService>) -> HttpResponse {
    api_result(users.list_all().await)
}

pub fn users_routes() -> actix_web::Scope {
    web::scope("/users").service(
        web::resource("/me")
            .route(web::get().to(get_me))
            .route(web::post().to(upsert_me))
            .route(web::put().to(update_me))
            .route(web::patch().to(update_my_field))
            .route(web::delete().to(delete_me)),
    )
}

/// Routes mounted under the admin scope.
pub fn admin_users_routes() -> actix_web::Scope {
    web::scope("/users").route("", web::get().to(list_users))
}
