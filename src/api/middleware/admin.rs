//! Admin token gate
//!
//! Requests must carry `X-Admin-Token` equal to `admin.token`, compared in
//! constant time. With no token configured the whole scope answers 404.

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::api::helpers::error_from_leanurls;
use crate::errors::LeanurlsError;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

#[derive(Clone)]
pub struct AdminAuth {
    token: Arc<str>,
}

impl AdminAuth {
    pub fn new(token: &str) -> Self {
        Self {
            token: Arc::from(token),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            token: self.token.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    token: Arc<str>,
}

impl<S> AdminAuthMiddleware<S> {
    fn token_matches(expected: &str, presented: Option<&str>) -> bool {
        match presented {
            Some(presented) => bool::from(expected.as_bytes().ct_eq(presented.as_bytes())),
            None => false,
        }
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let token = self.token.clone();

        Box::pin(async move {
            if token.is_empty() {
                debug!("Admin token not configured - returning 404");
                return Ok(req.into_response(
                    HttpResponse::NotFound()
                        .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                        .body("Not Found")
                        .map_into_right_body(),
                ));
            }

            let presented = req
                .headers()
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|h| h.to_str().ok());

            if Self::token_matches(&token, presented) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!("Admin authentication failed for {}", req.path());
            let response =
                error_from_leanurls(&LeanurlsError::forbidden("Admin token required"))
                    .map_into_right_body();
            Ok(req.into_response(response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_comparison() {
        type M = AdminAuthMiddleware<()>;
        assert!(M::token_matches("s3cret", Some("s3cret")));
        assert!(!M::token_matches("s3cret", Some("s3cre")));
        assert!(!M::token_matches("s3cret", Some("S3CRET")));
        assert!(!M::token_matches("s3cret", None));
    }
}
