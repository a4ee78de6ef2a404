//! Bearer token authentication for the user API
//!
//! Verifies the `Authorization: Bearer` token and stores the resulting
//! [`Identity`] in the request extensions; handlers take it as an extractor.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, trace};

use crate::api::helpers::error_from_leanurls;
use crate::auth::{Identity, TokenVerifier, bearer_token, verify_with_timeout};
use crate::errors::LeanurlsError;

#[derive(Clone)]
pub struct BearerAuth {
    verifier: Arc<dyn TokenVerifier>,
    timeout: Duration,
}

impl BearerAuth {
    pub fn new(verifier: Arc<dyn TokenVerifier>, timeout: Duration) -> Self {
        Self { verifier, timeout }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
            timeout: self.timeout,
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn TokenVerifier>,
    timeout: Duration,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
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
        let verifier = self.verifier.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            // CORS 预检请求不携带凭证
            if req.method() == Method::OPTIONS {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string);

            let verified = match bearer_token(header.as_deref()) {
                Ok(token) => verify_with_timeout(verifier.as_ref(), token, timeout).await,
                Err(e) => Err(e),
            };

            match verified {
                Ok(identity) => {
                    trace!("Authenticated request from {}", identity.subject);
                    req.extensions_mut().insert(identity);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(e) => {
                    debug!("Rejected {} {}: {}", req.method(), req.path(), e);
                    let response = error_from_leanurls(&e).map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req
            .extensions()
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| LeanurlsError::unauthenticated("Authentication required").into());
        ready(identity)
    }
}
