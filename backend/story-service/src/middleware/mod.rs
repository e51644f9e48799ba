/// HTTP middleware for story-service
///
/// `Authenticate` wraps every bearer-protected resource: it resolves the
/// caller through the shared `AuthVerifier` and stores the identity in the
/// request extensions, where handlers pick it up via the `CallerIdentity`
/// extractor. A rejected request never reaches its handler.
use crate::auth::{bearer_token, AuthVerifier, CallerIdentity};
use crate::error::AppError;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Actix middleware that requires a verified bearer credential.
pub struct Authenticate;

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let verifier = req
                .app_data::<web::Data<dyn AuthVerifier>>()
                .cloned()
                .ok_or_else(|| {
                    tracing::error!("AuthVerifier missing from app data");
                    AppError::Internal("authentication unavailable".to_string())
                })?;

            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());

            let identity = bearer_token(header)
                .and_then(|token| verifier.verify(token))
                .map_err(|e| {
                    tracing::warn!(
                        path = %req.path(),
                        error = %e,
                        "Rejected unauthenticated request"
                    );
                    AppError::Unauthorized(e.to_string())
                })?;

            req.extensions_mut().insert(identity);

            service.call(req).await
        })
    }
}

impl FromRequest for CallerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CallerIdentity>()
                .cloned()
                .ok_or_else(|| {
                    AppError::Unauthorized("caller identity missing".to_string()).into()
                }),
        )
    }
}
