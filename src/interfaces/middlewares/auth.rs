use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, HttpRequest,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    entities::token::{AuthFailure, Claims},
    errors::AuthError,
    AppState,
};

/// Resolves the caller's session on every request. It never rejects: the
/// outcome lands in request extensions as `Claims` or `AuthFailure`, and the
/// extractors decide what a route requires.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in auth middleware");
                return service.call(req).await;
            };

            if let Some(token) = extract_token(req.request(), &state.config.auth_cookie_name) {
                match resolve_claims(&state, &token).await {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims);
                    }
                    Err(failure) => {
                        tracing::debug!(?failure, path = req.path(), "Rejected token");
                        req.extensions_mut().insert(failure);
                    }
                }
            }

            service.call(req).await
        })
    }
}

async fn resolve_claims(state: &AppState, token: &str) -> Result<Claims, AuthFailure> {
    if let Some(redis) = &state.redis {
        match redis.is_token_revoked(token).await {
            Ok(true) => return Err(AuthFailure::Revoked),
            Ok(false) => {}
            Err(e) => tracing::warn!("Token denylist unavailable: {}", e),
        }
    }

    state.auth_handler.jwt.decode_jwt(token).map_err(|e| match e {
        AuthError::TokenExpired => AuthFailure::Expired,
        _ => AuthFailure::Invalid,
    })
}

/// Bearer header first, then the auth cookie.
pub fn extract_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let mut parts = header.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                    Some(token.to_string())
                }
                _ => None,
            }
        });

    bearer.or_else(|| {
        req.cookie(cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    })
}
