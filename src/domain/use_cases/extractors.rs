use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    entities::token::{AuthFailure, Claims},
    errors::AuthError,
};

fn rejection(req: &HttpRequest) -> AuthError {
    match req.extensions().get::<AuthFailure>() {
        Some(AuthFailure::Expired) => AuthError::TokenExpired,
        Some(AuthFailure::Revoked) => AuthError::TokenRevoked,
        Some(AuthFailure::Invalid) => AuthError::InvalidToken,
        None => AuthError::MissingCredentials,
    }
}

/// Extractor for authenticated claims, ensuring the user is authenticated.
/// Returns 401 if the user is not authenticated.
/// Usage: Add `claims: AuthClaims` as a parameter to your handler function.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        match claims {
            Some(claims) => ready(Ok(AuthClaims(claims))),
            None => ready(Err(rejection(req).into())),
        }
    }
}

/// Extractor for admin claims, ensuring the user has admin privileges.
/// Returns 403 if the user is not an admin.
/// Returns 401 if the user is not authenticated.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        match claims {
            Some(claims) if claims.is_admin() => ready(Ok(AdminClaims(claims))),
            Some(_) => ready(Err(AuthError::Forbidden("Admin access required".into()).into())),
            None => ready(Err(rejection(req).into())),
        }
    }
}

/// Claims when a valid token was presented, nothing otherwise. Public
/// endpoints use it to widen what admins can see.
#[derive(Debug)]
pub struct OptionalClaims(pub Option<Claims>);

impl OptionalClaims {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(Claims::is_admin)
    }
}

impl FromRequest for OptionalClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(OptionalClaims(req.extensions().get::<Claims>().cloned())))
    }
}
