use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};

use crate::entities::token::Claims;
use crate::entities::user::User;
use crate::errors::AuthError;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone, Debug)]
pub struct JwtService {
    keys: JwtKeys,
    expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_expiration(config, config.jwt_expiration_minutes)
    }

    /// Same keys with a custom lifetime; negative values mint expired tokens.
    pub fn with_expiration(config: &AppConfig, minutes: i64) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            expiration: Duration::minutes(minutes),
        }
    }

    /// Token lifetime, also used as the cookie Max-Age.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    pub fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + self.expiration).timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(|e| {
            tracing::warn!("Failed to create JWT: {}", e);
            AuthError::TokenCreation
        })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserRole;
    use crate::settings::AppEnvironment;
    use uuid::Uuid;

    fn service(minutes: i64) -> JwtService {
        JwtService::with_expiration(&AppConfig::for_tests(AppEnvironment::Testing), minutes)
    }

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            role,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn round_trip_keeps_role_and_subject() {
        let jwt = service(60);
        let user = user(UserRole::Admin);
        let token = jwt.create_jwt(&user).unwrap();
        let claims = jwt.decode_jwt(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert!(claims.is_admin());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = service(-5);
        let token = jwt.create_jwt(&user(UserRole::User)).unwrap();
        assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let jwt = service(60);
        let mut token = jwt.create_jwt(&user(UserRole::User)).unwrap();
        token.push('x');
        assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::InvalidToken)));
    }
}
