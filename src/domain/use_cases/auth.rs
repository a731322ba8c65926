use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtService,
        password::{hash_password, verify_password},
    },
    cache::redis_store::RedisStore,
    entities::{
        token::Claims,
        user::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateProfileRequest, User, UserChanges, UserInsert, UserRole},
    },
    errors::{AppError, AuthError},
    limiter::rate_limiter::RateLimiterStore,
    repositories::user::UserRepository,
};

pub struct AuthHandler<R: ?Sized = dyn UserRepository> {
    pub user_repo: Arc<R>,
    pub jwt: JwtService,
    pub redis: Option<RedisStore>,
    pub login_limiter: RateLimiterStore,
    pub allow_registration: bool,
}

impl<R: UserRepository + ?Sized> AuthHandler<R> {
    pub fn new(
        user_repo: Arc<R>,
        jwt: JwtService,
        redis: Option<RedisStore>,
        login_limiter: RateLimiterStore,
        allow_registration: bool,
    ) -> Self {
        AuthHandler {
            user_repo,
            jwt,
            redis,
            login_limiter,
            allow_registration,
        }
    }

    /// Open while no account exists or when registration is enabled. The
    /// first account becomes admin.
    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser, AppError> {
        let request = request.normalized()?;

        if !self.allow_registration && self.user_repo.count_users().await? > 0 {
            return Err(AuthError::RegistrationClosed.into());
        }

        let insert = UserInsert {
            name: request.name,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            role: UserRole::User,
        };
        let user = self.user_repo.create_user(&insert).await?;
        tracing::info!(id = %user.id, role = ?user.role, "User registered");
        Ok(user.into())
    }

    /// Malformed requests are rejected before they count against the limiter.
    pub async fn login(&self, request: LoginRequest, client_ip: &str) -> Result<LoginResponse, AppError> {
        let request = request.normalized()?;

        let decision = self.login_limiter.check(client_ip);
        if !decision.allowed {
            tracing::warn!(%client_ip, "Login rate limited");
            return Err(AppError::TooManyRequests(decision.retry_after));
        }

        let user = self
            .user_repo
            .get_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        let valid = verify_password(&request.password, &user.password_hash).map_err(|e| {
            tracing::error!("Stored password hash unusable: {}", e);
            AuthError::WrongCredentials
        })?;
        if !valid {
            return Err(AuthError::WrongCredentials.into());
        }

        let token = self.jwt.create_jwt(&user)?;
        tracing::info!(id = %user.id, "User logged in");
        Ok(LoginResponse {
            user: user.into(),
            token,
        })
    }

    pub async fn me(&self, claims: &Claims) -> Result<PublicUser, AppError> {
        self.current_user(claims).await.map(PublicUser::from)
    }

    pub async fn update_profile(&self, claims: &Claims, request: UpdateProfileRequest) -> Result<PublicUser, AppError> {
        let request = request.normalize()?;
        let user = self.current_user(claims).await?;

        let password_hash = match &request.new_password {
            Some(new_password) => {
                let current = request.current_password.as_deref().unwrap_or_default();
                if !verify_password(current, &user.password_hash)? {
                    return Err(AuthError::WrongCredentials.into());
                }
                Some(hash_password(new_password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            name: request.name,
            email: request.email,
            avatar: request.avatar,
            password_hash,
        };
        if changes.is_empty() {
            return Ok(user.into());
        }

        let updated = self
            .user_repo
            .update_user(&user.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        tracing::info!(id = %updated.id, "Profile updated");
        Ok(updated.into())
    }

    /// Denylists the presented token for its remaining lifetime. Without
    /// Redis, or without a valid token, there is nothing to revoke.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), AppError> {
        let (Some(redis), Some(token)) = (&self.redis, token) else {
            return Ok(());
        };
        let Ok(claims) = self.jwt.decode_jwt(token) else {
            return Ok(());
        };

        let now = Utc::now().timestamp() as usize;
        redis.revoke_token(token, claims.remaining_secs(now)).await?;
        tracing::info!(sub = %claims.sub, "Token revoked");
        Ok(())
    }

    async fn current_user(&self, claims: &Claims) -> Result<User, AppError> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        self.user_repo
            .get_user_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
