use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use crate::errors::AuthError;

const TOKEN_DENY_PREFIX: &str = "access_deny";
const CONTACT_EMAIL_PREFIX: &str = "contact_email";

/// Thin wrapper over a Redis pool for the token denylist and counters.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn connect(url: &str) -> Result<Self, AuthError> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AuthError::RedisConnection(e.to_string()))?;
        Ok(RedisStore { pool })
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, AuthError> {
        self.pool
            .get()
            .await
            .map_err(|e| AuthError::RedisConnection(e.to_string()))
    }

    /// Denylists a token until it would have expired anyway.
    pub async fn revoke_token(&self, token: &str, ttl_secs: u64) -> Result<(), AuthError> {
        if ttl_secs == 0 {
            return Ok(());
        }
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(format!("{TOKEN_DENY_PREFIX}:{token}"), 1u8, ttl_secs)
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))
    }

    pub async fn is_token_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let mut conn = self.conn().await?;
        conn.exists(format!("{TOKEN_DENY_PREFIX}:{token}"))
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))
    }

    /// Increments a per-email counter; the window starts on the first hit.
    pub async fn hit_contact_email(&self, email: &str, window_secs: u64) -> Result<u32, AuthError> {
        let key = format!("{CONTACT_EMAIL_PREFIX}:{}", urlencoding::encode(&email.to_lowercase()));
        let mut conn = self.conn().await?;
        let count: u32 = conn
            .incr(&key, 1u32)
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))?;
        if count == 1 {
            conn.expire::<_, ()>(&key, window_secs as i64)
                .await
                .map_err(|e| AuthError::RedisOperation(e.to_string()))?;
        }
        Ok(count)
    }

    pub async fn ping(&self) -> bool {
        match self.conn().await {
            Ok(mut conn) => redis::cmd("PING")
                .query_async::<String>(&mut conn)
                .await
                .is_ok_and(|pong| pong == "PONG"),
            Err(_) => false,
        }
    }
}
