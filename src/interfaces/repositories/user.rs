use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::user::{User, UserChanges, UserInsert},
    errors::AppError,
    repositories::sqlx_repo::{conflict_on_unique, SqlxUserRepo, UpdateSet},
};

const EMAIL_TAKEN: &str = "Email is already registered";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    async fn update_user(&self, id: &Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// The first account ever created becomes admin whatever role was asked for.
    /// The table lock serializes concurrent sign-ups so only one of them can
    /// see an empty table.
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES (
                $1, LOWER($2), $3,
                CASE WHEN EXISTS (SELECT 1 FROM users) THEN $4 ELSE 'admin'::user_role END
            )
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_user(&self, id: &Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut set = UpdateSet::new("users");
        set.set("name", changes.name)
            .set("email", changes.email)
            .set_nullable("avatar", changes.avatar)
            .set("password_hash", changes.password_hash);

        let mut query = set.where_id_returning(*id);
        query
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))
    }
}
