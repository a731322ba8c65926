use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        contact::{BulkAction, Contact, ContactInsert, ContactStatus},
        dashboard::ContactCounts,
    },
    errors::AppError,
    repositories::sqlx_repo::{delete_by_id, SqlxContactRepo},
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact(&self, contact: &ContactInsert) -> Result<Contact, AppError>;
    async fn list_contacts(&self, status: Option<ContactStatus>, limit: i64, offset: i64) -> Result<Vec<Contact>, AppError>;
    async fn count_contacts(&self, status: Option<ContactStatus>) -> Result<i64, AppError>;
    async fn get_contact(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
    async fn update_contact_status(&self, id: &Uuid, status: ContactStatus) -> Result<Option<Contact>, AppError>;
    async fn record_reply(&self, id: &Uuid, reply: &str) -> Result<Option<Contact>, AppError>;
    async fn delete_contact(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn bulk_update(&self, ids: &[Uuid], action: BulkAction) -> Result<u64, AppError>;
    async fn contact_counts(&self) -> Result<ContactCounts, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact(&self, contact: &ContactInsert) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, email, subject, message, ip_address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(&contact.ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_contacts(&self, status: Option<ContactStatus>, limit: i64, offset: i64) -> Result<Vec<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE ($1::contact_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn count_contacts(&self, status: Option<ContactStatus>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contacts WHERE ($1::contact_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_contact(&self, id: &Uuid) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_contact_status(&self, id: &Uuid, status: ContactStatus) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            "UPDATE contacts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn record_reply(&self, id: &Uuid, reply: &str) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET reply = $2, replied_at = NOW(), status = 'replied', updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reply)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<bool, AppError> {
        delete_by_id(&self.pool, "contacts", id).await
    }

    async fn bulk_update(&self, ids: &[Uuid], action: BulkAction) -> Result<u64, AppError> {
        let result = match action.target_status() {
            Some(status) => {
                sqlx::query("UPDATE contacts SET status = $2, updated_at = NOW() WHERE id = ANY($1)")
                    .bind(ids)
                    .bind(status)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("DELETE FROM contacts WHERE id = ANY($1)")
                    .bind(ids)
                    .execute(&self.pool)
                    .await?
            }
        };
        Ok(result.rows_affected())
    }

    async fn contact_counts(&self) -> Result<ContactCounts, AppError> {
        sqlx::query_as::<_, ContactCounts>(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE status = 'unread') AS unread FROM contacts",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
