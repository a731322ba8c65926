use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        certification::{Certification, CertificationInsert, UpdateCertificationRequest},
        dashboard::StatusCounts,
        status::ContentStatus,
    },
    errors::AppError,
    repositories::sqlx_repo::{delete_by_id, status_counts, SqlxCertificationRepo, UpdateSet},
};

const TABLE: &str = "certifications";

#[async_trait]
pub trait CertificationRepository: Send + Sync {
    async fn create_certification(&self, certification: &CertificationInsert) -> Result<Certification, AppError>;
    async fn list_certifications(&self, status: Option<ContentStatus>) -> Result<Vec<Certification>, AppError>;
    async fn get_certification(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Certification>, AppError>;
    async fn update_certification(&self, id: &Uuid, patch: UpdateCertificationRequest) -> Result<Option<Certification>, AppError>;
    async fn delete_certification(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn certification_counts(&self) -> Result<StatusCounts, AppError>;
}

impl SqlxCertificationRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCertificationRepo { pool }
    }
}

#[async_trait]
impl CertificationRepository for SqlxCertificationRepo {
    async fn create_certification(&self, certification: &CertificationInsert) -> Result<Certification, AppError> {
        sqlx::query_as::<_, Certification>(
            r#"
            INSERT INTO certifications (
                name, issuer, issue_date, expiry_date, credential_id, credential_url,
                image_url, skills, status, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&certification.name)
        .bind(&certification.issuer)
        .bind(certification.issue_date)
        .bind(certification.expiry_date)
        .bind(&certification.credential_id)
        .bind(&certification.credential_url)
        .bind(&certification.image_url)
        .bind(&certification.skills)
        .bind(certification.status)
        .bind(certification.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_certifications(&self, status: Option<ContentStatus>) -> Result<Vec<Certification>, AppError> {
        sqlx::query_as::<_, Certification>(
            r#"
            SELECT * FROM certifications
            WHERE ($1::content_status IS NULL OR status = $1)
            ORDER BY issue_date DESC, display_order ASC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_certification(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Certification>, AppError> {
        sqlx::query_as::<_, Certification>(
            "SELECT * FROM certifications WHERE id = $1 AND ($2 OR status = 'published')",
        )
        .bind(id)
        .bind(include_drafts)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_certification(&self, id: &Uuid, patch: UpdateCertificationRequest) -> Result<Option<Certification>, AppError> {
        let mut set = UpdateSet::new(TABLE);
        set.set("name", patch.name)
            .set("issuer", patch.issuer)
            .set("issue_date", patch.issue_date)
            .set_nullable("expiry_date", patch.expiry_date)
            .set_nullable("credential_id", patch.credential_id)
            .set_nullable("credential_url", patch.credential_url)
            .set_nullable("image_url", patch.image_url)
            .set("skills", patch.skills)
            .set("status", patch.status)
            .set("display_order", patch.display_order);

        let mut query = set.where_id_returning(*id);
        query
            .build_query_as::<Certification>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_certification(&self, id: &Uuid) -> Result<bool, AppError> {
        delete_by_id(&self.pool, TABLE, id).await
    }

    async fn certification_counts(&self) -> Result<StatusCounts, AppError> {
        status_counts(&self.pool, TABLE).await
    }
}
