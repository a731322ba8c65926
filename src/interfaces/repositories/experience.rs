use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        dashboard::StatusCounts,
        experience::{Experience, ExperienceInsert, UpdateExperienceRequest},
        status::ContentStatus,
    },
    errors::AppError,
    repositories::sqlx_repo::{delete_by_id, status_counts, SqlxExperienceRepo, UpdateSet},
};

const TABLE: &str = "experiences";

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError>;
    async fn list_experiences(&self, status: Option<ContentStatus>) -> Result<Vec<Experience>, AppError>;
    async fn get_experience(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Experience>, AppError>;
    async fn update_experience(&self, id: &Uuid, patch: UpdateExperienceRequest) -> Result<Option<Experience>, AppError>;
    async fn delete_experience(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn experience_counts(&self) -> Result<StatusCounts, AppError>;
}

impl SqlxExperienceRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxExperienceRepo { pool }
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepo {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        sqlx::query_as::<_, Experience>(
            r#"
            INSERT INTO experiences (
                company, position, location, employment_type, start_date, end_date,
                is_current, description, achievements, technologies, status, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&experience.company)
        .bind(&experience.position)
        .bind(&experience.location)
        .bind(&experience.employment_type)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(experience.is_current)
        .bind(&experience.description)
        .bind(&experience.achievements)
        .bind(&experience.technologies)
        .bind(experience.status)
        .bind(experience.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_experiences(&self, status: Option<ContentStatus>) -> Result<Vec<Experience>, AppError> {
        sqlx::query_as::<_, Experience>(
            r#"
            SELECT * FROM experiences
            WHERE ($1::content_status IS NULL OR status = $1)
            ORDER BY is_current DESC, start_date DESC, display_order ASC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_experience(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Experience>, AppError> {
        sqlx::query_as::<_, Experience>(
            "SELECT * FROM experiences WHERE id = $1 AND ($2 OR status = 'published')",
        )
        .bind(id)
        .bind(include_drafts)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_experience(&self, id: &Uuid, patch: UpdateExperienceRequest) -> Result<Option<Experience>, AppError> {
        let mut set = UpdateSet::new(TABLE);
        set.set("company", patch.company)
            .set("position", patch.position)
            .set_nullable("location", patch.location)
            .set_nullable("employment_type", patch.employment_type)
            .set("start_date", patch.start_date)
            .set_nullable("end_date", patch.end_date)
            .set("is_current", patch.is_current)
            .set("description", patch.description)
            .set("achievements", patch.achievements)
            .set("technologies", patch.technologies)
            .set("status", patch.status)
            .set("display_order", patch.display_order);

        let mut query = set.where_id_returning(*id);
        query
            .build_query_as::<Experience>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_experience(&self, id: &Uuid) -> Result<bool, AppError> {
        delete_by_id(&self.pool, TABLE, id).await
    }

    async fn experience_counts(&self) -> Result<StatusCounts, AppError> {
        status_counts(&self.pool, TABLE).await
    }
}
