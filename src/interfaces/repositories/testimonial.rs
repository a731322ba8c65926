use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        dashboard::StatusCounts,
        status::ContentStatus,
        testimonial::{Testimonial, TestimonialInsert, UpdateTestimonialRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::{delete_by_id, status_counts, SqlxTestimonialRepo, UpdateSet},
};

const TABLE: &str = "testimonials";

#[async_trait]
pub trait TestimonialRepository: Send + Sync {
    async fn create_testimonial(&self, testimonial: &TestimonialInsert) -> Result<Testimonial, AppError>;
    async fn list_testimonials(&self, status: Option<ContentStatus>) -> Result<Vec<Testimonial>, AppError>;
    async fn get_testimonial(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Testimonial>, AppError>;
    async fn update_testimonial(&self, id: &Uuid, patch: UpdateTestimonialRequest) -> Result<Option<Testimonial>, AppError>;
    async fn delete_testimonial(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn testimonial_counts(&self) -> Result<StatusCounts, AppError>;
}

impl SqlxTestimonialRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxTestimonialRepo { pool }
    }
}

#[async_trait]
impl TestimonialRepository for SqlxTestimonialRepo {
    async fn create_testimonial(&self, testimonial: &TestimonialInsert) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>(
            r#"
            INSERT INTO testimonials (name, role, company, content, avatar_url, rating, status, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&testimonial.name)
        .bind(&testimonial.role)
        .bind(&testimonial.company)
        .bind(&testimonial.content)
        .bind(&testimonial.avatar_url)
        .bind(testimonial.rating)
        .bind(testimonial.status)
        .bind(testimonial.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_testimonials(&self, status: Option<ContentStatus>) -> Result<Vec<Testimonial>, AppError> {
        sqlx::query_as::<_, Testimonial>(
            r#"
            SELECT * FROM testimonials
            WHERE ($1::content_status IS NULL OR status = $1)
            ORDER BY display_order ASC, created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_testimonial(&self, id: &Uuid, include_drafts: bool) -> Result<Option<Testimonial>, AppError> {
        sqlx::query_as::<_, Testimonial>(
            "SELECT * FROM testimonials WHERE id = $1 AND ($2 OR status = 'published')",
        )
        .bind(id)
        .bind(include_drafts)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_testimonial(&self, id: &Uuid, patch: UpdateTestimonialRequest) -> Result<Option<Testimonial>, AppError> {
        let mut set = UpdateSet::new(TABLE);
        set.set("name", patch.name)
            .set("role", patch.role)
            .set_nullable("company", patch.company)
            .set("content", patch.content)
            .set_nullable("avatar_url", patch.avatar_url)
            .set_nullable("rating", patch.rating)
            .set("status", patch.status)
            .set("display_order", patch.display_order);

        let mut query = set.where_id_returning(*id);
        query
            .build_query_as::<Testimonial>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_testimonial(&self, id: &Uuid) -> Result<bool, AppError> {
        delete_by_id(&self.pool, TABLE, id).await
    }

    async fn testimonial_counts(&self) -> Result<StatusCounts, AppError> {
        status_counts(&self.pool, TABLE).await
    }
}
