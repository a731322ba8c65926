use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        dashboard::StatusCounts,
        envelope::ListFilter,
        project::{Project, ProjectInsert, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::{
        conflict_on_unique, delete_by_id, filtered_select, push_page, status_counts, SqlxProjectRepo, UpdateSet,
    },
    utils::document_key::DocumentKey,
};

const TABLE: &str = "projects";
const SEARCH_COLUMNS: [&str; 2] = ["title", "description"];
const SLUG_TAKEN: &str = "A project with this slug already exists";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn list_projects(&self, filter: &ListFilter) -> Result<Vec<Project>, AppError>;
    async fn count_projects(&self, filter: &ListFilter) -> Result<i64, AppError>;
    /// Bumps `views` and returns the updated row in one statement.
    async fn view_project(&self, key: &DocumentKey, include_drafts: bool) -> Result<Option<Project>, AppError>;
    async fn update_project(&self, id: &Uuid, patch: UpdateProjectRequest) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn project_counts(&self) -> Result<StatusCounts, AppError>;
    async fn total_project_views(&self) -> Result<i64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }

    fn filtered<'a>(select: &str, filter: &ListFilter) -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        let mut builder = filtered_select(select, TABLE, filter, &SEARCH_COLUMNS);
        if let Some(featured) = filter.featured {
            builder.push(" AND featured = ").push_bind(featured);
        }
        if let Some(category) = &filter.category {
            builder.push(" AND LOWER(category) = LOWER(").push_bind(category.clone()).push(")");
        }
        if let Some(tag) = &filter.tag {
            builder.push(" AND ").push_bind(tag.clone()).push(" = ANY(technologies)");
        }
        builder
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, slug, description, content, technologies, category,
                image_url, github_url, live_url, featured, status, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.content)
        .bind(&project.technologies)
        .bind(&project.category)
        .bind(&project.image_url)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(project.featured)
        .bind(project.status)
        .bind(project.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, SLUG_TAKEN))
    }

    async fn list_projects(&self, filter: &ListFilter) -> Result<Vec<Project>, AppError> {
        let mut builder = Self::filtered("*", filter);
        builder.push(" ORDER BY display_order ASC, created_at DESC");
        push_page(&mut builder, filter);

        builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count_projects(&self, filter: &ListFilter) -> Result<i64, AppError> {
        let mut builder = Self::filtered("COUNT(*)", filter);
        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn view_project(&self, key: &DocumentKey, include_drafts: bool) -> Result<Option<Project>, AppError> {
        let (id, slug) = match key {
            DocumentKey::Id(id) => (Some(*id), None),
            DocumentKey::Slug(slug) => (None, Some(slug.as_str())),
        };

        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET views = views + 1
            WHERE (id = $1 OR slug = $2)
              AND ($3 OR status = 'published')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(include_drafts)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_project(&self, id: &Uuid, patch: UpdateProjectRequest) -> Result<Option<Project>, AppError> {
        let mut set = UpdateSet::new(TABLE);
        set.set("title", patch.title)
            .set("slug", patch.slug)
            .set("description", patch.description)
            .set_nullable("content", patch.content)
            .set("technologies", patch.technologies)
            .set_nullable("category", patch.category)
            .set_nullable("image_url", patch.image_url)
            .set_nullable("github_url", patch.github_url)
            .set_nullable("live_url", patch.live_url)
            .set("featured", patch.featured)
            .set("status", patch.status)
            .set("display_order", patch.display_order);

        let mut query = set.where_id_returning(*id);
        query
            .build_query_as::<Project>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, SLUG_TAKEN))
    }

    async fn delete_project(&self, id: &Uuid) -> Result<bool, AppError> {
        delete_by_id(&self.pool, TABLE, id).await
    }

    async fn project_counts(&self) -> Result<StatusCounts, AppError> {
        status_counts(&self.pool, TABLE).await
    }

    async fn total_project_views(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(views), 0)::BIGINT FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
