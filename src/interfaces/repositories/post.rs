use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        dashboard::StatusCounts,
        envelope::ListFilter,
        post::{Post, PostInsert, UpdatePostRequest},
        status::ContentStatus,
    },
    errors::AppError,
    repositories::sqlx_repo::{
        conflict_on_unique, delete_by_id, filtered_select, push_page, status_counts, SqlxPostRepo, UpdateSet,
    },
    utils::document_key::DocumentKey,
};

const TABLE: &str = "posts";
const SEARCH_COLUMNS: [&str; 3] = ["title", "excerpt", "content"];
const SLUG_TAKEN: &str = "A post with this slug already exists";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError>;
    async fn list_posts(&self, filter: &ListFilter) -> Result<Vec<Post>, AppError>;
    async fn count_posts(&self, filter: &ListFilter) -> Result<i64, AppError>;
    async fn view_post(&self, key: &DocumentKey, include_drafts: bool) -> Result<Option<Post>, AppError>;
    async fn update_post(&self, id: &Uuid, patch: UpdatePostRequest) -> Result<Option<Post>, AppError>;
    async fn delete_post(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn post_counts(&self) -> Result<StatusCounts, AppError>;
    async fn total_post_views(&self) -> Result<i64, AppError>;
}

impl SqlxPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPostRepo { pool }
    }

    fn filtered<'a>(select: &str, filter: &ListFilter) -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
        let mut builder = filtered_select(select, TABLE, filter, &SEARCH_COLUMNS);
        if let Some(tag) = &filter.tag {
            builder.push(" AND EXISTS (SELECT 1 FROM UNNEST(tags) t WHERE LOWER(t) = LOWER(")
                .push_bind(tag.clone())
                .push("))");
        }
        builder
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepo {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (
                title, slug, excerpt, content, cover_image, tags, author,
                reading_time, status, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image)
        .bind(&post.tags)
        .bind(&post.author)
        .bind(post.reading_time)
        .bind(post.status)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, SLUG_TAKEN))
    }

    async fn list_posts(&self, filter: &ListFilter) -> Result<Vec<Post>, AppError> {
        let mut builder = Self::filtered("*", filter);
        builder.push(" ORDER BY published_at DESC NULLS LAST, created_at DESC");
        push_page(&mut builder, filter);

        builder
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count_posts(&self, filter: &ListFilter) -> Result<i64, AppError> {
        let mut builder = Self::filtered("COUNT(*)", filter);
        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn view_post(&self, key: &DocumentKey, include_drafts: bool) -> Result<Option<Post>, AppError> {
        let (id, slug) = match key {
            DocumentKey::Id(id) => (Some(*id), None),
            DocumentKey::Slug(slug) => (None, Some(slug.as_str())),
        };

        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET views = views + 1
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

    async fn update_post(&self, id: &Uuid, patch: UpdatePostRequest) -> Result<Option<Post>, AppError> {
        let publishing = patch.status == Some(ContentStatus::Published);

        let mut set = UpdateSet::new(TABLE);
        set.set("title", patch.title)
            .set("slug", patch.slug)
            .set("excerpt", patch.excerpt)
            .set("content", patch.content)
            .set("reading_time", patch.reading_time)
            .set_nullable("cover_image", patch.cover_image)
            .set("tags", patch.tags)
            .set_nullable("author", patch.author)
            .set("status", patch.status);
        if publishing {
            // First publication wins; republishing keeps the original date.
            set.set_raw("published_at = COALESCE(published_at, NOW())");
        }

        let mut query = set.where_id_returning(*id);
        query
            .build_query_as::<Post>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, SLUG_TAKEN))
    }

    async fn delete_post(&self, id: &Uuid) -> Result<bool, AppError> {
        delete_by_id(&self.pool, TABLE, id).await
    }

    async fn post_counts(&self) -> Result<StatusCounts, AppError> {
        status_counts(&self.pool, TABLE).await
    }

    async fn total_post_views(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(views), 0)::BIGINT FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
