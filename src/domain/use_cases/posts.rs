use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::{
        envelope::{ListQuery, Page, Pagination},
        post::{NewPostRequest, Post, PostDetailResponse, PostInsert, UpdatePostRequest},
    },
    errors::AppError,
    repositories::post::PostRepository,
    utils::document_key::DocumentKey,
};

const NOT_FOUND: &str = "Post not found";

pub struct PostHandler<R: ?Sized = dyn PostRepository> {
    pub post_repo: Arc<R>,
}

impl<R: PostRepository + ?Sized> PostHandler<R> {
    pub fn new(post_repo: Arc<R>) -> Self {
        PostHandler { post_repo }
    }

    pub async fn list_posts(&self, query: &ListQuery, is_admin: bool) -> Result<Page<Post>, AppError> {
        let filter = query.to_filter(is_admin);
        let (items, total) = futures::try_join!(
            self.post_repo.list_posts(&filter),
            self.post_repo.count_posts(&filter),
        )?;

        Ok(Page {
            items,
            pagination: Pagination::new(query.page(), query.limit(), total),
        })
    }

    pub async fn create_post(&self, request: NewPostRequest) -> Result<Post, AppError> {
        let insert = PostInsert::try_from(request)?;
        let post = self.post_repo.create_post(&insert).await?;
        tracing::info!(id = %post.id, slug = %post.slug, status = ?post.status, "Post created");
        Ok(post)
    }

    /// Detail view with rendered HTML; each successful read counts one view.
    pub async fn view_post(&self, id_or_slug: &str, is_admin: bool) -> Result<PostDetailResponse, AppError> {
        let key = DocumentKey::parse(id_or_slug)?;
        let post = self
            .post_repo
            .view_post(&key, is_admin)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
        Ok(PostDetailResponse::from(post))
    }

    pub async fn update_post(&self, id: Uuid, request: UpdatePostRequest) -> Result<Post, AppError> {
        let patch = request.normalize()?;
        self.post_repo
            .update_post(&id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), AppError> {
        if !self.post_repo.delete_post(&id).await? {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }
        tracing::info!(%id, "Post deleted");
        Ok(())
    }
}
