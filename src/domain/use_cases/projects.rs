use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::{
        envelope::{ListQuery, Page, Pagination},
        project::{NewProjectRequest, Project, ProjectInsert, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::document_key::DocumentKey,
};

const NOT_FOUND: &str = "Project not found";

pub struct ProjectHandler<R: ?Sized = dyn ProjectRepository> {
    pub project_repo: Arc<R>,
}

impl<R: ProjectRepository + ?Sized> ProjectHandler<R> {
    pub fn new(project_repo: Arc<R>) -> Self {
        ProjectHandler { project_repo }
    }

    pub async fn list_projects(&self, query: &ListQuery, is_admin: bool) -> Result<Page<Project>, AppError> {
        let filter = query.to_filter(is_admin);
        let (items, total) = futures::try_join!(
            self.project_repo.list_projects(&filter),
            self.project_repo.count_projects(&filter),
        )?;

        Ok(Page {
            items,
            pagination: Pagination::new(query.page(), query.limit(), total),
        })
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let insert = ProjectInsert::try_from(request)?;
        let project = self.project_repo.create_project(&insert).await?;
        tracing::info!(id = %project.id, slug = %project.slug, "Project created");
        Ok(project)
    }

    /// Counts a view on every successful read. Drafts stay invisible to the public.
    pub async fn view_project(&self, id_or_slug: &str, is_admin: bool) -> Result<Project, AppError> {
        let key = DocumentKey::parse(id_or_slug)?;
        self.project_repo
            .view_project(&key, is_admin)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn update_project(&self, id: Uuid, request: UpdateProjectRequest) -> Result<Project, AppError> {
        let patch = request.normalize()?;
        self.project_repo
            .update_project(&id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<(), AppError> {
        if !self.project_repo.delete_project(&id).await? {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }
        tracing::info!(%id, "Project deleted");
        Ok(())
    }
}
