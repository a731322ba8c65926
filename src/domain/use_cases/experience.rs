use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::{
        experience::{Experience, ExperienceInsert, NewExperienceRequest, UpdateExperienceRequest},
        status::StatusFilter,
    },
    errors::AppError,
    repositories::experience::ExperienceRepository,
};

const NOT_FOUND: &str = "Experience not found";

pub struct ExperienceHandler<R: ?Sized = dyn ExperienceRepository> {
    pub experience_repo: Arc<R>,
}

impl<R: ExperienceRepository + ?Sized> ExperienceHandler<R> {
    pub fn new(experience_repo: Arc<R>) -> Self {
        ExperienceHandler { experience_repo }
    }

    pub async fn list_experiences(&self, status: Option<StatusFilter>, is_admin: bool) -> Result<Vec<Experience>, AppError> {
        self.experience_repo
            .list_experiences(StatusFilter::resolve(status, is_admin))
            .await
    }

    pub async fn create_experience(&self, request: NewExperienceRequest) -> Result<Experience, AppError> {
        let insert = ExperienceInsert::try_from(request)?;
        self.experience_repo.create_experience(&insert).await
    }

    pub async fn get_experience(&self, id: Uuid, is_admin: bool) -> Result<Experience, AppError> {
        self.experience_repo
            .get_experience(&id, is_admin)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    /// Date rules that span the stored row (e.g. a new end date against the
    /// stored start date) surface as 400 from the table's check constraints.
    pub async fn update_experience(&self, id: Uuid, request: UpdateExperienceRequest) -> Result<Experience, AppError> {
        let patch = request.normalize()?;
        self.experience_repo
            .update_experience(&id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete_experience(&self, id: Uuid) -> Result<(), AppError> {
        match self.experience_repo.delete_experience(&id).await? {
            true => Ok(()),
            false => Err(AppError::NotFound(NOT_FOUND.into())),
        }
    }
}
