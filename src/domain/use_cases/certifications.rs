use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::{
        certification::{Certification, CertificationInsert, NewCertificationRequest, UpdateCertificationRequest},
        status::StatusFilter,
    },
    errors::AppError,
    repositories::certification::CertificationRepository,
};

const NOT_FOUND: &str = "Certification not found";

pub struct CertificationHandler<R: ?Sized = dyn CertificationRepository> {
    pub certification_repo: Arc<R>,
}

impl<R: CertificationRepository + ?Sized> CertificationHandler<R> {
    pub fn new(certification_repo: Arc<R>) -> Self {
        CertificationHandler { certification_repo }
    }

    pub async fn list_certifications(
        &self,
        status: Option<StatusFilter>,
        is_admin: bool,
    ) -> Result<Vec<Certification>, AppError> {
        self.certification_repo
            .list_certifications(StatusFilter::resolve(status, is_admin))
            .await
    }

    pub async fn create_certification(&self, request: NewCertificationRequest) -> Result<Certification, AppError> {
        let insert = CertificationInsert::try_from(request)?;
        self.certification_repo.create_certification(&insert).await
    }

    pub async fn get_certification(&self, id: Uuid, is_admin: bool) -> Result<Certification, AppError> {
        self.certification_repo
            .get_certification(&id, is_admin)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn update_certification(
        &self,
        id: Uuid,
        request: UpdateCertificationRequest,
    ) -> Result<Certification, AppError> {
        let patch = request.normalize()?;
        self.certification_repo
            .update_certification(&id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete_certification(&self, id: Uuid) -> Result<(), AppError> {
        match self.certification_repo.delete_certification(&id).await? {
            true => Ok(()),
            false => Err(AppError::NotFound(NOT_FOUND.into())),
        }
    }
}
