use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::{
        status::StatusFilter,
        testimonial::{NewTestimonialRequest, Testimonial, TestimonialInsert, UpdateTestimonialRequest},
    },
    errors::AppError,
    repositories::testimonial::TestimonialRepository,
};

const NOT_FOUND: &str = "Testimonial not found";

pub struct TestimonialHandler<R: ?Sized = dyn TestimonialRepository> {
    pub testimonial_repo: Arc<R>,
}

impl<R: TestimonialRepository + ?Sized> TestimonialHandler<R> {
    pub fn new(testimonial_repo: Arc<R>) -> Self {
        TestimonialHandler { testimonial_repo }
    }

    pub async fn list_testimonials(&self, status: Option<StatusFilter>, is_admin: bool) -> Result<Vec<Testimonial>, AppError> {
        self.testimonial_repo
            .list_testimonials(StatusFilter::resolve(status, is_admin))
            .await
    }

    pub async fn create_testimonial(&self, request: NewTestimonialRequest) -> Result<Testimonial, AppError> {
        let insert = TestimonialInsert::try_from(request)?;
        self.testimonial_repo.create_testimonial(&insert).await
    }

    pub async fn get_testimonial(&self, id: Uuid, is_admin: bool) -> Result<Testimonial, AppError> {
        self.testimonial_repo
            .get_testimonial(&id, is_admin)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn update_testimonial(&self, id: Uuid, request: UpdateTestimonialRequest) -> Result<Testimonial, AppError> {
        let patch = request.normalize()?;
        self.testimonial_repo
            .update_testimonial(&id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete_testimonial(&self, id: Uuid) -> Result<(), AppError> {
        match self.testimonial_repo.delete_testimonial(&id).await? {
            true => Ok(()),
            false => Err(AppError::NotFound(NOT_FOUND.into())),
        }
    }
}
