use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    cache::redis_store::RedisStore,
    entities::{
        contact::{
            BulkContactRequest, BulkResult, Contact, ContactForm, ContactListQuery, ContactStatus, GeneratedReply,
            ReplyRequest,
        },
        envelope::{Page, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    },
    errors::AppError,
    integrations::{ai_reply::ReplyDrafter, mailer::Mailer},
    limiter::rate_limiter::RateLimiterStore,
    repositories::contact::ContactRepository,
};

const NOT_FOUND: &str = "Message not found";
const EMAIL_WINDOW_SECS: u64 = 3600;

/// Submission throttling: an in-memory per-IP limiter plus an optional
/// per-email counter in Redis.
#[derive(Clone)]
pub struct ContactGuards {
    pub ip_limiter: RateLimiterStore,
    pub redis: Option<RedisStore>,
    pub email_limit_per_hour: u32,
}

pub struct ContactHandler<R: ?Sized = dyn ContactRepository> {
    pub contact_repo: Arc<R>,
    pub guards: ContactGuards,
    pub mailer: Option<Mailer>,
    pub drafter: ReplyDrafter,
}

impl<R: ContactRepository + ?Sized> ContactHandler<R> {
    pub fn new(contact_repo: Arc<R>, guards: ContactGuards, mailer: Option<Mailer>, drafter: ReplyDrafter) -> Self {
        ContactHandler {
            contact_repo,
            guards,
            mailer,
            drafter,
        }
    }

    /// Invalid forms are rejected before they count against either limit.
    pub async fn submit(&self, form: ContactForm, client_ip: &str) -> Result<Contact, AppError> {
        let insert = form.into_insert(Some(client_ip.to_string()))?;

        let decision = self.guards.ip_limiter.check(client_ip);
        if !decision.allowed {
            tracing::warn!(%client_ip, "Contact form rate limited by IP");
            return Err(AppError::TooManyRequests(decision.retry_after));
        }

        if let Some(redis) = &self.guards.redis {
            match redis.hit_contact_email(&insert.email, EMAIL_WINDOW_SECS).await {
                Ok(count) if count > self.guards.email_limit_per_hour => {
                    tracing::warn!("Contact form rate limited by email");
                    return Err(AppError::TooManyRequests(Some(EMAIL_WINDOW_SECS)));
                }
                Ok(_) => {}
                // Redis trouble must not take the contact form down.
                Err(e) => tracing::warn!("Skipping email rate limit: {}", e),
            }
        }

        let contact = self.contact_repo.create_contact(&insert).await?;
        tracing::info!(id = %contact.id, "Contact message stored");
        Ok(contact)
    }

    /// Page of messages plus the overall unread count.
    pub async fn list(&self, query: &ContactListQuery) -> Result<(Page<Contact>, i64), AppError> {
        let page = query.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let offset = i64::from(page - 1) * i64::from(limit);

        let (items, total, unread) = futures::try_join!(
            self.contact_repo.list_contacts(query.status, i64::from(limit), offset),
            self.contact_repo.count_contacts(query.status),
            self.contact_repo.count_contacts(Some(ContactStatus::Unread)),
        )?;

        Ok((
            Page {
                items,
                pagination: Pagination::new(page, limit, total),
            },
            unread,
        ))
    }

    pub async fn get(&self, id: Uuid) -> Result<Contact, AppError> {
        self.contact_repo
            .get_contact(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn update_status(&self, id: Uuid, status: ContactStatus) -> Result<Contact, AppError> {
        self.contact_repo
            .update_contact_status(&id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        match self.contact_repo.delete_contact(&id).await? {
            true => Ok(()),
            false => Err(AppError::NotFound(NOT_FOUND.into())),
        }
    }

    pub async fn bulk(&self, request: BulkContactRequest) -> Result<BulkResult, AppError> {
        request.validate()?;
        let affected = self.contact_repo.bulk_update(&request.ids, request.action).await?;
        tracing::info!(action = ?request.action, requested = request.ids.len(), affected, "Bulk contact update");
        Ok(BulkResult { affected })
    }

    /// Mails the reply first and only records it once delivery succeeded.
    pub async fn reply(&self, request: ReplyRequest) -> Result<Contact, AppError> {
        let request = request.normalized()?;
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Email service is not configured".into()))?;

        let contact = self.get(request.id).await?;
        let subject = request.subject_for(&contact);
        let body = request.message.as_str();

        mailer.send(&contact.email, &subject, body).await?;

        self.contact_repo
            .record_reply(&contact.id, body)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn generate_reply(&self, id: Uuid) -> Result<GeneratedReply, AppError> {
        let contact = self.get(id).await?;
        let (reply, generated) = self.drafter.draft(&contact).await;
        Ok(GeneratedReply { reply, generated })
    }
}
