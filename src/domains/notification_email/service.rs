use async_trait::async_trait;
use std::error::Error;

use super::{
  model::{NotificationEmail, NotificationEmailPayload},
  repository::NotificationEmailRepository,
  schema::NotificationEmailSchema,
};
use crate::impl_service_error_conversions;

#[derive(Debug)]
pub enum NotificationEmailServiceError {
  ValidationError(String),
  NotFound(String),
  InternalServerError(String),
}

impl Error for NotificationEmailServiceError {}

impl std::fmt::Display for NotificationEmailServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      NotificationEmailServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
      NotificationEmailServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
      NotificationEmailServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(NotificationEmailServiceError, InternalServerError, NotFound);

#[async_trait]
pub trait NotificationEmailService: Send + Sync {
  async fn list_emails(&self, customer: i32) -> Result<Vec<NotificationEmail>, NotificationEmailServiceError>;
  async fn replace_emails(
    &self,
    customer: i32,
    payloads: Vec<NotificationEmailPayload>,
  ) -> Result<Vec<i32>, NotificationEmailServiceError>;
}

pub struct NotificationEmailServiceImpl<R> {
  repository: R,
  schema: NotificationEmailSchema,
}

impl<R> NotificationEmailServiceImpl<R>
where
  R: NotificationEmailRepository,
{
  pub fn new(repository: R, schema: NotificationEmailSchema) -> Self {
    Self { repository, schema }
  }
}

#[async_trait]
impl<R> NotificationEmailService for NotificationEmailServiceImpl<R>
where
  R: NotificationEmailRepository,
{
  async fn list_emails(&self, customer: i32) -> Result<Vec<NotificationEmail>, NotificationEmailServiceError> {
    let emails = self.repository.find_by_customer(customer).await?;
    Ok(emails)
  }

  async fn replace_emails(
    &self,
    customer: i32,
    payloads: Vec<NotificationEmailPayload>,
  ) -> Result<Vec<i32>, NotificationEmailServiceError> {
    let emails = payloads
      .into_iter()
      .enumerate()
      .map(|(index, payload)| {
        self
          .schema
          .from_payload(payload, customer)
          .map_err(|e| NotificationEmailServiceError::ValidationError(format!("Entry {}: {}", index, e)))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let ids = self.repository.replace_for_customer(customer, emails).await?;

    tracing::info!(
      "Notification emails of customer {} in {} replaced ({} entries)",
      customer,
      self.schema.table_name(),
      ids.len()
    );

    Ok(ids)
  }
}
