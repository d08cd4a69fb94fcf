use std::sync::Arc;

use sqlx::PgPool;

use crate::domains::notification_email::{
  model::{NotificationEmail, NotificationEmailPayload},
  repository::SqlxNotificationEmailRepository,
  schema::NotificationEmailSchema,
  service::{NotificationEmailService, NotificationEmailServiceError, NotificationEmailServiceImpl},
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn list_emails(
    &self,
    customer: i32,
  ) -> impl std::future::Future<Output = Result<Vec<NotificationEmail>, NotificationEmailServiceError>> + Send;
  fn replace_emails(
    &self,
    customer: i32,
    payloads: Vec<NotificationEmailPayload>,
  ) -> impl std::future::Future<Output = Result<Vec<i32>, NotificationEmailServiceError>> + Send;
  fn service_name(&self) -> &str;
  fn jwt_secret(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
  pub service_name: String,
  pub jwt_secret: String,
}

#[derive(Clone)]
pub struct SharedAppState {
  pub notification_email_service: Arc<NotificationEmailServiceImpl<SqlxNotificationEmailRepository>>,
  pub auth: Arc<AuthSettings>,
}

impl SharedAppState {
  pub fn new(pool: PgPool, schema: NotificationEmailSchema, auth: AuthSettings) -> Self {
    let repository = SqlxNotificationEmailRepository::new(pool, schema.clone());
    let notification_email_service = Arc::new(NotificationEmailServiceImpl::new(repository, schema));

    Self {
      notification_email_service,
      auth: Arc::new(auth),
    }
  }
}

impl AppState for SharedAppState {
  async fn list_emails(&self, customer: i32) -> Result<Vec<NotificationEmail>, NotificationEmailServiceError> {
    self.notification_email_service.list_emails(customer).await
  }

  async fn replace_emails(
    &self,
    customer: i32,
    payloads: Vec<NotificationEmailPayload>,
  ) -> Result<Vec<i32>, NotificationEmailServiceError> {
    self.notification_email_service.replace_emails(customer, payloads).await
  }

  fn service_name(&self) -> &str {
    &self.auth.service_name
  }

  fn jwt_secret(&self) -> &str {
    &self.auth.jwt_secret
  }
}
