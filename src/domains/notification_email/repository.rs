use async_trait::async_trait;
use sqlx::PgPool;

use super::{
  model::{NewNotificationEmail, NotificationEmail},
  schema::NotificationEmailSchema,
};

#[derive(Debug)]
pub enum RepositoryError {
  DatabaseError(sqlx::Error),
  NotFound(String),
}

impl std::error::Error for RepositoryError {}

impl std::fmt::Display for RepositoryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RepositoryError::DatabaseError(e) => write!(f, "Database error: {}", e),
      RepositoryError::NotFound(msg) => write!(f, "Not found: {}", msg),
    }
  }
}

impl From<sqlx::Error> for RepositoryError {
  fn from(err: sqlx::Error) -> Self {
    RepositoryError::DatabaseError(err)
  }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationEmailRepository: Send + Sync {
  async fn find_by_customer(&self, customer: i32) -> Result<Vec<NotificationEmail>, RepositoryError>;
  /// Drops every row of the customer and stores `emails` in their place.
  /// Returns the new ids in input order.
  async fn replace_for_customer(
    &self,
    customer: i32,
    emails: Vec<NewNotificationEmail>,
  ) -> Result<Vec<i32>, RepositoryError>;
}

pub struct SqlxNotificationEmailRepository {
  pool: PgPool,
  schema: NotificationEmailSchema,
}

impl SqlxNotificationEmailRepository {
  pub fn new(pool: PgPool, schema: NotificationEmailSchema) -> Self {
    Self { pool, schema }
  }

  /// Creates the table and its customer index when missing.
  pub async fn ensure_table(&self) -> Result<(), sqlx::Error> {
    sqlx::query(&self.schema.create_table_sql()).execute(&self.pool).await?;
    sqlx::query(&self.schema.create_index_sql()).execute(&self.pool).await?;
    Ok(())
  }
}

#[async_trait]
impl NotificationEmailRepository for SqlxNotificationEmailRepository {
  async fn find_by_customer(&self, customer: i32) -> Result<Vec<NotificationEmail>, RepositoryError> {
    let emails = sqlx::query_as::<_, NotificationEmail>(&self.schema.select_by_customer_sql())
      .bind(customer)
      .fetch_all(&self.pool)
      .await?;

    Ok(emails)
  }

  async fn replace_for_customer(
    &self,
    customer: i32,
    emails: Vec<NewNotificationEmail>,
  ) -> Result<Vec<i32>, RepositoryError> {
    let mut tx = self.pool.begin().await?;

    // Serializes concurrent replaces for the same customer.
    sqlx::query_scalar::<_, i32>(&self.schema.lock_customer_sql())
      .bind(customer)
      .fetch_optional(&mut *tx)
      .await?
      .ok_or_else(|| RepositoryError::NotFound(format!("Customer {} not found", customer)))?;

    let deleted = sqlx::query(&self.schema.delete_by_customer_sql())
      .bind(customer)
      .execute(&mut *tx)
      .await?
      .rows_affected();

    let insert_sql = self.schema.insert_sql();
    let mut ids = Vec::with_capacity(emails.len());

    for email in emails {
      let mut query = sqlx::query_scalar::<_, i32>(&insert_sql)
        .bind(customer)
        .bind(email.email);
      if self.schema.has_subject() {
        query = query.bind(email.subject);
      }
      if self.schema.has_html() {
        query = query.bind(email.html);
      }
      ids.push(query.fetch_one(&mut *tx).await?);
    }

    tx.commit().await?;

    tracing::debug!(
      table = self.schema.table_name(),
      customer,
      deleted,
      created = ids.len(),
      "Replaced notification emails"
    );

    Ok(ids)
  }
}
