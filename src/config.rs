use anyhow::{Context, Result};

use crate::{domains::notification_email::schema::NotificationEmailSchema, utils::parse_flag};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  pub bind_addr: String,
  pub jwt_secret: String,
  /// Service a customer must be authorized for to manage these emails.
  pub service_name: String,
  /// The bundled migrations only create `customers`. A table named by
  /// `NOTIFICATION_CUSTOMER_TABLE` is owned and migrated by the host.
  pub schema: NotificationEmailSchema,
}

impl AppConfig {
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut schema = NotificationEmailSchema::builder();
    if let Some(table) = lookup("NOTIFICATION_TABLE") {
      schema = schema.table_name(table);
    }
    if let Some(table) = lookup("NOTIFICATION_CUSTOMER_TABLE") {
      schema = schema.customer_table(table);
    }
    if let Some(value) = lookup("NOTIFICATION_SUBJECT") {
      schema = schema.subject(parse_flag("NOTIFICATION_SUBJECT", &value)?);
    }
    if let Some(value) = lookup("NOTIFICATION_HTML") {
      schema = schema.html(parse_flag("NOTIFICATION_HTML", &value)?);
    }
    if let Some(value) = lookup("NOTIFICATION_CREATED_AT") {
      schema = schema.created_at(parse_flag("NOTIFICATION_CREATED_AT", &value)?);
    }

    Ok(AppConfig {
      database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
      bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
      jwt_secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
      service_name: lookup("NOTIFICATION_SERVICE").context("NOTIFICATION_SERVICE must be set")?,
      schema: schema.build()?,
    })
  }

  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }
}
