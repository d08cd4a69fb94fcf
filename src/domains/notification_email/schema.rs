//! Table descriptor for notification emails.
//!
//! Each notification stream of the host gets its own table. The descriptor is
//! built once at startup and owns every SQL statement the repository runs, so
//! table and column choices live in one place.

use std::sync::OnceLock;

use regex::Regex;
use validator::Validate;

use super::model::{NewNotificationEmail, NotificationEmailPayload};

pub const DEFAULT_TABLE_NAME: &str = "notification_emails";
pub const DEFAULT_CUSTOMER_TABLE: &str = "customers";
pub const CUSTOMER_COLUMN: &str = "customer";

const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
  InvalidIdentifier(String),
}

impl std::error::Error for SchemaError {}

impl std::fmt::Display for SchemaError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SchemaError::InvalidIdentifier(name) => write!(f, "Invalid SQL identifier: {:?}", name),
    }
  }
}

fn identifier_regex() -> &'static Regex {
  static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
  IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"))
}

fn check_identifier(name: &str) -> Result<(), SchemaError> {
  if name.len() > MAX_IDENTIFIER_LEN || !identifier_regex().is_match(name) {
    return Err(SchemaError::InvalidIdentifier(name.to_string()));
  }
  Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmailSchema {
  table_name: String,
  customer_table: String,
  subject: bool,
  html: bool,
  created_at: bool,
}

impl Default for NotificationEmailSchema {
  fn default() -> Self {
    NotificationEmailSchema {
      table_name: DEFAULT_TABLE_NAME.to_string(),
      customer_table: DEFAULT_CUSTOMER_TABLE.to_string(),
      subject: true,
      html: true,
      created_at: true,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationEmailSchemaBuilder {
  schema: NotificationEmailSchema,
}

impl NotificationEmailSchemaBuilder {
  pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
    self.schema.table_name = table_name.into();
    self
  }

  pub fn customer_table(mut self, customer_table: impl Into<String>) -> Self {
    self.schema.customer_table = customer_table.into();
    self
  }

  /// Whether the table carries the optional `subject` override column.
  pub fn subject(mut self, enabled: bool) -> Self {
    self.schema.subject = enabled;
    self
  }

  /// Whether the table carries the optional `html` flag column.
  pub fn html(mut self, enabled: bool) -> Self {
    self.schema.html = enabled;
    self
  }

  /// Whether the table carries a `created_at` timestamp. Host tables that
  /// predate it turn this off.
  pub fn created_at(mut self, enabled: bool) -> Self {
    self.schema.created_at = enabled;
    self
  }

  pub fn build(self) -> Result<NotificationEmailSchema, SchemaError> {
    check_identifier(&self.schema.table_name)?;
    check_identifier(&self.schema.customer_table)?;
    Ok(self.schema)
  }
}

impl NotificationEmailSchema {
  pub fn builder() -> NotificationEmailSchemaBuilder {
    NotificationEmailSchemaBuilder::default()
  }

  pub fn table_name(&self) -> &str {
    &self.table_name
  }

  pub fn customer_table(&self) -> &str {
    &self.customer_table
  }

  pub fn has_subject(&self) -> bool {
    self.subject
  }

  pub fn has_html(&self) -> bool {
    self.html
  }

  pub fn has_created_at(&self) -> bool {
    self.created_at
  }

  /// Stored columns, in table order.
  pub fn columns(&self) -> Vec<&'static str> {
    let mut columns = vec!["id", CUSTOMER_COLUMN, "email"];
    if self.subject {
      columns.push("subject");
    }
    if self.html {
      columns.push("html");
    }
    if self.created_at {
      columns.push("created_at");
    }
    columns
  }

  pub fn create_table_sql(&self) -> String {
    let mut definitions = vec![
      "id SERIAL PRIMARY KEY".to_string(),
      format!(
        "{} INTEGER NOT NULL REFERENCES {} (id)",
        CUSTOMER_COLUMN, self.customer_table
      ),
      "email VARCHAR(255) NOT NULL".to_string(),
    ];
    if self.subject {
      definitions.push("subject VARCHAR(255)".to_string());
    }
    if self.html {
      definitions.push("html BOOLEAN NOT NULL DEFAULT FALSE".to_string());
    }
    if self.created_at {
      definitions.push("created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()".to_string());
    }

    format!(
      "CREATE TABLE IF NOT EXISTS {} ({})",
      self.table_name,
      definitions.join(", ")
    )
  }

  pub fn create_index_sql(&self) -> String {
    format!(
      "CREATE INDEX IF NOT EXISTS {table}_{column}_idx ON {table} ({column})",
      table = self.table_name,
      column = CUSTOMER_COLUMN
    )
  }

  /// Select for one customer. Excluded columns come back as `NULL` / `FALSE`
  /// so every schema decodes into the same row type.
  pub fn select_by_customer_sql(&self) -> String {
    format!(
      "SELECT id, {customer}, email, {subject}, {html}, {created_at} FROM {table} WHERE {customer} = $1 ORDER BY id",
      customer = CUSTOMER_COLUMN,
      subject = self.returned_subject(),
      html = self.returned_html(),
      created_at = self.returned_created_at(),
      table = self.table_name
    )
  }

  pub fn delete_by_customer_sql(&self) -> String {
    format!("DELETE FROM {} WHERE {} = $1", self.table_name, CUSTOMER_COLUMN)
  }

  /// Insert returning the new id. Binds customer and email, then subject and
  /// html when those columns exist.
  pub fn insert_sql(&self) -> String {
    let mut columns = vec![CUSTOMER_COLUMN, "email"];
    if self.subject {
      columns.push("subject");
    }
    if self.html {
      columns.push("html");
    }
    let placeholders = (1..=columns.len())
      .map(|i| format!("${}", i))
      .collect::<Vec<_>>()
      .join(", ");

    format!(
      "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
      self.table_name,
      columns.join(", "),
      placeholders
    )
  }

  pub fn lock_customer_sql(&self) -> String {
    format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", self.customer_table)
  }

  /// Builds an unsaved row for `customer` from a request payload.
  ///
  /// Only field-level constraints are checked. Values for columns this schema
  /// does not carry are dropped.
  pub fn from_payload(
    &self,
    payload: NotificationEmailPayload,
    customer: i32,
  ) -> Result<NewNotificationEmail, validator::ValidationErrors> {
    payload.validate()?;

    Ok(NewNotificationEmail {
      customer,
      email: payload.email,
      subject: if self.subject { payload.subject } else { None },
      html: self.html && payload.html.unwrap_or(false),
    })
  }

  fn returned_subject(&self) -> &'static str {
    if self.subject {
      "subject"
    } else {
      "NULL::VARCHAR AS subject"
    }
  }

  fn returned_html(&self) -> &'static str {
    if self.html {
      "html"
    } else {
      "FALSE AS html"
    }
  }

  fn returned_created_at(&self) -> &'static str {
    if self.created_at {
      "created_at"
    } else {
      "NULL::TIMESTAMPTZ AS created_at"
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(email: &str, subject: Option<&str>, html: bool) -> NotificationEmailPayload {
    NotificationEmailPayload {
      email: email.to_string(),
      subject: subject.map(str::to_string),
      html: Some(html),
    }
  }

  #[test]
  fn test_default_schema() {
    let schema = NotificationEmailSchema::builder().build().unwrap();
    assert_eq!(schema.table_name(), "notification_emails");
    assert_eq!(schema.customer_table(), "customers");
    assert!(schema.has_subject());
    assert!(schema.has_html());
    assert_eq!(
      schema.columns(),
      vec!["id", "customer", "email", "subject", "html", "created_at"]
    );
  }

  #[test]
  fn test_custom_table_name() {
    let schema = NotificationEmailSchema::builder()
      .table_name("message_notification_emails")
      .build()
      .unwrap();

    assert!(schema
      .create_table_sql()
      .starts_with("CREATE TABLE IF NOT EXISTS message_notification_emails ("));
    assert_eq!(
      schema.delete_by_customer_sql(),
      "DELETE FROM message_notification_emails WHERE customer = $1"
    );
  }

  #[test]
  fn test_rejects_unsafe_identifiers() {
    let result = NotificationEmailSchema::builder()
      .table_name("emails; DROP TABLE customers")
      .build();
    assert_eq!(
      result,
      Err(SchemaError::InvalidIdentifier("emails; DROP TABLE customers".to_string()))
    );

    assert!(NotificationEmailSchema::builder().table_name("").build().is_err());
    assert!(NotificationEmailSchema::builder().table_name("1emails").build().is_err());
    assert!(NotificationEmailSchema::builder()
      .customer_table("public.customers")
      .build()
      .is_err());
    assert!(NotificationEmailSchema::builder()
      .table_name("a".repeat(64))
      .build()
      .is_err());
  }

  #[test]
  fn test_create_table_with_all_columns() {
    let schema = NotificationEmailSchema::default();
    assert_eq!(
      schema.create_table_sql(),
      "CREATE TABLE IF NOT EXISTS notification_emails (id SERIAL PRIMARY KEY, \
       customer INTEGER NOT NULL REFERENCES customers (id), email VARCHAR(255) NOT NULL, \
       subject VARCHAR(255), html BOOLEAN NOT NULL DEFAULT FALSE, \
       created_at TIMESTAMPTZ NOT NULL DEFAULT NOW())"
    );
  }

  #[test]
  fn test_create_table_without_optional_columns() {
    let schema = NotificationEmailSchema::builder()
      .subject(false)
      .html(false)
      .build()
      .unwrap();

    let sql = schema.create_table_sql();
    assert!(!sql.contains("subject"));
    assert!(!sql.contains("html"));
    assert_eq!(schema.columns(), vec!["id", "customer", "email", "created_at"]);
  }

  #[test]
  fn test_insert_placeholders_follow_columns() {
    let full = NotificationEmailSchema::default();
    assert_eq!(
      full.insert_sql(),
      "INSERT INTO notification_emails (customer, email, subject, html) VALUES ($1, $2, $3, $4) RETURNING id"
    );

    let no_subject = NotificationEmailSchema::builder().subject(false).build().unwrap();
    assert_eq!(
      no_subject.insert_sql(),
      "INSERT INTO notification_emails (customer, email, html) VALUES ($1, $2, $3) RETURNING id"
    );
  }

  #[test]
  fn test_select_fills_excluded_columns() {
    let schema = NotificationEmailSchema::builder().html(false).build().unwrap();
    assert_eq!(
      schema.select_by_customer_sql(),
      "SELECT id, customer, email, subject, FALSE AS html, created_at FROM notification_emails \
       WHERE customer = $1 ORDER BY id"
    );
  }

  #[test]
  fn test_from_payload_binds_customer() {
    let schema = NotificationEmailSchema::default();
    let record = schema
      .from_payload(payload("a@x.com", Some("hi"), true), 42)
      .unwrap();

    assert_eq!(
      record,
      NewNotificationEmail {
        customer: 42,
        email: "a@x.com".to_string(),
        subject: Some("hi".to_string()),
        html: true,
      }
    );
  }

  #[test]
  fn test_from_payload_drops_excluded_columns() {
    let schema = NotificationEmailSchema::builder()
      .subject(false)
      .html(false)
      .build()
      .unwrap();
    let record = schema
      .from_payload(payload("a@x.com", Some("hi"), true), 7)
      .unwrap();

    assert_eq!(record.subject, None);
    assert!(!record.html);
  }

  #[test]
  fn test_from_payload_rejects_invalid_email() {
    let schema = NotificationEmailSchema::default();
    assert!(schema.from_payload(payload("not-an-email", None, false), 1).is_err());
  }

  #[test]
  fn test_from_payload_rejects_oversized_subject() {
    let schema = NotificationEmailSchema::default();
    let subject = "s".repeat(256);
    assert!(schema
      .from_payload(payload("a@x.com", Some(&subject), false), 1)
      .is_err());
  }

  #[test]
  fn test_from_payload_allows_duplicates() {
    let schema = NotificationEmailSchema::default();
    let first = schema.from_payload(payload("a@x.com", None, false), 1).unwrap();
    let second = schema.from_payload(payload("a@x.com", None, false), 1).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_schema_without_created_at() {
    let schema = NotificationEmailSchema::builder().created_at(false).build().unwrap();
    assert!(!schema.has_created_at());
    assert!(!schema.create_table_sql().contains("created_at"));
    assert_eq!(schema.columns(), vec!["id", "customer", "email", "subject", "html"]);
    assert_eq!(
      schema.select_by_customer_sql(),
      "SELECT id, customer, email, subject, html, NULL::TIMESTAMPTZ AS created_at FROM notification_emails \
       WHERE customer = $1 ORDER BY id"
    );
  }

  #[test]
  fn test_from_payload_treats_null_html_as_false() {
    let schema = NotificationEmailSchema::default();
    let payload: NotificationEmailPayload =
      serde_json::from_str(r#"{"email": "a@x.com", "subject": null, "html": null}"#).unwrap();

    let record = schema.from_payload(payload, 1).unwrap();
    assert_eq!(record.subject, None);
    assert!(!record.html);
  }
}
