use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::email::EmailMessage;

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct NotificationEmail {
  pub id: i32,
  pub customer: i32,
  pub email: String,
  pub subject: Option<String>,
  pub html: bool,
  pub created_at: Option<DateTime<Utc>>,
}

impl NotificationEmail {
  /// Composes the message this recipient should get for one event.
  ///
  /// A stored subject overrides `default_subject`; the html flag picks which
  /// body is sent.
  pub fn to_message(&self, default_subject: &str, text_body: &str, html_body: &str) -> EmailMessage {
    let subject = self.subject.as_deref().unwrap_or(default_subject);
    let body = if self.html { html_body } else { text_body };

    EmailMessage::new(self.email.clone(), subject.to_string(), body.to_string(), self.html)
  }
}

/// An unsaved row, bound to its customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotificationEmail {
  pub customer: i32,
  pub email: String,
  pub subject: Option<String>,
  pub html: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NotificationEmailPayload {
  #[validate(
    email(message = "A valid email address is required"),
    length(max = 255, message = "Email must be at most 255 characters")
  )]
  pub email: String,
  #[validate(length(max = 255, message = "Subject must be at most 255 characters"))]
  #[serde(default)]
  pub subject: Option<String>,
  /// `null` and a missing field both mean plain text.
  #[serde(default)]
  pub html: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailsUpdatedResponse {
  pub message: String,
  pub ids: Vec<i32>,
}

impl EmailsUpdatedResponse {
  pub const MESSAGE: &'static str = "The emails list has been updated.";

  pub fn new(ids: Vec<i32>) -> Self {
    EmailsUpdatedResponse {
      message: Self::MESSAGE.to_string(),
      ids,
    }
  }
}
