use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  pub username: String,
  pub password: String,
  pub from_email: String,
}

impl Default for SmtpConfig {
  fn default() -> Self {
    SmtpConfig {
      host: "smtp.gmail.com".to_string(),
      port: 587,
      username: "".to_string(),
      password: "".to_string(),
      from_email: "".to_string(),
    }
  }
}

impl SmtpConfig {
  /// Reads the `SMTP_*` keys through `lookup`. Only the sender address is
  /// mandatory; a missing username means the relay takes no credentials.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = SmtpConfig::default();

    let port = match lookup("SMTP_PORT") {
      Some(port) => port
        .parse()
        .with_context(|| format!("SMTP_PORT is not a valid port: {}", port))?,
      None => defaults.port,
    };

    Ok(SmtpConfig {
      host: lookup("SMTP_HOST").unwrap_or(defaults.host),
      port,
      username: lookup("SMTP_USERNAME").unwrap_or_default(),
      password: lookup("SMTP_PASSWORD").unwrap_or_default(),
      from_email: lookup("SMTP_FROM_EMAIL").context("SMTP_FROM_EMAIL must be set")?,
    })
  }

  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
  pub to: String,
  pub subject: String,
  pub body: String,
  #[serde(default)]
  pub html: bool,
}

impl EmailMessage {
  pub fn new(to: String, subject: String, body: String, html: bool) -> Self {
    EmailMessage { to, subject, body, html }
  }
}
