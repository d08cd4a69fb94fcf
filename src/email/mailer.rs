use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::{
  service::EmailService,
  types::{EmailMessage, SmtpConfig},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReport {
  pub sent: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, emails: Vec<EmailMessage>) -> Result<SendReport>;
}

/// Hands out the mailer to use for one send.
#[cfg_attr(test, mockall::automock)]
pub trait MailerSource: Send + Sync {
  fn resolve(&self) -> Result<Arc<dyn Mailer>>;
}

/// Builds a fresh SMTP mailer from the current configuration on every
/// resolve, so edits to the environment or env file apply without a restart.
///
/// Entries of the env file take precedence over the process environment.
/// Each resolved mailer serves one send and opens one SMTP connection per
/// message; no connection pool outlives the send.
#[derive(Debug, Clone, Default)]
pub struct SmtpMailerSource {
  env_file: Option<PathBuf>,
}

impl SmtpMailerSource {
  pub fn new(env_file: Option<PathBuf>) -> Self {
    Self { env_file }
  }

  pub fn load_config(&self) -> Result<SmtpConfig> {
    let overrides = match &self.env_file {
      Some(path) => dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open mailer config {}", path.display()))?
        .collect::<Result<HashMap<String, String>, _>>()
        .with_context(|| format!("Failed to parse mailer config {}", path.display()))?,
      None => HashMap::new(),
    };

    SmtpConfig::from_lookup(|key| overrides.get(key).cloned().or_else(|| std::env::var(key).ok()))
  }
}

impl MailerSource for SmtpMailerSource {
  fn resolve(&self) -> Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = Arc::new(EmailService::new(self.load_config()?)?);
    Ok(mailer)
  }
}
