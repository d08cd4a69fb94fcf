use std::future::Future;

use anyhow::Result;

use super::{
  mailer::{MailerSource, SendReport},
  types::EmailMessage,
};

/// Sends whatever an event-specific collector yields.
///
/// Built with [`build_email_sender`].
pub struct EmailSender<C, S> {
  collect: C,
  mailers: S,
}

/// Wraps `collect` so every call of [`EmailSender::send`] mails the emails it
/// returns through the mailer `mailers` resolves for that call.
pub fn build_email_sender<C, S>(collect: C, mailers: S) -> EmailSender<C, S>
where
  S: MailerSource,
{
  EmailSender { collect, mailers }
}

impl<C, S> EmailSender<C, S>
where
  S: MailerSource,
{
  /// Returns `Ok(None)` without contacting any mailer when the collector
  /// yields nothing. Otherwise exactly one `Mailer::send` is made and its
  /// report returned. Errors from the collector or the mailer pass through.
  pub async fn send<A, Fut, I>(&self, args: A) -> Result<Option<SendReport>>
  where
    C: Fn(A) -> Fut,
    Fut: Future<Output = Result<I>>,
    I: IntoIterator<Item = EmailMessage>,
  {
    let emails: Vec<EmailMessage> = (self.collect)(args).await?.into_iter().collect();

    if emails.is_empty() {
      tracing::debug!("No notification recipients, nothing to send");
      return Ok(None);
    }

    let count = emails.len();
    let mailer = self.mailers.resolve()?;
    let report = mailer.send(emails).await?;

    tracing::info!("Sent notification to {} recipient(s)", count);

    Ok(Some(report))
  }
}
