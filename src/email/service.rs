use crate::email::{
  mailer::{Mailer, SendReport},
  types::{EmailMessage, SmtpConfig},
};
use anyhow::Result;
use async_trait::async_trait;
use lettre::{
  message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
  Message, Tokio1Executor,
};

pub struct EmailService {
  smtp_config: SmtpConfig,
  transporter: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
  pub fn new(smtp_config: SmtpConfig) -> Result<Self> {
    let mut builder = if smtp_config.host == "localhost" || smtp_config.host == "mailhog" {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host)
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.host)?
    };

    if !smtp_config.username.is_empty() {
      builder = builder.credentials(Credentials::new(
        smtp_config.username.clone(),
        smtp_config.password.clone(),
      ));
    }

    let transporter = builder.port(smtp_config.port).build();

    Ok(EmailService {
      smtp_config,
      transporter,
    })
  }

  pub fn build_message(&self, message: &EmailMessage) -> Result<Message> {
    let content_type = if message.html {
      ContentType::TEXT_HTML
    } else {
      ContentType::TEXT_PLAIN
    };

    let email = Message::builder()
      .from(self.smtp_config.from_email.parse()?)
      .to(message.to.parse()?)
      .subject(&message.subject)
      .header(content_type)
      .body(message.body.clone())?;

    Ok(email)
  }

  pub async fn send_email(&self, message: &EmailMessage) -> Result<()> {
    let email = self.build_message(message)?;
    self.transporter.send(email).await?;
    Ok(())
  }
}

#[async_trait]
impl Mailer for EmailService {
  async fn send(&self, emails: Vec<EmailMessage>) -> Result<SendReport> {
    for message in &emails {
      self.send_email(message).await?;
    }

    Ok(SendReport { sent: emails.len() })
  }
}
