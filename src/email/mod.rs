//! Email sending functionality module
//!
//! Notification emails leave the process through a [`Mailer`]. The lettre-based
//! [`EmailService`] is the SMTP implementation; [`EmailSender`] wraps an
//! event-specific collector with a send through whatever mailer the
//! [`MailerSource`] resolves at call time.

mod mailer;
mod sender;
mod service;
mod types;

pub use mailer::{Mailer, MailerSource, SendReport, SmtpMailerSource};
pub use sender::{build_email_sender, EmailSender};
pub use service::EmailService;
pub use types::{EmailMessage, SmtpConfig};

#[cfg(test)]
pub use mailer::{MockMailer, MockMailerSource};
