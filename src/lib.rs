pub mod app;
pub mod config;
pub mod db;
pub mod domains;
pub mod email;
pub mod error;
pub mod middleware;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use email::{build_email_sender, EmailMessage, EmailSender, Mailer, MailerSource, SendReport, SmtpMailerSource};
pub use utils::error::AppError;
