pub mod notification_email;
