//! Outbound services.

pub mod email;

pub use email::{ContactInquiry, INQUIRY_SUBJECT, Mailer, SmtpMailer};
