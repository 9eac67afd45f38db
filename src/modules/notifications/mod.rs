pub mod mailer;
pub mod service;
