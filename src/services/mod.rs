//! Service layer shared by the HTTP handlers

pub mod auth_service;
pub mod email_service;
pub mod member_service;
pub mod study_service;
pub mod token_store;

pub use auth_service::{AuthService, TokenPair, resolve_token};
pub use email_service::{
    EmailSender, EmailService, LoggingEmailSender, SmtpEmailSender, create_email_sender,
};
pub use member_service::{JoinMember, MemberService};
pub use study_service::{CreateRecruit, StudyService};
pub use token_store::{MemoryTokenStore, RedisTokenStore, TokenStore, create_token_store};
