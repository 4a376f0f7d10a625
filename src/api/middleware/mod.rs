pub mod auth;

pub use auth::MemberAuth;
