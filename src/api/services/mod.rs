pub mod auth;
pub mod error_code;
pub mod health;
mod helpers;
pub mod member;
pub mod recruit;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{
    CookieBuilder, error_from_modoos, error_response, json_response, success_response,
};

pub use error_code::ErrorCode;

pub use health::{HealthService, health_routes};
pub use routes::{api_routes, auth_routes, member_routes, recruit_routes};
