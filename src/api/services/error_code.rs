//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::ModoosError;

/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 会员错误
/// - 4000-4099: 招募帖错误
/// - 5000-5099: 邮件错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,

    MemberNotFound = 3000,
    EmailAlreadyExists = 3001,

    RecruitNotFound = 4000,
    RecruitInvalidQuery = 4001,

    MailDeliveryFailed = 5000,
}

impl From<&ModoosError> for ErrorCode {
    fn from(err: &ModoosError) -> Self {
        match err {
            ModoosError::Validation(_) => ErrorCode::BadRequest,
            ModoosError::NotFound(_) => ErrorCode::NotFound,
            ModoosError::Conflict(_) => ErrorCode::EmailAlreadyExists,
            ModoosError::AuthFailed(_) => ErrorCode::AuthFailed,
            ModoosError::TokenInvalid(_) => ErrorCode::TokenInvalid,
            ModoosError::MailDelivery(_) => ErrorCode::MailDeliveryFailed,
            ModoosError::TokenStore(_) => ErrorCode::ServiceUnavailable,
            ModoosError::DatabaseConfig(_)
            | ModoosError::DatabaseConnection(_)
            | ModoosError::DatabaseOperation(_)
            | ModoosError::PasswordHash(_)
            | ModoosError::Serialization(_)
            | ModoosError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
