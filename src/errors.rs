use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ModoosError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    AuthFailed(String),
    TokenInvalid(String),
    TokenStore(String),
    PasswordHash(String),
    MailDelivery(String),
    Serialization(String),
    FileOperation(String),
}

impl ModoosError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ModoosError::DatabaseConfig(_) => "E001",
            ModoosError::DatabaseConnection(_) => "E002",
            ModoosError::DatabaseOperation(_) => "E003",
            ModoosError::Validation(_) => "E004",
            ModoosError::NotFound(_) => "E005",
            ModoosError::Conflict(_) => "E006",
            ModoosError::AuthFailed(_) => "E007",
            ModoosError::TokenInvalid(_) => "E008",
            ModoosError::TokenStore(_) => "E009",
            ModoosError::PasswordHash(_) => "E010",
            ModoosError::MailDelivery(_) => "E011",
            ModoosError::Serialization(_) => "E012",
            ModoosError::FileOperation(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ModoosError::DatabaseConfig(_) => "Database Configuration Error",
            ModoosError::DatabaseConnection(_) => "Database Connection Error",
            ModoosError::DatabaseOperation(_) => "Database Operation Error",
            ModoosError::Validation(_) => "Validation Error",
            ModoosError::NotFound(_) => "Resource Not Found",
            ModoosError::Conflict(_) => "Resource Conflict",
            ModoosError::AuthFailed(_) => "Authentication Failed",
            ModoosError::TokenInvalid(_) => "Invalid Token",
            ModoosError::TokenStore(_) => "Token Store Error",
            ModoosError::PasswordHash(_) => "Password Hash Error",
            ModoosError::MailDelivery(_) => "Mail Delivery Error",
            ModoosError::Serialization(_) => "Serialization Error",
            ModoosError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ModoosError::DatabaseConfig(msg)
            | ModoosError::DatabaseConnection(msg)
            | ModoosError::DatabaseOperation(msg)
            | ModoosError::Validation(msg)
            | ModoosError::NotFound(msg)
            | ModoosError::Conflict(msg)
            | ModoosError::AuthFailed(msg)
            | ModoosError::TokenInvalid(msg)
            | ModoosError::TokenStore(msg)
            | ModoosError::PasswordHash(msg)
            | ModoosError::MailDelivery(msg)
            | ModoosError::Serialization(msg)
            | ModoosError::FileOperation(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ModoosError::Validation(_) => StatusCode::BAD_REQUEST,
            ModoosError::NotFound(_) => StatusCode::NOT_FOUND,
            ModoosError::Conflict(_) => StatusCode::CONFLICT,
            ModoosError::AuthFailed(_) | ModoosError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            ModoosError::MailDelivery(_) | ModoosError::TokenStore(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ModoosError::DatabaseConfig(_)
            | ModoosError::DatabaseConnection(_)
            | ModoosError::DatabaseOperation(_)
            | ModoosError::PasswordHash(_)
            | ModoosError::Serialization(_)
            | ModoosError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ModoosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ModoosError {}

// 便捷的构造函数
impl ModoosError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ModoosError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ModoosError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ModoosError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ModoosError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ModoosError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ModoosError::Conflict(msg.into())
    }

    pub fn auth_failed<T: Into<String>>(msg: T) -> Self {
        ModoosError::AuthFailed(msg.into())
    }

    pub fn token_invalid<T: Into<String>>(msg: T) -> Self {
        ModoosError::TokenInvalid(msg.into())
    }

    pub fn token_store<T: Into<String>>(msg: T) -> Self {
        ModoosError::TokenStore(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        ModoosError::PasswordHash(msg.into())
    }

    pub fn mail_delivery<T: Into<String>>(msg: T) -> Self {
        ModoosError::MailDelivery(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ModoosError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ModoosError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ModoosError {
    fn from(err: sea_orm::DbErr) -> Self {
        ModoosError::DatabaseOperation(err.to_string())
    }
}

impl From<redis::RedisError> for ModoosError {
    fn from(err: redis::RedisError) -> Self {
        ModoosError::TokenStore(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ModoosError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ModoosError::TokenInvalid(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ModoosError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        ModoosError::PasswordHash(err.to_string())
    }
}

impl From<lettre::error::Error> for ModoosError {
    fn from(err: lettre::error::Error) -> Self {
        ModoosError::MailDelivery(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for ModoosError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        ModoosError::MailDelivery(err.to_string())
    }
}

impl From<std::io::Error> for ModoosError {
    fn from(err: std::io::Error) -> Self {
        ModoosError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ModoosError {
    fn from(err: serde_json::Error) -> Self {
        ModoosError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ModoosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ModoosError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ModoosError::auth_failed("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ModoosError::token_invalid("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ModoosError::conflict("x").http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ModoosError::mail_delivery("x").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ModoosError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            ModoosError::database_config(""),
            ModoosError::database_connection(""),
            ModoosError::database_operation(""),
            ModoosError::validation(""),
            ModoosError::not_found(""),
            ModoosError::conflict(""),
            ModoosError::auth_failed(""),
            ModoosError::token_invalid(""),
            ModoosError::token_store(""),
            ModoosError::password_hash(""),
            ModoosError::mail_delivery(""),
            ModoosError::serialization(""),
            ModoosError::file_operation(""),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple_contains_message() {
        let err = ModoosError::not_found("member a@b.c");
        assert_eq!(err.format_simple(), "Resource Not Found: member a@b.c");
        assert_eq!(err.to_string(), err.format_simple());
    }
}
