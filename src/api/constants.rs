//! API 模块常量定义

/// Refresh Token Cookie 名称
pub const REFRESH_COOKIE_NAME: &str = "refresh-token";

/// Authorization 头的前缀
pub const BEARER_PREFIX: &str = "Bearer ";
