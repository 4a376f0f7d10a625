//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use serde::Serialize;
use tracing::error;

use crate::api::constants;
use crate::config::{AuthConfig, SameSitePolicy};
use crate::errors::ModoosError;

use super::error_code::ErrorCode;
use super::types::{ApiResponse, NormalResponse};

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// `{"status":"success"}` / `{"status":"fail"}`
pub fn status_response(ok: bool) -> HttpResponse {
    let body = if ok {
        NormalResponse::success()
    } else {
        NormalResponse::fail()
    };
    HttpResponse::Ok().json(body)
}

pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 按 ModoosError 映射 HTTP 状态码和 ErrorCode；5xx 记录日志且不回显内部信息
pub fn error_from_modoos(err: &ModoosError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("{} {}: {}", err.code(), err.error_type(), err.message());
        return error_response(status, ErrorCode::from(err), err.error_type());
    }
    error_response(status, ErrorCode::from(err), err.message())
}

/// 缺少 Authorization 头时为 Err(400 响应)
pub fn require_authorization(headers: &HeaderMap) -> Result<&str, HttpResponse> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                "Authorization header is required",
            )
        })
}

pub fn bearer_header_value(access_token: &str) -> String {
    format!("{}{}", constants::BEARER_PREFIX, access_token)
}

/// refresh-token cookie 构建器
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    max_age_secs: i64,
}

impl CookieBuilder {
    pub fn new(auth: &AuthConfig) -> Self {
        let same_site = match auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: auth.cookie_secure,
            domain: auth.cookie_domain.clone(),
            max_age_secs: auth.cookie_max_age_secs,
        }
    }

    pub fn from_config() -> Self {
        Self::new(&crate::config::get_config().auth)
    }

    fn build_cookie_base(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::REFRESH_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_refresh_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(token, CookieDuration::seconds(self.max_age_secs))
    }

    pub fn build_expired_refresh_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), CookieDuration::ZERO)
    }
}
