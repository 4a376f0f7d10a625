//! 认证相关端点 `/api/auth/*`

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, info, warn};

use crate::api::constants::REFRESH_COOKIE_NAME;
use crate::config::{AuthConfig, get_config};
use crate::errors::ModoosError;
use crate::services::{AuthService, EmailService, MemberService, resolve_token};
use crate::utils::ip::client_ip;

use super::error_code::ErrorCode;
use super::helpers::{
    CookieBuilder, bearer_header_value, error_from_modoos, error_response, require_authorization,
    status_response,
};
use super::types::{EmailQuery, EmailVerifyRequest, LoginRequest};

/// 登录限流 key：连接 IP，来自可信代理时取 X-Forwarded-For
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let config = get_config();
        let key = client_ip(&req.connection_info(), &config.auth.trusted_proxies)
            .unwrap_or_else(|| "unknown".to_string());
        Ok(key)
    }
}

/// 超限返回 429
pub fn login_rate_limiter(auth: &AuthConfig) -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let refill = auth.login_rate_limit_refill_secs.max(1);
    let burst = auth.login_rate_limit_burst.max(1);

    let config = GovernorConfigBuilder::default()
        .seconds_per_request(refill)
        .burst_size(burst)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("rate limit values are clamped to at least 1");

    debug!("Login rate limiter created: 1 req/{}s, burst {}", refill, burst);
    Governor::new(&config)
}

pub async fn login(
    auth: web::Data<Arc<AuthService>>,
    body: web::Json<LoginRequest>,
) -> ActixResult<impl Responder> {
    if let Err(e) = body.validate() {
        return Ok(error_from_modoos(&e));
    }

    match auth.login(&body.email, &body.password).await {
        Ok(pair) => {
            let cookie = CookieBuilder::from_config().build_refresh_cookie(pair.refresh_token);
            Ok(HttpResponse::Ok()
                .insert_header((AUTHORIZATION, bearer_header_value(&pair.access_token)))
                .cookie(cookie)
                .finish())
        }
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

/// 仅在令牌真实但已过期时返回 401
pub async fn validate(
    req: HttpRequest,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let header = match require_authorization(req.headers()) {
        Ok(h) => h,
        Err(resp) => return Ok(resp),
    };

    let reissue_required = resolve_token(header).is_some_and(|token| auth.validate(token));
    if reissue_required {
        debug!("Access token expired, reissue required");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenExpired,
            "Access token expired, reissue required",
        ));
    }

    Ok(status_response(true))
}

pub async fn reissue(
    req: HttpRequest,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let header = match require_authorization(req.headers()) {
        Ok(h) => h,
        Err(resp) => return Ok(resp),
    };
    let Some(refresh_cookie) = req.cookie(REFRESH_COOKIE_NAME) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "refresh-token cookie is required",
        ));
    };

    let cookies = CookieBuilder::from_config();
    let result = match resolve_token(header) {
        Some(access_token) => auth.reissue(access_token, refresh_cookie.value()).await,
        None => Err(ModoosError::auth_failed(
            "Authorization header must be a Bearer token",
        )),
    };

    match result {
        Ok(pair) => Ok(HttpResponse::Ok()
            .insert_header((AUTHORIZATION, bearer_header_value(&pair.access_token)))
            .cookie(cookies.build_refresh_cookie(pair.refresh_token))
            .finish()),
        Err(e) => {
            warn!("Reissue rejected: {}", e.message());
            let mut resp = error_from_modoos(&e);
            resp.add_cookie(&cookies.build_expired_refresh_cookie())?;
            Ok(resp)
        }
    }
}

pub async fn logout(
    req: HttpRequest,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let header = match require_authorization(req.headers()) {
        Ok(h) => h,
        Err(resp) => return Ok(resp),
    };
    let result = match resolve_token(header) {
        Some(access_token) => auth.logout(access_token).await,
        None => Err(ModoosError::token_invalid(
            "Authorization header must be a Bearer token",
        )),
    };

    // 无论成功与否都清掉 refresh-token cookie
    let mut resp = match result {
        Ok(()) => status_response(true),
        Err(e) => {
            warn!("Logout rejected: {}", e.message());
            error_from_modoos(&e)
        }
    };
    resp.add_cookie(&CookieBuilder::from_config().build_expired_refresh_cookie())?;
    Ok(resp)
}

/// 发送验证码，响应体为验证码本身
pub async fn email_confirm(
    email: web::Data<Arc<EmailService>>,
    query: web::Query<EmailQuery>,
) -> ActixResult<impl Responder> {
    match email.send_verification_code(&query.email).await {
        Ok(code) => {
            info!("Verification code sent to {}", query.email);
            Ok(HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(code))
        }
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

pub async fn email_verify(
    email: web::Data<Arc<EmailService>>,
    body: web::Json<EmailVerifyRequest>,
) -> ActixResult<impl Responder> {
    match email.verify_code(&body.email, &body.code).await {
        Ok(matched) => Ok(status_response(matched)),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

/// 邮箱已占用时 status 为 fail
pub async fn email_check(
    members: web::Data<Arc<MemberService>>,
    query: web::Query<EmailQuery>,
) -> ActixResult<impl Responder> {
    match members.email_check(&query.email).await {
        Ok(taken) => Ok(status_response(!taken)),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

pub async fn change_password(
    members: web::Data<Arc<MemberService>>,
    body: web::Json<LoginRequest>,
) -> ActixResult<impl Responder> {
    if let Err(e) = body.validate() {
        return Ok(error_from_modoos(&e));
    }

    match members.change_password(&body.email, &body.password).await {
        Ok(()) => Ok(status_response(true)),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}
