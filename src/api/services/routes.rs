//! API 路由配置

use actix_web::dev::HttpServiceFactory;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web;

use crate::api::middleware::MemberAuth;
use crate::config::get_config;

use super::auth::{
    change_password, email_check, email_confirm, email_verify, login, login_rate_limiter, logout,
    reissue, validate,
};
use super::error_code::ErrorCode;
use super::helpers::error_response;
use super::member::join;
use super::recruit::{create_recruit, get_latest_recruit, get_recruit};

/// 认证路由 `/auth`
///
/// - POST /auth/login（带限流）
/// - POST /auth/validate
/// - POST /auth/reissue
/// - POST /auth/logout
/// - POST /auth/email-confirm?email=
/// - POST /auth/email-check?email=
/// - POST /auth/email-verify
/// - POST /auth/changePw
pub fn auth_routes() -> actix_web::Scope {
    let config = get_config();
    web::scope("/auth")
        .route(
            "/login",
            web::post()
                .to(login)
                .wrap(login_rate_limiter(&config.auth)),
        )
        .route("/validate", web::post().to(validate))
        .route("/reissue", web::post().to(reissue))
        .route("/logout", web::post().to(logout))
        .route("/email-confirm", web::post().to(email_confirm))
        .route("/email-check", web::post().to(email_check))
        .route("/email-verify", web::post().to(email_verify))
        .route("/changePw", web::post().to(change_password))
}

/// 会员路由 `/members`
pub fn member_routes() -> actix_web::Scope {
    web::scope("/members").route("/join", web::post().to(join))
}

/// 招募帖路由 `/recruit`，令牌可选；发帖需要登录
pub fn recruit_routes() -> impl HttpServiceFactory {
    web::scope("/recruit")
        .wrap(MemberAuth::optional())
        .route("", web::get().to(get_recruit))
        .route("", web::post().to(create_recruit).wrap(MemberAuth::required()))
        .route("/latest", web::get().to(get_latest_recruit))
}

/// `/api` 根路由；请求体和查询参数解析失败统一返回 400 JSON
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            let resp = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &err.to_string());
            InternalError::from_response(err, resp).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            let resp = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &err.to_string());
            InternalError::from_response(err, resp).into()
        }))
        .service(auth_routes())
        .service(member_routes())
        .service(recruit_routes())
}
