use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error, trace};

use crate::api::jwt::TokenSubject;
use crate::api::services::{ApiResponse, ErrorCode};
use crate::services::{AuthService, resolve_token};

/// 解析 `Authorization: Bearer` 并把 [`TokenSubject`] 放进请求扩展
///
/// `optional` 模式下无效令牌按匿名处理；`required` 模式下返回 401。
#[derive(Clone, Copy)]
pub struct MemberAuth {
    required: bool,
}

impl MemberAuth {
    pub fn optional() -> Self {
        Self { required: false }
    }

    pub fn required() -> Self {
        Self { required: true }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MemberAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = MemberAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MemberAuthMiddleware {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

pub struct MemberAuthMiddleware<S> {
    service: Rc<S>,
    required: bool,
}

impl<S, B> MemberAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn handle_unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        debug!("Member authentication failed: {}", message);
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: message.to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(resolve_token)
            .map(str::to_string)
    }
}

impl<S, B> Service<ServiceRequest> for MemberAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required = self.required;

        Box::pin(async move {
            // 外层已完成认证
            if req.extensions().contains::<TokenSubject>() {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(auth) = req.app_data::<web::Data<Arc<AuthService>>>().cloned() else {
                error!("AuthService is not registered as app data");
                return Ok(req.into_response(
                    HttpResponse::InternalServerError()
                        .finish()
                        .map_into_right_body(),
                ));
            };

            match Self::extract_bearer_token(&req) {
                Some(token) => match auth.authenticate(&token).await {
                    Ok(subject) => {
                        trace!("Authenticated member {}", subject.member_id);
                        req.extensions_mut().insert(subject);
                    }
                    Err(e) if required => {
                        return Ok(Self::handle_unauthorized(req, e.message()));
                    }
                    Err(e) => {
                        trace!("Ignoring invalid token on optional auth: {}", e);
                    }
                },
                None if required => {
                    return Ok(Self::handle_unauthorized(
                        req,
                        "Unauthorized: missing bearer token",
                    ));
                }
                None => {}
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}
