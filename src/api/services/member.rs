//! 会员端点 `/api/members/*`

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::MemberService;

use super::helpers::{created_response, error_from_modoos};
use super::types::{CreatedResponse, JoinRequest};

pub async fn join(
    members: web::Data<Arc<MemberService>>,
    body: web::Json<JoinRequest>,
) -> ActixResult<impl Responder> {
    match members.join(body.into_inner().into()).await {
        Ok(member) => Ok(created_response(CreatedResponse { id: member.id })),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}
