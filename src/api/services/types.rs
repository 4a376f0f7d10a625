//! API 请求/响应类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ModoosError, Result};
use crate::services::email_service::parse_email;
use crate::services::{CreateRecruit, JoinMember};
use crate::storage::{Category, Study};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NormalResponse {
    pub status: String,
}

impl NormalResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }

    pub fn fail() -> Self {
        Self {
            status: "fail".to_string(),
        }
    }
}

/// 登录与修改密码共用
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        parse_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ModoosError::validation("Password must not be empty"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailVerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct JoinRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

impl From<JoinRequest> for JoinMember {
    fn from(req: JoinRequest) -> Self {
        JoinMember {
            email: req.email,
            password: req.password,
            nickname: req.nickname,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecruitRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub total_participants: i32,
}

impl TryFrom<CreateRecruitRequest> for CreateRecruit {
    type Error = ModoosError;

    fn try_from(req: CreateRecruitRequest) -> Result<Self> {
        Ok(CreateRecruit {
            category: Category::parse(&req.category)?,
            title: req.title,
            description: req.description,
            total_participants: req.total_participants,
        })
    }
}

/// 招募帖列表项
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecruitInfoResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: String,
    pub writer_id: i64,
    pub participants: i32,
    pub total_participants: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub is_writer: bool,
}

impl RecruitInfoResponse {
    pub fn new(study: Study, is_writer: bool) -> Self {
        Self {
            id: study.id,
            title: study.title,
            description: study.description,
            category: study.category,
            status: study.status.as_ref().to_string(),
            writer_id: study.writer_id,
            participants: study.participants,
            total_participants: study.total_participants,
            view_count: study.view_count,
            like_count: study.like_count,
            created_at: study.created_at,
            is_writer,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub token_store: String,
    pub timestamp: String,
    pub response_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecruitStatus;

    #[test]
    fn test_login_request_validate() {
        let ok = LoginRequest {
            email: "user@modoos.dev".into(),
            password: "secret".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = LoginRequest {
            email: "user".into(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_pw = LoginRequest {
            password: String::new(),
            ..ok
        };
        assert!(empty_pw.validate().is_err());
    }

    #[test]
    fn test_create_recruit_request_camel_case() {
        let req: CreateRecruitRequest = serde_json::from_str(
            r#"{"title":"Rust","category":"programming","totalParticipants":5}"#,
        )
        .unwrap();
        let create = CreateRecruit::try_from(req).unwrap();
        assert_eq!(create.category, Category::Programming);
        assert_eq!(create.total_participants, 5);
        assert!(create.description.is_empty());
    }

    #[test]
    fn test_recruit_info_serializes_camel_case() {
        let study = Study {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            category: Category::Hobby,
            status: RecruitStatus::Closed,
            writer_id: 2,
            participants: 1,
            total_participants: 3,
            view_count: 4,
            like_count: 5,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(RecruitInfoResponse::new(study, true)).unwrap();
        assert_eq!(json["isWriter"], true);
        assert_eq!(json["category"], "HOBBY");
        assert_eq!(json["status"], "CLOSED");
        assert_eq!(json["totalParticipants"], 3);
        assert!(json.get("writerId").is_some());
    }
}
