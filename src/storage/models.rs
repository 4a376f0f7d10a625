use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::errors::{ModoosError, Result};

/// 默认权限
pub const DEFAULT_ROLE: &str = "ROLE_USER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub email: String,
    /// Argon2id PHC 字符串
    #[serde(skip_serializing)]
    pub password: String,
    pub nickname: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// 写入新会员（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
}

/// 스터디 분야
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Category {
    Language,
    Employment,
    Certificate,
    Programming,
    Hobby,
    Etc,
}

impl Category {
    /// 解析分类名（大小写不敏感），未知值为校验错误
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim().parse::<Category>().map_err(|_| {
            let valid: Vec<&'static str> = Category::iter().map(<&'static str>::from).collect();
            ModoosError::validation(format!(
                "Unknown category '{}'. Valid: {}",
                raw,
                valid.join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RecruitStatus {
    #[default]
    Recruiting,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: RecruitStatus,
    pub writer_id: i64,
    pub participants: i32,
    pub total_participants: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Study {
    /// 是否为该会员发布的帖子；匿名访问恒为 false
    pub fn is_written_by(&self, member_id: Option<i64>) -> bool {
        member_id.is_some_and(|id| id == self.writer_id)
    }
}

/// 写入新招募帖
#[derive(Debug, Clone)]
pub struct NewStudy {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub writer_id: i64,
    pub total_participants: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(Category::parse("programming").unwrap(), Category::Programming);
        assert_eq!(Category::parse(" LANGUAGE ").unwrap(), Category::Language);
        assert_eq!(Category::Certificate.as_ref(), "CERTIFICATE");
    }

    #[test]
    fn test_category_parse_unknown() {
        let err = Category::parse("cooking").unwrap_err();
        assert!(matches!(err, ModoosError::Validation(_)));
        assert!(err.message().contains("PROGRAMMING"));
    }

    #[test]
    fn test_is_written_by() {
        let study = Study {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            category: Category::Etc,
            status: RecruitStatus::Recruiting,
            writer_id: 7,
            participants: 0,
            total_participants: 4,
            view_count: 0,
            like_count: 0,
            created_at: Utc::now(),
        };
        assert!(study.is_written_by(Some(7)));
        assert!(!study.is_written_by(Some(8)));
        assert!(!study.is_written_by(None));
    }
}
