//! Member accounts

use std::sync::Arc;

use tracing::info;

use crate::errors::{ModoosError, Result};
use crate::services::email_service::parse_email;
use crate::storage::{Member, NewMember, SeaOrmStorage};
use crate::utils::password::hash_password;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 64;
pub const MAX_NICKNAME_LEN: usize = 20;

pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(ModoosError::validation(format!(
            "Password must be {}-{} characters",
            MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
        )));
    }
    if password.chars().any(char::is_whitespace) {
        return Err(ModoosError::validation("Password must not contain whitespace"));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct JoinMember {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

pub struct MemberService {
    storage: Arc<SeaOrmStorage>,
}

impl MemberService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn join(&self, req: JoinMember) -> Result<Member> {
        let email = parse_email(&req.email)?.to_string();
        validate_password(&req.password)?;

        let nickname = req.nickname.trim();
        if nickname.is_empty() || nickname.chars().count() > MAX_NICKNAME_LEN {
            return Err(ModoosError::validation(format!(
                "Nickname must be 1-{} characters",
                MAX_NICKNAME_LEN
            )));
        }

        if self.storage.exists_member_by_email(&email).await? {
            return Err(ModoosError::conflict(format!(
                "Email already registered: {}",
                email
            )));
        }

        self.storage
            .insert_member(NewMember {
                email,
                password_hash: hash_password(&req.password)?,
                nickname: nickname.to_string(),
            })
            .await
    }

    /// 邮箱已被使用时返回 true
    pub async fn email_check(&self, email: &str) -> Result<bool> {
        let email = parse_email(email)?;
        self.storage.exists_member_by_email(email.as_ref()).await
    }

    pub async fn change_password(&self, email: &str, password: &str) -> Result<()> {
        let email = parse_email(email)?;
        validate_password(password)?;

        let hash = hash_password(password)?;
        self.storage
            .update_member_password(email.as_ref(), &hash)
            .await?;

        info!("Member password changed: {}", email);
        Ok(())
    }
}
