//! Access/refresh token lifecycle

use std::sync::Arc;
use std::time::Duration;

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::api::constants::BEARER_PREFIX;
use crate::api::jwt::{JwtService, TokenSubject};
use crate::errors::{ModoosError, Result};
use crate::services::token_store::{TokenStore, keys};
use crate::storage::SeaOrmStorage;
use crate::utils::password::verify_password;

/// 去掉 `Bearer ` 前缀；没有前缀或令牌为空返回 None
pub fn resolve_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    jwt: JwtService,
    store: Arc<dyn TokenStore>,
    storage: Arc<SeaOrmStorage>,
}

impl AuthService {
    pub fn new(jwt: JwtService, store: Arc<dyn TokenStore>, storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            jwt,
            store,
            storage,
        }
    }

    async fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair> {
        let access_token = self.jwt.generate_access_token(subject)?;
        let refresh_token = self.jwt.generate_refresh_token(subject)?;

        self.store
            .set(
                &keys::refresh_token(&subject.email),
                &refresh_token,
                self.jwt.refresh_token_ttl(),
            )
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 邮箱不存在与密码错误返回相同的错误
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let invalid = || ModoosError::auth_failed("Invalid email or password");

        let member = self
            .storage
            .find_member_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &member.password)? {
            warn!("Login failed for {}", member.email);
            return Err(invalid());
        }

        let subject = TokenSubject {
            email: member.email.clone(),
            member_id: member.id,
            role: member.role.clone(),
        };
        let pair = self.issue_pair(&subject).await?;

        info!("Member logged in: id={}", member.id);
        Ok(pair)
    }

    /// 签名有效但已过期时返回 true
    pub fn validate(&self, access_token: &str) -> bool {
        self.jwt.is_reissue_required(access_token)
    }

    /// 用 refresh token 轮换出新的令牌对
    pub async fn reissue(&self, access_token: &str, refresh_token: &str) -> Result<TokenPair> {
        let claims = self
            .jwt
            .decode_access_token_allow_expired(access_token)
            .map_err(|e| ModoosError::auth_failed(format!("Invalid access token: {}", e)))?;
        let subject = TokenSubject::from(&claims);
        let key = keys::refresh_token(&subject.email);

        let stored = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| ModoosError::auth_failed("No refresh token on record, login required"))?;

        let refresh_claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| ModoosError::auth_failed(format!("Invalid refresh token: {}", e)))?;
        if refresh_claims.sub != subject.email {
            return Err(ModoosError::auth_failed(
                "Refresh token does not belong to this member",
            ));
        }

        let matches: bool = stored.as_bytes().ct_eq(refresh_token.as_bytes()).into();
        if !matches {
            // 旧的 refresh token 被重放，作废当前会话
            warn!("Stale refresh token presented for {}, revoking", subject.email);
            self.store.delete(&key).await?;
            return Err(ModoosError::auth_failed(
                "Refresh token has been rotated, login required",
            ));
        }

        let pair = self.issue_pair(&subject).await?;
        debug!("Tokens reissued for member {}", subject.member_id);
        Ok(pair)
    }

    pub async fn logout(&self, access_token: &str) -> Result<()> {
        let claims = self
            .jwt
            .decode_access_token_allow_expired(access_token)
            .map_err(|e| ModoosError::token_invalid(format!("Invalid access token: {}", e)))?;

        self.store.delete(&keys::refresh_token(&claims.sub)).await?;

        if !claims.is_expired() {
            self.store
                .set(
                    &keys::blacklist(&claims.jti),
                    "logout",
                    Duration::from_secs(claims.remaining_secs().max(1)),
                )
                .await?;
        }

        info!("Member logged out: id={}", claims.mid);
        Ok(())
    }

    /// 受保护接口的令牌校验
    pub async fn authenticate(&self, access_token: &str) -> Result<TokenSubject> {
        let claims = self.jwt.validate_access_token(access_token)?;

        if self.store.exists(&keys::blacklist(&claims.jti)).await? {
            return Err(ModoosError::token_invalid("Token has been logged out"));
        }

        Ok(TokenSubject::from(&claims))
    }
}
