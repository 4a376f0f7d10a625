use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Access / Refresh 共用的 claims 布局
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 会员邮箱
    pub sub: String,
    /// 会员 id
    pub mid: i64,
    /// 权限
    pub auth: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// 与 jsonwebtoken（leeway = 0）一致：exp 当秒仍然有效
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }

    /// 距离过期的剩余秒数，已过期为 0
    pub fn remaining_secs(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }
}

/// 令牌所属会员
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub email: String,
    pub member_id: i64,
    pub role: String,
}

impl From<&TokenClaims> for TokenSubject {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            email: claims.sub.clone(),
            member_id: claims.mid,
            role: claims.auth.clone(),
        }
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    /// 未配置 secret 时生成随机值（重启后旧令牌全部失效）
    pub fn from_config(auth: &AuthConfig) -> Self {
        let secret = if auth.jwt_secret.is_empty() {
            warn!("auth.jwt_secret is empty, generating a random secret");
            crate::utils::generate_secure_token(48)
        } else {
            auth.jwt_secret.clone()
        };

        Self::new(&secret, auth.access_token_minutes, auth.refresh_token_days)
    }

    pub fn access_token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.access_token_minutes * 60)
    }

    pub fn refresh_token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_token_days * 24 * 3600)
    }

    fn issue(&self, subject: &TokenSubject, token_type: &str, lifetime: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.email.clone(),
            mid: subject.member_id,
            auth: subject.role.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub fn generate_access_token(&self, subject: &TokenSubject) -> Result<String, JwtError> {
        self.issue(
            subject,
            ACCESS_TOKEN_TYPE,
            Duration::minutes(self.access_token_minutes as i64),
        )
    }

    pub fn generate_refresh_token(&self, subject: &TokenSubject) -> Result<String, JwtError> {
        self.issue(
            subject,
            REFRESH_TOKEN_TYPE,
            Duration::days(self.refresh_token_days as i64),
        )
    }

    fn decode_typed(&self, token: &str, token_type: &str, check_exp: bool) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = check_exp;

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        if data.claims.token_type != token_type {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(data.claims)
    }

    /// 签名、类型、过期时间全部校验
    pub fn validate_access_token(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.decode_typed(token, ACCESS_TOKEN_TYPE, true)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.decode_typed(token, REFRESH_TOKEN_TYPE, true)
    }

    /// 只校验签名和类型，忽略过期（reissue / logout 使用）
    pub fn decode_access_token_allow_expired(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.decode_typed(token, ACCESS_TOKEN_TYPE, false)
    }

    /// 签名有效但已过期时才需要 reissue
    pub fn is_reissue_required(&self, token: &str) -> bool {
        self.decode_access_token_allow_expired(token)
            .map(|claims| claims.is_expired())
            .unwrap_or(false)
    }
}
