//! Verification-code email delivery

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::errors::{ModoosError, Result};
use crate::services::token_store::{TokenStore, keys};
use crate::utils::generate_verification_code;

pub const VERIFICATION_CODE_LENGTH: usize = 8;

/// 校验邮箱语法并返回规范形式
pub fn parse_email(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| ModoosError::validation(format!("Invalid email '{}': {}", raw, e)))
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body_html: &str, body_text: &str)
    -> Result<()>;
}

pub struct SmtpEmailSender {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = if config.insecure {
            warn!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "Using unencrypted SMTP transport"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

            match (config.username.is_empty(), config.password.is_empty()) {
                (true, true) => builder.build(),
                (false, false) => builder
                    .credentials(Credentials::new(
                        config.username.clone(),
                        config.password.clone(),
                    ))
                    .build(),
                _ => {
                    return Err(ModoosError::validation(
                        "mail.username and mail.password must both be set or both be empty",
                    ));
                }
            }
        };

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| ModoosError::validation(format!("Invalid mail.from_address: {}", e)))?;

        Ok(Self { from, transport })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body_html: &str,
        body_text: &str,
    ) -> Result<()> {
        let to_mailbox = Mailbox::new(None, parse_email(to)?);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                body_text.to_owned(),
                body_html.to_owned(),
            ))?;

        self.transport.send(message).await?;
        info!("Email sent to {} ({})", to, subject);
        Ok(())
    }
}

/// 不发信，只写日志；mail.enabled = false 时和测试中使用
#[derive(Default)]
pub struct LoggingEmailSender {
    should_fail: bool,
}

impl LoggingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        _body_html: &str,
        body_text: &str,
    ) -> Result<()> {
        if self.should_fail {
            warn!(to = to, subject = subject, "Simulated mail delivery failure");
            return Err(ModoosError::mail_delivery("mail delivery failed"));
        }

        info!(to = to, subject = subject, "Mail (not sent): {}", body_text);
        Ok(())
    }
}

pub fn create_email_sender(config: &MailConfig) -> Result<Arc<dyn EmailSender>> {
    if config.enabled {
        Ok(Arc::new(SmtpEmailSender::new(config)?))
    } else {
        info!("Mail delivery disabled, verification codes are logged only");
        Ok(Arc::new(LoggingEmailSender::new()))
    }
}

pub struct EmailService {
    sender: Arc<dyn EmailSender>,
    store: Arc<dyn TokenStore>,
    code_ttl: Duration,
}

impl EmailService {
    pub fn new(sender: Arc<dyn EmailSender>, store: Arc<dyn TokenStore>, code_ttl: Duration) -> Self {
        Self {
            sender,
            store,
            code_ttl,
        }
    }

    /// 生成验证码、保存并发送，返回验证码
    pub async fn send_verification_code(&self, email: &str) -> Result<String> {
        let address = parse_email(email)?;
        let email = address.as_ref();
        let code = generate_verification_code(VERIFICATION_CODE_LENGTH);

        self.store
            .set(&keys::email_verification(email), &code, self.code_ttl)
            .await?;

        let minutes = (self.code_ttl.as_secs() / 60).max(1);
        let text = format!(
            "modoos 인증 코드: {}\n{}분 안에 입력해 주세요.",
            code, minutes
        );
        let html = format!(
            "<div style=\"font-family:sans-serif\">\
             <h2>modoos 이메일 인증</h2>\
             <p>아래 인증 코드를 입력해 주세요.</p>\
             <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{}</p>\
             <p>코드는 {}분 동안 유효합니다.</p></div>",
            code, minutes
        );

        if let Err(e) = self
            .sender
            .send_email(email, "[modoos] 이메일 인증 코드", &html, &text)
            .await
        {
            // 发送失败的验证码不能留在存储里
            if let Err(del_err) = self.store.delete(&keys::email_verification(email)).await {
                warn!("Failed to discard undelivered verification code for {}: {}", email, del_err);
            }
            return Err(match e {
                ModoosError::Validation(_) => e,
                other => ModoosError::mail_delivery(other.message().to_string()),
            });
        }

        Ok(code)
    }

    /// 常数时间比较，匹配后删除验证码
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<bool> {
        let address = parse_email(email)?;
        let key = keys::email_verification(address.as_ref());

        let Some(stored) = self.store.get(&key).await? else {
            return Ok(false);
        };

        let matched: bool = stored.as_bytes().ct_eq(code.trim().as_bytes()).into();
        if matched {
            self.store.delete(&key).await?;
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::token_store::MemoryTokenStore;

    fn service(sender: LoggingEmailSender) -> (EmailService, Arc<dyn TokenStore>) {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
        let svc = EmailService::new(Arc::new(sender), store.clone(), Duration::from_secs(300));
        (svc, store)
    }

    #[test]
    fn test_parse_email() {
        assert!(parse_email("user@modoos.dev").is_ok());
        assert!(parse_email(" user@modoos.dev ").is_ok());
        assert!(parse_email("not-an-email").is_err());
        assert!(parse_email("").is_err());
    }

    #[tokio::test]
    async fn test_code_is_stored_and_consumed() {
        let (svc, store) = service(LoggingEmailSender::new());
        let code = svc.send_verification_code("user@modoos.dev").await.unwrap();
        assert_eq!(code.len(), VERIFICATION_CODE_LENGTH);
        assert_eq!(
            store.get("EV:user@modoos.dev").await.unwrap().as_deref(),
            Some(code.as_str())
        );

        assert!(!svc.verify_code("user@modoos.dev", "wrong123").await.unwrap());
        assert!(svc.verify_code("user@modoos.dev", &code).await.unwrap());
        // 已被消费
        assert!(!svc.verify_code("user@modoos.dev", &code).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let (svc, _) = service(LoggingEmailSender::new());
        let err = svc.send_verification_code("nope").await.unwrap_err();
        assert!(matches!(err, ModoosError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delivery_failure_discards_code() {
        let (svc, store) = service(LoggingEmailSender::failing());
        let err = svc.send_verification_code("user@modoos.dev").await.unwrap_err();
        assert!(matches!(err, ModoosError::MailDelivery(_)));
        assert_eq!(store.get("EV:user@modoos.dev").await.unwrap(), None);
    }

    #[test]
    fn test_disabled_mail_uses_logging_sender() {
        assert!(create_email_sender(&MailConfig::default()).is_ok());
    }
}
