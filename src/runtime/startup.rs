use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::config::StaticConfig;
use crate::errors::Result;
use crate::services::{
    AuthService, EmailSender, EmailService, MemberService, StudyService, TokenStore,
    create_email_sender, create_token_store,
};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 各 worker 共享的服务实例
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<SeaOrmStorage>,
    pub token_store: Arc<dyn TokenStore>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<EmailService>,
    pub member_service: Arc<MemberService>,
    pub study_service: Arc<StudyService>,
}

impl AppContext {
    /// 连接数据库（含迁移）与令牌存储，按配置选择邮件发送方式
    pub async fn build(config: &StaticConfig) -> Result<Self> {
        let sender = create_email_sender(&config.mail)?;
        Self::build_with_sender(config, sender).await
    }

    pub async fn build_with_sender(
        config: &StaticConfig,
        sender: Arc<dyn EmailSender>,
    ) -> Result<Self> {
        let start_time = std::time::Instant::now();

        let storage = StorageFactory::create(&config.database).await?;
        info!("Using storage backend: {}", storage.backend_name());

        let token_store = create_token_store(&config.token_store).await?;

        let auth_service = Arc::new(AuthService::new(
            JwtService::from_config(&config.auth),
            token_store.clone(),
            storage.clone(),
        ));
        let email_service = Arc::new(EmailService::new(
            sender,
            token_store.clone(),
            Duration::from_secs(config.mail.code_ttl_secs),
        ));
        let member_service = Arc::new(MemberService::new(storage.clone()));
        let study_service = Arc::new(StudyService::new(storage.clone()));

        debug!("Application context ready in {:?}", start_time.elapsed());
        Ok(Self {
            storage,
            token_store,
            auth_service,
            email_service,
            member_service,
            study_service,
        })
    }

    /// 注册 app_data，供 `App::configure` 使用
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.token_store.clone()))
            .app_data(web::Data::new(self.auth_service.clone()))
            .app_data(web::Data::new(self.email_service.clone()))
            .app_data(web::Data::new(self.member_service.clone()))
            .app_data(web::Data::new(self.study_service.clone()));
    }
}
