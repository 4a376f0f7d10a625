//! Member queries and mutations

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, SqlErr,
};
use tracing::{debug, info};

use super::converters::{model_to_member, new_member_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{ModoosError, Result};
use crate::storage::models::{DEFAULT_ROLE, Member, NewMember};

use migration::entities::member;

impl SeaOrmStorage {
    pub async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>> {
        let db = &self.db;
        let model = retry::with_retry("find_member_by_email", self.retry_config, || async {
            member::Entity::find()
                .filter(member::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await?;

        Ok(model.map(model_to_member))
    }

    pub async fn find_member_by_id(&self, id: i64) -> Result<Option<Member>> {
        let db = &self.db;
        let model = retry::with_retry("find_member_by_id", self.retry_config, || async {
            member::Entity::find_by_id(id).one(db).await
        })
        .await?;

        Ok(model.map(model_to_member))
    }

    pub async fn exists_member_by_email(&self, email: &str) -> Result<bool> {
        let db = &self.db;
        let count = retry::with_retry("exists_member_by_email", self.retry_config, || async {
            member::Entity::find()
                .filter(member::Column::Email.eq(email))
                .count(db)
                .await
        })
        .await?;

        Ok(count > 0)
    }

    /// 插入新会员，邮箱重复返回 Conflict
    pub async fn insert_member(&self, new: NewMember) -> Result<Member> {
        let active = new_member_to_active_model(&new, DEFAULT_ROLE);

        match active.insert(&self.db).await {
            Ok(model) => {
                info!("Member joined: id={} email={}", model.id, model.email);
                Ok(model_to_member(model))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!("Duplicate email on insert: {}", new.email);
                Err(ModoosError::conflict(format!(
                    "Email already registered: {}",
                    new.email
                )))
            }
            Err(e) => Err(ModoosError::database_operation(format!(
                "插入会员失败: {}",
                e
            ))),
        }
    }

    /// 更新密码哈希，邮箱不存在返回 NotFound
    pub async fn update_member_password(&self, email: &str, password_hash: &str) -> Result<()> {
        let result = member::Entity::update_many()
            .col_expr(member::Column::Password, Expr::value(password_hash))
            .filter(member::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .map_err(|e| ModoosError::database_operation(format!("更新密码失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(ModoosError::not_found(format!("Member not found: {}", email)));
        }

        info!("Password updated for {}", email);
        Ok(())
    }
}
