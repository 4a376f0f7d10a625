//! Recruit (study) queries

use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::{debug, info};

use super::converters::{model_to_study, new_study_to_active_model};
use super::{SeaOrmStorage, StudyFilter, retry};
use crate::errors::{ModoosError, Result};
use crate::storage::models::{NewStudy, Study};
use crate::storage::pagination::{Direction, Pageable, Slice};
use crate::utils::escape_like;

use migration::entities::study;

/// 可排序字段白名单（接受 camelCase 与 snake_case）
pub fn sort_column(property: &str) -> Option<study::Column> {
    let column = match property {
        "id" => study::Column::Id,
        "createdAt" | "created_at" => study::Column::CreatedAt,
        "title" => study::Column::Title,
        "viewCount" | "view_count" => study::Column::ViewCount,
        "likeCount" | "like_count" => study::Column::LikeCount,
        "participants" => study::Column::Participants,
        "totalParticipants" | "total_participants" => study::Column::TotalParticipants,
        _ => return None,
    };
    Some(column)
}

fn build_condition(filter: &StudyFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(title) = filter.effective_title() {
        let pattern = format!("%{}%", escape_like(title));
        condition = condition.add(study::Column::Title.like(LikeExpr::new(pattern).escape('\\')));
    }

    if !filter.categories.is_empty() {
        let names: Vec<String> = filter
            .categories
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        condition = condition.add(study::Column::Category.is_in(names));
    }

    if let Some(last_id) = filter.last_id {
        condition = condition.add(study::Column::Id.lt(last_id));
    }

    condition
}

fn resolve_orders(pageable: &Pageable) -> Result<Vec<(study::Column, Order)>> {
    if pageable.sort.is_empty() {
        return Ok(vec![(study::Column::Id, Order::Desc)]);
    }

    pageable
        .sort
        .iter()
        .map(|order| {
            let column = sort_column(&order.property).ok_or_else(|| {
                ModoosError::validation(format!("Unsupported sort property: {}", order.property))
            })?;
            let direction = match order.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            Ok((column, direction))
        })
        .collect()
}

impl SeaOrmStorage {
    /// 招募帖分页查询；每行附带是否为当前会员所写
    pub async fn get_slice_of_recruit(
        &self,
        member_id: Option<i64>,
        filter: &StudyFilter,
        pageable: &Pageable,
    ) -> Result<Slice<(Study, bool)>> {
        let orders = resolve_orders(pageable)?;
        let condition = build_condition(filter);
        let db = &self.db;

        debug!(
            "recruit slice: filter={:?} page={} size={} orders={}",
            filter,
            pageable.page,
            pageable.size,
            orders.len()
        );

        let models = retry::with_retry("get_slice_of_recruit", self.retry_config, || {
            let mut query = study::Entity::find().filter(condition.clone());
            for (column, order) in &orders {
                query = query.order_by(*column, order.clone());
            }
            query
                .offset(pageable.offset())
                .limit(pageable.size + 1)
                .all(db)
        })
        .await?;

        let rows = models
            .into_iter()
            .map(|model| {
                let study = model_to_study(model)?;
                let is_writer = study.is_written_by(member_id);
                Ok((study, is_writer))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Slice::from_overfetched(rows, pageable))
    }

    /// id 最大的招募帖
    pub async fn find_max_recruit_idx(&self) -> Result<Option<Study>> {
        let db = &self.db;
        let model = retry::with_retry("find_max_recruit_idx", self.retry_config, || async {
            study::Entity::find()
                .order_by_desc(study::Column::Id)
                .one(db)
                .await
        })
        .await?;

        model.map(model_to_study).transpose()
    }

    pub async fn find_study_by_id(&self, id: i64) -> Result<Option<Study>> {
        let db = &self.db;
        let model = retry::with_retry("find_study_by_id", self.retry_config, || async {
            study::Entity::find_by_id(id).one(db).await
        })
        .await?;

        model.map(model_to_study).transpose()
    }

    pub async fn insert_study(&self, new: NewStudy) -> Result<Study> {
        let model = new_study_to_active_model(&new)
            .insert(&self.db)
            .await
            .map_err(|e| ModoosError::database_operation(format!("创建招募帖失败: {}", e)))?;

        info!(
            "Recruit created: id={} writer={} category={}",
            model.id, model.writer_id, model.category
        );
        model_to_study(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Category;
    use crate::storage::pagination::SortOrder;
    use sea_orm::IdenStatic;

    fn names(orders: &[(study::Column, Order)]) -> Vec<(&'static str, bool)> {
        orders
            .iter()
            .map(|(c, o)| (c.as_str(), matches!(o, Order::Desc)))
            .collect()
    }

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column("createdAt").map(|c| c.as_str()), Some("created_at"));
        assert_eq!(
            sort_column("total_participants").map(|c| c.as_str()),
            Some("total_participants")
        );
        assert!(sort_column("password").is_none());
        assert!(sort_column("writerId").is_none());
    }

    #[test]
    fn test_default_order_is_id_desc() {
        let orders = resolve_orders(&Pageable::new(0, 10)).unwrap();
        assert_eq!(names(&orders), vec![("id", true)]);
    }

    #[test]
    fn test_orders_follow_pageable() {
        let pageable = Pageable::new(0, 10)
            .with_sort(SortOrder::desc("viewCount"))
            .with_sort(SortOrder::asc("title"));
        let orders = resolve_orders(&pageable).unwrap();
        assert_eq!(names(&orders), vec![("view_count", true), ("title", false)]);
    }

    #[test]
    fn test_unknown_sort_is_validation_error() {
        let pageable = Pageable::new(0, 10).with_sort(SortOrder::asc("writer"));
        assert!(matches!(
            resolve_orders(&pageable),
            Err(ModoosError::Validation(_))
        ));
    }

    #[test]
    fn test_condition_skips_blank_title_and_empty_categories() {
        let blank = StudyFilter {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(build_condition(&blank).is_empty());

        let full = StudyFilter {
            title: Some("rust".into()),
            categories: vec![Category::Programming, Category::Language],
            last_id: Some(10),
        };
        assert_eq!(build_condition(&full).len(), 3);
    }
}
