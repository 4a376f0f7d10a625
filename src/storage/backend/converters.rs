use crate::errors::{ModoosError, Result};
use crate::storage::models::{Category, Member, NewMember, NewStudy, RecruitStatus, Study};
use migration::entities::{member, study};

pub fn model_to_member(model: member::Model) -> Member {
    Member {
        id: model.id,
        email: model.email,
        password: model.password,
        nickname: model.nickname,
        role: model.role,
        created_at: model.created_at,
    }
}

pub fn new_member_to_active_model(new: &NewMember, role: &str) -> member::ActiveModel {
    use sea_orm::ActiveValue::*;

    member::ActiveModel {
        id: NotSet,
        email: Set(new.email.clone()),
        password: Set(new.password_hash.clone()),
        nickname: Set(new.nickname.clone()),
        role: Set(role.to_string()),
        created_at: Set(chrono::Utc::now()),
    }
}

/// 数据库里的分类/状态是大写字符串，无法识别时视为数据损坏
pub fn model_to_study(model: study::Model) -> Result<Study> {
    let category = Category::parse(&model.category).map_err(|_| {
        ModoosError::database_operation(format!(
            "study {} has unknown category '{}'",
            model.id, model.category
        ))
    })?;
    let status = model.status.parse::<RecruitStatus>().map_err(|_| {
        ModoosError::database_operation(format!(
            "study {} has unknown status '{}'",
            model.id, model.status
        ))
    })?;

    Ok(Study {
        id: model.id,
        title: model.title,
        description: model.description,
        category,
        status,
        writer_id: model.writer_id,
        participants: model.participants,
        total_participants: model.total_participants,
        view_count: model.view_count,
        like_count: model.like_count,
        created_at: model.created_at,
    })
}

pub fn new_study_to_active_model(new: &NewStudy) -> study::ActiveModel {
    use sea_orm::ActiveValue::*;

    study::ActiveModel {
        id: NotSet,
        title: Set(new.title.clone()),
        description: Set(new.description.clone()),
        category: Set(new.category.as_ref().to_string()),
        status: Set(RecruitStatus::Recruiting.as_ref().to_string()),
        writer_id: Set(new.writer_id),
        participants: Set(0),
        total_participants: Set(new.total_participants),
        view_count: Set(0),
        like_count: Set(0),
        created_at: Set(chrono::Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn study_model(category: &str) -> study::Model {
        study::Model {
            id: 3,
            title: "Rust 스터디".into(),
            description: "주 2회".into(),
            category: category.into(),
            status: "RECRUITING".into(),
            writer_id: 1,
            participants: 2,
            total_participants: 6,
            view_count: 10,
            like_count: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_study() {
        let study = model_to_study(study_model("PROGRAMMING")).unwrap();
        assert_eq!(study.category, Category::Programming);
        assert_eq!(study.status, RecruitStatus::Recruiting);
        assert_eq!(study.total_participants, 6);
    }

    #[test]
    fn test_model_to_study_rejects_unknown_category() {
        let err = model_to_study(study_model("COOKING")).unwrap_err();
        assert!(matches!(err, ModoosError::DatabaseOperation(_)));
    }

    #[test]
    fn test_new_study_defaults() {
        let active = new_study_to_active_model(&NewStudy {
            title: "t".into(),
            description: "d".into(),
            category: Category::Hobby,
            writer_id: 9,
            total_participants: 4,
        });
        assert_eq!(active.category, ActiveValue::Set("HOBBY".to_string()));
        assert_eq!(active.status, ActiveValue::Set("RECRUITING".to_string()));
        assert_eq!(active.participants, ActiveValue::Set(0));
        assert!(matches!(active.id, ActiveValue::NotSet));
    }

    #[test]
    fn test_new_member_role() {
        let active = new_member_to_active_model(
            &NewMember {
                email: "a@b.com".into(),
                password_hash: "$argon2id$...".into(),
                nickname: "nick".into(),
            },
            "ROLE_USER",
        );
        assert_eq!(active.role, ActiveValue::Set("ROLE_USER".to_string()));
    }
}
