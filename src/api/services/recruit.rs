//! 招募帖端点 `/api/recruit`

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use tracing::trace;

use crate::api::jwt::TokenSubject;
use crate::config::{RecruitConfig, get_config};
use crate::errors::{ModoosError, Result};
use crate::services::{CreateRecruit, StudyService};
use crate::storage::{Category, Pageable, SortOrder, StudyFilter};

use super::error_code::ErrorCode;
use super::helpers::{created_response, error_from_modoos, error_response, success_response};
use super::types::{CreateRecruitRequest, CreatedResponse, RecruitInfoResponse};

fn parse_number(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ModoosError::validation(format!("'{}' must be an integer, got '{}'", key, raw)))
}

/// 解析查询串：`page`、`size`、重复的 `sort`、`title`、`category`（可重复或逗号分隔）、`lastId`
pub fn parse_recruit_query(query: &str, limits: &RecruitConfig) -> Result<(StudyFilter, Pageable)> {
    let mut filter = StudyFilter::default();
    let mut page: i64 = 0;
    let mut size: i64 = limits.default_page_size as i64;
    let mut sort = Vec::new();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "page" => page = parse_number("page", &value)?,
            "size" => size = parse_number("size", &value)?,
            "sort" => sort.push(SortOrder::parse(&value)?),
            "title" => filter.title = Some(value.into_owned()),
            "category" => {
                for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                    let category = Category::parse(name)?;
                    if !filter.categories.contains(&category) {
                        filter.categories.push(category);
                    }
                }
            }
            "lastId" | "last_id" => filter.last_id = Some(parse_number("lastId", &value)?),
            other => trace!("Ignoring unknown recruit query parameter: {}", other),
        }
    }

    let max_size = limits.max_page_size.max(1) as i64;
    let mut pageable = Pageable::new(page.max(0) as u64, size.clamp(1, max_size) as u64);
    pageable.sort = sort;
    Ok((filter, pageable))
}

pub async fn get_recruit(
    req: HttpRequest,
    studies: web::Data<Arc<StudyService>>,
    member: Option<web::ReqData<TokenSubject>>,
) -> ActixResult<impl Responder> {
    let (filter, pageable) = match parse_recruit_query(req.query_string(), &get_config().recruit) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(error_from_modoos(&e)),
    };
    let member_id = member.map(|m| m.member_id);

    match studies
        .get_slice_of_recruit(member_id, &filter, &pageable)
        .await
    {
        Ok(slice) => Ok(success_response(
            slice.map(|(study, is_writer)| RecruitInfoResponse::new(study, is_writer)),
        )),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

pub async fn get_latest_recruit(
    studies: web::Data<Arc<StudyService>>,
    member: Option<web::ReqData<TokenSubject>>,
) -> ActixResult<impl Responder> {
    let member_id = member.map(|m| m.member_id);

    match studies.find_max_recruit_idx().await {
        Ok(Some(study)) => {
            let is_writer = study.is_written_by(member_id);
            Ok(success_response(RecruitInfoResponse::new(study, is_writer)))
        }
        Ok(None) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::RecruitNotFound,
            "No recruit posts yet",
        )),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

pub async fn create_recruit(
    studies: web::Data<Arc<StudyService>>,
    member: web::ReqData<TokenSubject>,
    body: web::Json<CreateRecruitRequest>,
) -> ActixResult<impl Responder> {
    let result = match CreateRecruit::try_from(body.into_inner()) {
        Ok(create) => studies.create_recruit(member.member_id, create).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(study) => Ok(created_response(CreatedResponse { id: study.id })),
        Err(e) => Ok(error_from_modoos(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Direction;

    fn limits() -> RecruitConfig {
        RecruitConfig {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_defaults() {
        let (filter, pageable) = parse_recruit_query("", &limits()).unwrap();
        assert_eq!(pageable.page, 0);
        assert_eq!(pageable.size, 20);
        assert!(pageable.sort.is_empty());
        assert!(filter.title.is_none());
        assert!(filter.categories.is_empty());
        assert!(filter.last_id.is_none());
    }

    #[test]
    fn test_page_and_size_are_clamped() {
        let (_, pageable) = parse_recruit_query("page=-3&size=500", &limits()).unwrap();
        assert_eq!(pageable.page, 0);
        assert_eq!(pageable.size, 100);

        let (_, pageable) = parse_recruit_query("size=0", &limits()).unwrap();
        assert_eq!(pageable.size, 1);
    }

    #[test]
    fn test_repeated_sort_and_categories() {
        let (filter, pageable) = parse_recruit_query(
            "sort=viewCount,desc&sort=title&category=programming,LANGUAGE&category=hobby&category=hobby",
            &limits(),
        )
        .unwrap();

        assert_eq!(pageable.sort.len(), 2);
        assert_eq!(pageable.sort[0].property, "viewCount");
        assert_eq!(pageable.sort[0].direction, Direction::Desc);
        assert_eq!(pageable.sort[1].direction, Direction::Asc);
        assert_eq!(
            filter.categories,
            vec![Category::Programming, Category::Language, Category::Hobby]
        );
    }

    #[test]
    fn test_title_is_url_decoded() {
        let (filter, _) =
            parse_recruit_query("title=%EC%8A%A4%ED%84%B0%EB%94%94+rust&lastId=50", &limits())
                .unwrap();
        assert_eq!(filter.title.as_deref(), Some("스터디 rust"));
        assert_eq!(filter.last_id, Some(50));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse_recruit_query("page=abc", &limits()).is_err());
        assert!(parse_recruit_query("category=cooking", &limits()).is_err());
        assert!(parse_recruit_query("sort=id,up", &limits()).is_err());
    }
}
