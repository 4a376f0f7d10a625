//! Recruit API tests
//!
//! Slice search (filters, sorting, paging), the latest post, and posting with
//! or without a member token.

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};
use tempfile::TempDir;

use modoos::api::services::{ApiResponse, api_routes};
use modoos::config::{get_config, init_config};
use modoos::runtime::AppContext;
use modoos::services::{CreateRecruit, JoinMember, LoggingEmailSender};
use modoos::storage::Category;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

const WRITER: &str = "writer@modoos.dev";
const READER: &str = "reader@modoos.dev";
const PASSWORD: &str = "recruit-pass-1";

struct TestEnv {
    ctx: AppContext,
    writer_id: i64,
    reader_id: i64,
    _dir: TempDir,
}

async fn empty_env() -> TestEnv {
    INIT.call_once(init_config);

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = (*get_config()).clone();
    config.database.database_url =
        format!("sqlite://{}?mode=rwc", dir.path().join("recruit_test.db").display());
    config.auth.jwt_secret = "recruit-api-test-secret".to_string();

    let ctx = AppContext::build_with_sender(&config, Arc::new(LoggingEmailSender::new()))
        .await
        .expect("Failed to build app context");

    let mut ids = Vec::new();
    for (email, nickname) in [(WRITER, "writer"), (READER, "reader")] {
        let member = ctx
            .member_service
            .join(JoinMember {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                nickname: nickname.to_string(),
            })
            .await
            .expect("Failed to seed member");
        ids.push(member.id);
    }

    TestEnv {
        ctx,
        writer_id: ids[0],
        reader_id: ids[1],
        _dir: dir,
    }
}

/// 按插入顺序 id 为 1..=5
async fn seeded_env() -> TestEnv {
    let env = empty_env().await;
    let posts = [
        (env.writer_id, "Rust study", Category::Programming, 4),
        (env.writer_id, "English 100%", Category::Language, 6),
        (env.writer_id, "Hiking", Category::Hobby, 10),
        (env.reader_id, "TOEIC prep", Category::Certificate, 3),
        (env.reader_id, "rust async", Category::Programming, 5),
    ];
    for (writer, title, category, total) in posts {
        env.ctx
            .study_service
            .create_recruit(
                writer,
                CreateRecruit {
                    title: title.to_string(),
                    description: format!("{} description", title),
                    category,
                    total_participants: total,
                },
            )
            .await
            .expect("Failed to seed study");
    }
    env
}

macro_rules! recruit_app {
    ($env:expr) => {{
        let ctx = $env.ctx.clone();
        test::init_service(
            App::new()
                .configure(move |cfg| ctx.register(cfg))
                .service(api_routes()),
        )
        .await
    }};
}

async fn bearer_for(env: &TestEnv, email: &str) -> String {
    let pair = env
        .ctx
        .auth_service
        .login(email, PASSWORD)
        .await
        .expect("login failed");
    format!("Bearer {}", pair.access_token)
}

fn content(body: &ApiResponse<Value>) -> Vec<Value> {
    body.data.as_ref().unwrap()["content"]
        .as_array()
        .cloned()
        .unwrap()
}

fn ids(items: &[Value]) -> Vec<i64> {
    items.iter().map(|v| v["id"].as_i64().unwrap()).collect()
}

macro_rules! get_slice {
    ($app:expr, $uri:expr) => {{
        let req = TestRequest::get().uri($uri).to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", $uri);
        let body: ApiResponse<Value> = test::read_body_json(resp).await;
        assert_eq!(body.code, 0);
        body
    }};
}

// =============================================================================
// Slice search
// =============================================================================

#[tokio::test]
async fn test_default_slice_is_newest_first() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit");
    let items = content(&body);
    assert_eq!(ids(&items), vec![5, 4, 3, 2, 1]);
    assert!(items.iter().all(|v| v["isWriter"] == json!(false)));

    let data = body.data.unwrap();
    assert_eq!(data["hasNext"], json!(false));
    assert_eq!(data["first"], json!(true));
    assert_eq!(data["numberOfElements"], json!(5));
    assert_eq!(items[0]["totalParticipants"], json!(5));
    assert_eq!(items[0]["category"], json!("PROGRAMMING"));
}

#[tokio::test]
async fn test_is_writer_follows_token() {
    let env = seeded_env().await;
    let app = recruit_app!(env);
    let token = bearer_for(&env, WRITER).await;

    let req = TestRequest::get()
        .uri("/api/recruit?sort=id,asc")
        .insert_header((AUTHORIZATION, token))
        .to_request();
    let body: ApiResponse<Value> = test::call_and_read_body_json(&app, req).await;
    let flags: Vec<bool> = content(&body)
        .iter()
        .map(|v| v["isWriter"].as_bool().unwrap())
        .collect();
    assert_eq!(flags, vec![true, true, true, false, false]);
}

#[tokio::test]
async fn test_invalid_token_reads_anonymously() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let req = TestRequest::get()
        .uri("/api/recruit")
        .insert_header((AUTHORIZATION, "Bearer garbage.token.value"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert!(content(&body).iter().all(|v| v["isWriter"] == json!(false)));
}

#[tokio::test]
async fn test_title_filter() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit?title=rust");
    assert_eq!(ids(&content(&body)), vec![5, 1]);

    // % 按字面匹配
    let body = get_slice!(app, "/api/recruit?title=%25");
    assert_eq!(ids(&content(&body)), vec![2]);

    // 首尾空白也是子串的一部分
    let body = get_slice!(app, "/api/recruit?title=study%20");
    assert!(content(&body).is_empty());
    let body = get_slice!(app, "/api/recruit?title=%20study");
    assert_eq!(ids(&content(&body)), vec![1]);

    // 空白标题视为不过滤
    let body = get_slice!(app, "/api/recruit?title=%20%20");
    assert_eq!(content(&body).len(), 5);
}

#[tokio::test]
async fn test_category_filter() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit?category=PROGRAMMING,hobby");
    assert_eq!(ids(&content(&body)), vec![5, 3, 1]);

    let body = get_slice!(app, "/api/recruit?category=LANGUAGE&category=CERTIFICATE");
    assert_eq!(ids(&content(&body)), vec![4, 2]);

    let body = get_slice!(app, "/api/recruit?category=programming&title=study");
    assert_eq!(ids(&content(&body)), vec![1]);

    let req = TestRequest::get()
        .uri("/api/recruit?category=COOKING")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sorting() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit?sort=totalParticipants,desc");
    assert_eq!(ids(&content(&body)), vec![3, 2, 5, 1, 4]);

    let body = get_slice!(app, "/api/recruit?sort=id,asc");
    assert_eq!(ids(&content(&body)), vec![1, 2, 3, 4, 5]);

    for uri in ["/api/recruit?sort=password", "/api/recruit?sort=id,sideways"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "GET {}", uri);
    }
}

#[tokio::test]
async fn test_paging_reports_has_next() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit?page=0&size=2");
    let data = body.data.clone().unwrap();
    assert_eq!(ids(&content(&body)), vec![5, 4]);
    assert_eq!(data["hasNext"], json!(true));
    assert_eq!(data["size"], json!(2));

    let body = get_slice!(app, "/api/recruit?page=2&size=2");
    let data = body.data.clone().unwrap();
    assert_eq!(ids(&content(&body)), vec![1]);
    assert_eq!(data["hasNext"], json!(false));
    assert_eq!(data["last"], json!(true));
    assert_eq!(data["first"], json!(false));

    let body = get_slice!(app, "/api/recruit?page=9&size=2");
    assert_eq!(body.data.unwrap()["empty"], json!(true));
}

#[tokio::test]
async fn test_huge_page_returns_empty_slice() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit?page=9223372036854775807&size=100");
    let data = body.data.unwrap();
    assert_eq!(data["empty"], json!(true));
    assert_eq!(data["hasNext"], json!(false));

    // 超出 i64 的页码是参数错误
    let req = TestRequest::get()
        .uri("/api/recruit?page=99999999999999999999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_last_id_cursor() {
    let env = seeded_env().await;
    let app = recruit_app!(env);

    let body = get_slice!(app, "/api/recruit?lastId=3");
    assert_eq!(ids(&content(&body)), vec![2, 1]);

    let body = get_slice!(app, "/api/recruit?lastId=1");
    assert!(content(&body).is_empty());
}

// =============================================================================
// Latest
// =============================================================================

#[tokio::test]
async fn test_latest_recruit() {
    let env = empty_env().await;
    let app = recruit_app!(env);

    let req = TestRequest::get().uri("/api/recruit/latest").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 4000);

    env.ctx
        .study_service
        .create_recruit(
            env.reader_id,
            CreateRecruit {
                title: "Only one".to_string(),
                description: String::new(),
                category: Category::Etc,
                total_participants: 2,
            },
        )
        .await
        .unwrap();

    let token = bearer_for(&env, READER).await;
    let req = TestRequest::get()
        .uri("/api/recruit/latest")
        .insert_header((AUTHORIZATION, token))
        .to_request();
    let body: ApiResponse<Value> = test::call_and_read_body_json(&app, req).await;
    let data = body.data.unwrap();
    assert_eq!(data["title"], json!("Only one"));
    assert_eq!(data["isWriter"], json!(true));
    assert_eq!(data["status"], json!("RECRUITING"));
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_requires_member() {
    let env = empty_env().await;
    let app = recruit_app!(env);

    let req = TestRequest::post()
        .uri("/api/recruit")
        .set_json(json!({
            "title": "Anonymous post",
            "category": "ETC",
            "totalParticipants": 3,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 1001);
}

#[tokio::test]
async fn test_create_recruit() {
    let env = empty_env().await;
    let app = recruit_app!(env);
    let token = bearer_for(&env, WRITER).await;

    let req = TestRequest::post()
        .uri("/api/recruit")
        .insert_header((AUTHORIZATION, token.clone()))
        .set_json(json!({
            "title": "  Weekend algorithms  ",
            "description": "two problems a week",
            "category": "programming",
            "totalParticipants": 6,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: ApiResponse<Value> = test::read_body_json(resp).await;
    let id = body.data.unwrap()["id"].as_i64().unwrap();

    let study = env.ctx.storage.find_study_by_id(id).await.unwrap().unwrap();
    assert_eq!(study.title, "Weekend algorithms");
    assert_eq!(study.writer_id, env.writer_id);
    assert_eq!(study.participants, 0);

    let req = TestRequest::get()
        .uri("/api/recruit")
        .insert_header((AUTHORIZATION, token))
        .to_request();
    let body: ApiResponse<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(content(&body)[0]["isWriter"], json!(true));
}

#[tokio::test]
async fn test_create_recruit_validation() {
    let env = empty_env().await;
    let app = recruit_app!(env);
    let token = bearer_for(&env, WRITER).await;

    let bad_bodies = [
        json!({ "title": "Solo", "category": "ETC", "totalParticipants": 1 }),
        json!({ "title": "   ", "category": "ETC", "totalParticipants": 3 }),
        json!({ "title": "Cooking", "category": "COOKING", "totalParticipants": 3 }),
        json!({ "title": "Missing total", "category": "ETC" }),
    ];

    for body in bad_bodies {
        let req = TestRequest::post()
            .uri("/api/recruit")
            .insert_header((AUTHORIZATION, token.clone()))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    assert!(env.ctx.study_service.find_max_recruit_idx().await.unwrap().is_none());
}
