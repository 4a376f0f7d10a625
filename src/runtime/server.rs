//! Server mode

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{debug, error, warn};

use crate::api::services::{api_routes, health_routes};
use crate::config::{CorsConfig, get_config};
use crate::runtime::AppContext;
use crate::system::shutdown::listen_for_shutdown;

fn validate_cors_config(cors: &CorsConfig) {
    if !cors.enabled {
        return;
    }
    if cors.allowed_origins.is_empty() {
        warn!("CORS enabled but allowed_origins is empty, cross-origin requests will be rejected");
    }
    if cors.allowed_origins.iter().any(|o| o == "*") && cors.allow_credentials {
        error!("CORS: '*' origin with credentials is not allowed, credentials disabled");
    }
}

/// Authorization 头需要暴露给前端（登录与 reissue 通过它下发 AT）
fn build_cors_middleware(cors: &CorsConfig) -> Cors {
    if !cors.enabled {
        return Cors::default();
    }

    let any_origin = cors.allowed_origins.iter().any(|o| o == "*");
    let mut middleware = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(cors.max_age);

    if any_origin {
        middleware = middleware.allow_any_origin();
    } else {
        for origin in &cors.allowed_origins {
            middleware = middleware.allowed_origin(origin);
        }
    }

    if cors.allow_credentials && !any_origin {
        middleware = middleware.supports_credentials();
    }

    middleware
}

/// 多个 TLS 后端同时启用时需要显式选择 provider
fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// 启动 HTTP 服务直到收到退出信号
///
/// 调用前必须已初始化日志与配置。
pub async fn run_server() -> Result<()> {
    install_crypto_provider();

    let config = get_config();
    let context = AppContext::build(&config)
        .await
        .context("Server startup failed")?;

    if config.auth.jwt_secret.is_empty() {
        warn!("Tokens will not survive a restart until auth.jwt_secret is configured");
    }

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        let ctx = context.clone();
        App::new()
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .configure(move |cfg| ctx.register(cfg))
            .app_data(web::PayloadConfig::new(256 * 1024))
            .service(health_routes())
            .service(api_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpResponse, test};

    #[actix_rt::test]
    async fn test_cors_exposes_authorization_header() {
        let cors = CorsConfig {
            enabled: true,
            allowed_origins: vec!["https://modoos.dev".into()],
            ..Default::default()
        };
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&cors))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://modoos.dev"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let exposed = resp
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(exposed.contains("authorization"));
    }
}
