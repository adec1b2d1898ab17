use std::path::PathBuf;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::{AppState, middleware::log_errors, routes};

// 案件查询相关的路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/case-status/{receipt_number}",
            get(routes::case_status::get_case_status),
        )
        .route("/test-connection", get(routes::case_status::test_connection))
}

// 创建主路由：/api 之外的路径交给静态前端，找不到文件时返回 index.html
pub fn create_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.static_dir);
    let index = static_dir.join("index.html");

    Router::new()
        .nest("/api", api_routes())
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(log_errors)),
        )
        .with_state(state)
}
