use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::report::{show_report_list, submit_report};

const SCREENSHOT_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_report_routers() -> Router<AppRegistry> {
    Router::new()
        .route(
            "/reporte",
            post(submit_report).layer(DefaultBodyLimit::max(SCREENSHOT_BODY_LIMIT)),
        )
        .route("/reportes", get(show_report_list))
}
