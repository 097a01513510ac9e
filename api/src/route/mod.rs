use axum::Router;
use registry::AppRegistry;

pub mod health;
pub mod report;
pub mod reservation;
pub mod space;

pub fn routes() -> Router<AppRegistry> {
    Router::new()
        .merge(health::build_health_check_routers())
        .merge(space::build_space_routers())
        .merge(reservation::build_reservation_routers())
        .merge(report::build_report_routers())
}
