use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{check_in, check_out, reserve_space, show_history};

// vehicle photos are larger than the default 2 MB limit
const PHOTO_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_reservation_routers() -> Router<AppRegistry> {
    Router::new()
        .route(
            "/reservar",
            post(reserve_space).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .route("/ingresar", post(check_in))
        .route("/salir", post(check_out))
        .route("/historial", get(show_history))
}
