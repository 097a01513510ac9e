use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::space::show_space_list;

pub fn build_space_routers() -> Router<AppRegistry> {
    Router::new().route("/espacios", get(show_space_list))
}
