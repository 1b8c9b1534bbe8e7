use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    sessions::{download, lifecycle, locations, poll, solve, view},
    state::AppState,
};

pub fn session_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(lifecycle::create_handler))
        .route("/{session_id}", delete(lifecycle::delete_handler))
        .route("/{session_id}/locations", put(locations::upload_handler))
        .route("/{session_id}/solve", post(solve::solve_handler))
        .route("/{session_id}/poll", get(poll::poll_handler))
        .route("/{session_id}/stop", post(solve::stop_handler))
        .route(
            "/{session_id}/view",
            get(view::get_view_handler).put(view::set_view_handler),
        )
        .route("/{session_id}/solution.json", get(download::solution_handler))
        .route("/{session_id}/map.html", get(download::map_handler))
        .with_state(state)
}
