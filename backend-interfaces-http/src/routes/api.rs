use axum::routing::{get, patch, post, put};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    board_handlers, chat_handlers, event_handlers, ops_handlers, public_data_handlers,
    user_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/events", event_routes())
        .nest("/api/users", user_routes())
        .nest("/api/board", board_routes())
        .nest("/api/chatbot", chat_routes())
        .nest("/api/public-data", public_data_routes())
        .nest("/api/ops", ops_routes())
        .with_state(state)
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(event_handlers::list_events))
        .route("/categories", get(event_handlers::list_event_categories))
        .route("/:id", get(event_handlers::get_event))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/check-username", post(user_handlers::check_username))
        .route("/sms/send", post(user_handlers::send_sms))
        .route("/sms/verify", post(user_handlers::verify_sms))
        .route("/signup", post(user_handlers::signup))
        .route("/login", post(user_handlers::login))
        .route("/token/refresh", post(user_handlers::refresh_token))
        .route("/me", get(user_handlers::get_me))
        .route("/me/location", put(user_handlers::update_home_location))
        .route(
            "/me/interested-locations",
            put(user_handlers::update_interested_locations),
        )
        .route("/me/interests", put(user_handlers::update_interests))
        .route("/locations", get(user_handlers::search_locations))
        .route("/categories", get(user_handlers::list_categories))
}

fn board_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(board_handlers::list_board_categories))
        .route(
            "/posts",
            get(board_handlers::list_posts).post(board_handlers::create_post),
        )
        .route("/posts/hot", get(board_handlers::hot_posts))
        .route("/posts/my", get(board_handlers::my_posts))
        .route(
            "/posts/:id",
            get(board_handlers::get_post)
                .patch(board_handlers::update_post)
                .delete(board_handlers::delete_post),
        )
        .route("/posts/:id/comments", post(board_handlers::add_comment))
        .route("/posts/:id/like", post(board_handlers::toggle_like))
        .route("/posts/:id/report", post(board_handlers::report_post))
        .route("/comments/my", get(board_handlers::my_comments))
        .route(
            "/comments/:id",
            patch(board_handlers::update_comment).delete(board_handlers::delete_comment),
        )
        .route("/admin/reports", get(board_handlers::reported_posts))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(chat_handlers::list_sessions).post(chat_handlers::create_session),
        )
        .route(
            "/sessions/:session_id/messages",
            get(chat_handlers::session_messages),
        )
        .route("/chat", post(chat_handlers::chat))
}

fn public_data_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(public_data_handlers::list_alert_categories))
        .route("/alerts/:category_key", get(public_data_handlers::list_alerts))
}

fn ops_routes() -> Router<AppState> {
    Router::new()
        .route("/health/live", get(ops_handlers::health_live))
        .route("/health/ready", get(ops_handlers::health_ready))
        .route("/metrics/prometheus", get(ops_handlers::metrics_prometheus))
        .route("/ingest/run", post(ops_handlers::run_ingest))
        .route("/ingest/status", get(ops_handlers::get_ingest_status))
}
