// Application queries (read-only use cases)

pub mod alert_queries;
pub mod board_queries;
pub mod chat_queries;
pub mod event_queries;
pub mod ops_queries;
pub mod user_queries;
