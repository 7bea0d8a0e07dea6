pub mod board_handlers;
pub mod chat_handlers;
pub mod event_handlers;
pub mod ops_handlers;
pub mod public_data_handlers;
pub mod user_handlers;

pub use board_handlers::*;
pub use chat_handlers::*;
pub use event_handlers::*;
pub use ops_handlers::*;
pub use public_data_handlers::*;
pub use user_handlers::*;
