// Domain entities

pub mod board;
pub mod chat;
pub mod config;
pub mod local_event;
pub mod location;
pub mod public_alert;
pub mod taxonomy;
pub mod user;

pub use board::*;
pub use chat::*;
pub use config::*;
pub use local_event::*;
pub use location::*;
pub use public_alert::*;
pub use taxonomy::*;
pub use user::*;
