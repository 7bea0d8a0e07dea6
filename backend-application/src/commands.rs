// Application commands (state-changing use cases)

pub mod board_commands;
pub mod chat_commands;
pub mod ingest_commands;
pub mod user_commands;
