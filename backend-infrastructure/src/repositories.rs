pub mod clickhouse_repo;
pub mod memory_store;
pub mod seed_files;

pub use clickhouse_repo::*;
pub use memory_store::*;
pub use seed_files::*;
