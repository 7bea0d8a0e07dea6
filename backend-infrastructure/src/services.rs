pub mod ingest_scheduler;
pub mod llm_responder;
pub mod public_data_feed;
pub mod sms_service;
pub mod verification_store;

pub use ingest_scheduler::*;
pub use llm_responder::*;
pub use public_data_feed::*;
pub use sms_service::*;
pub use verification_store::*;
