// Domain services: the pure event feed pipeline and text helpers

pub mod event_filter;
pub mod interest_extractor;
pub mod location_resolver;
pub mod recommendation;
pub mod region;

pub use event_filter::*;
pub use interest_extractor::*;
pub use location_resolver::*;
pub use recommendation::*;
pub use region::*;
