// Domain value objects
pub mod alert_category;
pub mod event_sort;
pub mod location_mode;
pub mod report_reason;

pub use alert_category::*;
pub use event_sort::*;
pub use location_mode::*;
pub use report_reason::*;
