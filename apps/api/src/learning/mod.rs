// Learning resources, next-step plans and completion tracking.

pub mod handlers;
pub mod progress;
pub mod store;
