pub mod job;
pub mod learning;
pub mod profile;
