pub mod field;
pub mod job;
