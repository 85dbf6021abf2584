pub mod dashboard;
pub mod format;
