pub mod aggregate;
pub mod error;
pub mod parse;
pub mod table;
