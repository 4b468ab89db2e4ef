pub mod config;
pub mod judge;
pub mod types;
