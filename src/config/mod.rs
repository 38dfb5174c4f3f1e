/// Database configuration and connection management
pub mod database;
