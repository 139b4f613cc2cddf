pub mod config;
pub mod crypto;
pub mod identifier;
pub mod models;
