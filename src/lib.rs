pub mod cli;
pub mod config;
pub mod data;
pub mod observability;
pub mod server;
