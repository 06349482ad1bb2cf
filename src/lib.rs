pub mod advisor;
pub mod config;
pub mod models;
pub mod optimizer;
pub mod output;
pub mod rating;
pub mod roster;
pub mod server;
pub mod types;
