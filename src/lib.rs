pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod health;
pub mod models;
pub mod pipeline;
pub mod providers;
