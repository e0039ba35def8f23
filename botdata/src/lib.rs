// Persistence layer for the bot: guild/user settings and command permissions

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod telemetry;
