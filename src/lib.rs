pub mod calculations;
pub mod config;
pub mod error;
pub mod models;
pub mod refresh_timer;
pub mod services;
pub mod utils;
