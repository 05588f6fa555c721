// Library root for the code camp API

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod loader;
pub mod mapping;
pub mod state;
pub mod utils;
