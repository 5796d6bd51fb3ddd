pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod quote;
pub mod resources;
pub mod services;
pub mod state;
