// src/lib.rs
pub mod config;
pub mod database;
pub mod drift;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod watch;
