// HTTP server modules
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod state;

// Configuration from the environment
pub mod config;

// Domain services behind the handlers
pub mod auth;
pub mod classifier;
pub mod contact;
pub mod symptoms;
