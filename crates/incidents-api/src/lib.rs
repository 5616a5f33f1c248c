pub mod archive;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod incidents;
pub mod router;
pub mod session;
pub mod state;
