//! Spray lookup service: `GET /spray?userid=<id>` behind a shared token.

pub mod config;
pub mod handler;
pub mod http;
pub mod request;
pub mod server;
pub mod store;

pub use server::{serve, State};
