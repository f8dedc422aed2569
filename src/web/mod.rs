//! HTTP API front-end (axum).

pub mod routes;
pub mod server;

pub use routes::WebState;
pub use server::{router, start_web_server};
