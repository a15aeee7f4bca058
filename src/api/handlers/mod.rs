//! HTTP request handlers.

pub mod review_handler;

pub use review_handler::review_routes;
