//! Router-level middleware (public interface of each concern).

pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
