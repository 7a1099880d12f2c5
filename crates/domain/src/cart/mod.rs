//! Cart aggregate operations.

pub mod service;

pub use service::CartService;
