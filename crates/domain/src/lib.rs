//! Domain layer for the cart backend.
//!
//! This crate provides the concurrency-controlled cart mutation core:
//! - [`LockRegistry`] — per-cart mutual exclusion for all mutating
//!   operations
//! - [`CartService`] — create / add-item / remove-item / list operations
//!
//! The asynchronous order-processing pipeline that shares the registry lives
//! in the `processing` crate.

pub mod cart;
pub mod error;
pub mod locks;

pub use cart::CartService;
pub use error::CartError;
pub use locks::{CartGuard, LockRegistry};
