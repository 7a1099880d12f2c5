//! Storage layer for the cart backend.
//!
//! This crate defines the entity models, the storage contracts the domain
//! core depends on, and [`MemoryStore`], an in-memory implementation used by
//! tests and single-process deployments. A database-backed implementation
//! would live here too and satisfy the same traits.

pub mod error;
pub mod memory;
pub mod model;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use model::{Cart, CartItem, CartStatus, Discount, Product, User};
pub use store::{BackingStore, CartItemStore, CartStore, DiscountStore, ProductStore, UserStore};
