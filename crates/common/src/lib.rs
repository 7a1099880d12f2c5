//! Shared types for the cart backend.
//!
//! This crate provides the typed identifiers used across the workspace and
//! the [`Money`] value object used for prices and order totals.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{CartId, CartItemId, Category, ProductCode, ProductId, UserId};
