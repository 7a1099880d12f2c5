//! Domain error types.

use cart_store::{CartStatus, StoreError};
use common::{CartId, ProductCode, ProductId, UserId};
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No user exists with the given ID.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No cart exists with the given ID.
    #[error("cart {0} not found")]
    CartNotFound(CartId),

    /// No product exists with the given code.
    #[error("product with code {0} not found")]
    ProductNotFound(ProductCode),

    /// No product exists with the given ID.
    #[error("product {0} not found")]
    ProductIdNotFound(ProductId),

    /// The product is not in the cart.
    #[error("product {product_id} is not in cart {cart_id}")]
    ItemNotFound {
        cart_id: CartId,
        product_id: ProductId,
    },

    /// The cart exists but is no longer Active, so items cannot be changed.
    #[error("cart {cart_id} is {status}; items can only be changed while it is Active")]
    CartNotActive {
        cart_id: CartId,
        status: CartStatus,
    },

    /// Item quantities are always at least 1.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// An error occurred in the cart store.
    #[error(transparent)]
    Store(#[from] StoreError),
}
