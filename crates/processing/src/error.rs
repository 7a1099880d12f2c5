//! Processing error types.

use cart_store::StoreError;
use common::{CartId, ProductId};
use thiserror::Error;

/// Errors that can occur in the asynchronous processing pipeline.
///
/// None of these reach the caller of `process_order` — the dispatch has
/// already returned by the time they occur. They surface through
/// [`crate::ProcessingHandle::join`] and, for real failures, through the
/// cart's `processing_error` field.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// No cart exists with the given ID.
    #[error("cart {0} not found")]
    CartNotFound(CartId),

    /// The cart was already processed; the pipeline performed no mutation.
    #[error("cart {0} is already processed")]
    AlreadyProcessed(CartId),

    /// An item references a product that no longer exists in the catalog.
    #[error("product {product_id} referenced by cart {cart_id} no longer exists")]
    ProductMissing {
        cart_id: CartId,
        product_id: ProductId,
    },

    /// An error occurred in the cart store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The processing task was cancelled or panicked before completing.
    #[error("processing task did not run to completion: {0}")]
    Interrupted(String),
}

impl ProcessingError {
    /// True for failures worth recording on the cart itself.
    ///
    /// `CartNotFound` has nothing to record on, and `AlreadyProcessed` is
    /// the idempotent skip — the terminal cart must stay untouched.
    pub fn is_recordable(&self) -> bool {
        matches!(
            self,
            ProcessingError::ProductMissing { .. } | ProcessingError::Store(_)
        )
    }
}
