//! Asynchronous order processor.

use cart_store::{BackingStore, CartStatus};
use common::{CartId, Money};
use domain::LockRegistry;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::config::ProcessingConfig;
use crate::error::ProcessingError;
use crate::pricing;

/// Outcome of a successfully processed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingReceipt {
    pub cart_id: CartId,
    /// Discounted order total, also persisted on the cart.
    pub total: Money,
}

/// Handle to a dispatched processing task.
///
/// `process_order` has already returned by the time the caller holds this;
/// joining is optional and exists for observability. Dropping the handle
/// detaches the task, which keeps running to completion.
#[derive(Debug)]
pub struct ProcessingHandle {
    cart_id: CartId,
    task: JoinHandle<Result<ProcessingReceipt, ProcessingError>>,
}

impl ProcessingHandle {
    /// The cart being processed.
    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    /// Waits for the processing task and returns its outcome.
    pub async fn join(self) -> Result<ProcessingReceipt, ProcessingError> {
        self.task
            .await
            .map_err(|e| ProcessingError::Interrupted(e.to_string()))?
    }
}

/// Prices and finalizes orders, decoupled from the callers that trigger
/// them.
///
/// Construct it with the SAME [`LockRegistry`] as the mutation service: the
/// pipeline runs under the per-cart lock, so processing and item mutations
/// on one cart are mutually exclusive.
#[derive(Debug, Clone)]
pub struct OrderProcessor<S> {
    store: S,
    locks: LockRegistry,
    config: ProcessingConfig,
}

impl<S: BackingStore> OrderProcessor<S> {
    /// Creates a processor with the default configuration.
    pub fn new(store: S, locks: LockRegistry) -> Self {
        Self::with_config(store, locks, ProcessingConfig::default())
    }

    /// Creates a processor with explicit configuration.
    pub fn with_config(store: S, locks: LockRegistry, config: ProcessingConfig) -> Self {
        Self {
            store,
            locks,
            config,
        }
    }

    /// Dispatches processing of `cart_id` and returns immediately.
    ///
    /// This is the "accepted" signal of the fire-and-forget contract: the
    /// caller never waits for pricing, the simulated fulfillment latency or
    /// the status transition. Failures inside the pipeline do not propagate
    /// here — they are logged, counted and recorded on the cart (see
    /// [`ProcessingError::is_recordable`]).
    #[tracing::instrument(skip(self))]
    pub fn process_order(&self, cart_id: CartId) -> ProcessingHandle {
        metrics::counter!("orders_submitted_total").increment(1);

        let store = self.store.clone();
        let locks = self.locks.clone();
        let config = self.config.clone();
        let task = tokio::spawn(async move {
            let started = std::time::Instant::now();
            let result = process(&store, &locks, cart_id, &config).await;
            match &result {
                Ok(receipt) => {
                    metrics::counter!("orders_processed_total").increment(1);
                    metrics::histogram!("order_processing_duration_seconds")
                        .record(started.elapsed().as_secs_f64());
                    tracing::info!(%cart_id, total = %receipt.total, "order processed");
                }
                Err(e) => {
                    metrics::counter!("orders_failed_total").increment(1);
                    tracing::error!(%cart_id, error = %e, "order processing failed");
                    if e.is_recordable() {
                        record_failure(&store, &locks, cart_id, e).await;
                    }
                }
            }
            result
        });

        ProcessingHandle { cart_id, task }
    }
}

/// The processing pipeline. Runs entirely under the cart's lock.
async fn process<S: BackingStore>(
    store: &S,
    locks: &LockRegistry,
    cart_id: CartId,
    config: &ProcessingConfig,
) -> Result<ProcessingReceipt, ProcessingError> {
    let _guard = locks.acquire(cart_id).await;

    let Some(mut cart) = store
        .find_cart_by_id_and_status(cart_id, CartStatus::Active)
        .await?
    else {
        // Distinguish "never existed" from the idempotent terminal case.
        return match store.find_cart_by_id(cart_id).await? {
            Some(_) => {
                tracing::warn!(%cart_id, "cart already processed, skipping");
                Err(ProcessingError::AlreadyProcessed(cart_id))
            }
            None => {
                tracing::warn!(%cart_id, "cart not found for processing");
                Err(ProcessingError::CartNotFound(cart_id))
            }
        };
    };

    let items = store.find_items_by_cart(cart_id).await?;

    // A zero-total order is a valid outcome; an empty cart is finalized
    // without the fulfillment delay.
    if items.is_empty() {
        cart.status = CartStatus::Processed;
        cart.total = Some(Money::zero());
        store.save_cart(cart).await?;
        return Ok(ProcessingReceipt {
            cart_id,
            total: Money::zero(),
        });
    }

    let mut total = Money::zero();
    for item in &items {
        let product = store.find_product_by_id(item.product_id).await?.ok_or(
            ProcessingError::ProductMissing {
                cart_id,
                product_id: item.product_id,
            },
        )?;
        let discount = store.find_discount_by_category(&product.category).await?;
        let line = pricing::line_total(product.price, item.quantity, discount.as_ref());
        tracing::debug!(
            %cart_id, product = %product.code, quantity = item.quantity, line = %line,
            discounted = discount.is_some(), "priced line"
        );
        total += line;
    }

    // Placeholder for real fulfillment work. Nothing is observable by other
    // callers until after this point: status and total land in one write.
    tokio::time::sleep(config.fulfillment_delay).await;

    cart.status = CartStatus::Processed;
    cart.total = Some(total);
    store.save_cart(cart).await?;

    Ok(ProcessingReceipt { cart_id, total })
}

/// Best-effort write of the failure onto the cart, under the cart's lock,
/// so fire-and-forget errors stay observable to later reads.
async fn record_failure<S: BackingStore>(
    store: &S,
    locks: &LockRegistry,
    cart_id: CartId,
    error: &ProcessingError,
) {
    let _guard = locks.acquire(cart_id).await;
    match store.find_cart_by_id(cart_id).await {
        Ok(Some(mut cart)) => {
            cart.processing_error = Some(error.to_string());
            if let Err(e) = store.save_cart(cart).await {
                tracing::error!(%cart_id, error = %e, "failed to record processing failure");
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(%cart_id, error = %e, "failed to record processing failure");
        }
    }
}
