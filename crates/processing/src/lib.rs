//! Asynchronous order processing for the cart backend.
//!
//! This crate provides:
//! - [`OrderProcessor`] — fire-and-forget dispatch of the pricing and
//!   status-transition pipeline onto the runtime
//! - [`pricing`] — the discount math
//! - [`ProcessingConfig`] — env-driven tuning of the simulated fulfillment
//!   latency
//!
//! The processor shares the `domain` crate's [`domain::LockRegistry`], so an
//! order being processed excludes concurrent add/remove on the same cart.

pub mod config;
pub mod error;
pub mod pricing;
pub mod processor;

pub use config::ProcessingConfig;
pub use error::ProcessingError;
pub use processor::{OrderProcessor, ProcessingHandle, ProcessingReceipt};
