//! Per-cart mutual exclusion.
//!
//! Every mutating operation on a cart — add item, remove item, process the
//! order — runs under the lock handed out by [`LockRegistry`], so at most
//! one such operation is in flight per cart at any time. Operations on
//! different carts never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::CartId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One cart's lock and the number of callers currently referencing it
/// (holders plus waiters).
#[derive(Debug)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    refs: usize,
}

/// Registry mapping cart IDs to mutual-exclusion handles.
///
/// Slots are created lazily and race-free: two callers hitting an unseen
/// cart ID concurrently always end up on the same underlying lock. Slots are
/// reclaimed by reference count — a slot is removed only once no guard or
/// waiter references it, under the registry's own mutex, so a waiter can
/// never be stranded on a discarded lock while a fresh caller creates a new
/// one for the same cart.
///
/// The handle is cheap to clone; all clones share the same slot table. The
/// mutation service and the order processor must share one registry so that
/// processing excludes concurrent item mutations.
#[derive(Debug, Clone, Default)]
pub struct LockRegistry {
    slots: Arc<Mutex<HashMap<CartId, Slot>>>,
}

impl LockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `cart_id`, waiting until any current holder
    /// releases it.
    ///
    /// The returned guard releases on drop, which covers every exit path of
    /// the protected section; cancelling the future while it waits also
    /// returns the slot reference.
    pub async fn acquire(&self, cart_id: CartId) -> CartGuard {
        let (lock, slot_ref) = {
            let mut slots = self.slots.lock().expect("lock registry mutex poisoned");
            let slot = slots.entry(cart_id).or_insert_with(|| Slot {
                lock: Arc::new(AsyncMutex::new(())),
                refs: 0,
            });
            slot.refs += 1;
            (
                Arc::clone(&slot.lock),
                SlotRef {
                    registry: self.clone(),
                    cart_id,
                },
            )
        };

        let permit = lock.lock_owned().await;
        CartGuard {
            _permit: permit,
            _slot: slot_ref,
        }
    }

    /// Number of cart IDs currently tracked. Returns to zero once all
    /// guards and waiters are gone.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .expect("lock registry mutex poisoned")
            .len()
    }

    /// Returns true if no cart lock is held or awaited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, cart_id: CartId) {
        let mut slots = self.slots.lock().expect("lock registry mutex poisoned");
        if let Some(slot) = slots.get_mut(&cart_id) {
            slot.refs -= 1;
            if slot.refs == 0 {
                slots.remove(&cart_id);
            }
        }
    }
}

/// Decrements the slot's reference count on drop.
#[derive(Debug)]
struct SlotRef {
    registry: LockRegistry,
    cart_id: CartId,
}

impl Drop for SlotRef {
    fn drop(&mut self) {
        self.registry.release(self.cart_id);
    }
}

/// Exclusive access to one cart, released on drop.
#[derive(Debug)]
pub struct CartGuard {
    // Field order matters: the permit must be released before the slot
    // reference count drops, otherwise a fresh caller could create a second
    // lock for a cart whose permit is still held.
    _permit: OwnedMutexGuard<()>,
    _slot: SlotRef,
}

impl CartGuard {
    /// The cart this guard protects.
    pub fn cart_id(&self) -> CartId {
        self._slot.cart_id
    }
}
