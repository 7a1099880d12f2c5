//! Cart mutation service.

use cart_store::{BackingStore, Cart, CartItem};
use common::{CartId, ProductCode, ProductId, UserId};

use crate::error::CartError;
use crate::locks::LockRegistry;

/// Service for creating carts and mutating their item collections.
///
/// Every item mutation acquires the per-cart lock before touching the
/// aggregate, so concurrent calls against the same cart are totally ordered.
/// The registry must be the same instance the order processor uses;
/// construct one registry per process and hand clones to both.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
    locks: LockRegistry,
}

impl<S: BackingStore> CartService<S> {
    /// Creates a new cart service over the given store and lock registry.
    pub fn new(store: S, locks: LockRegistry) -> Self {
        Self { store, locks }
    }

    /// Returns the lock registry shared with the order processor.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Creates a new Active cart for `user_id`.
    ///
    /// No lock is taken: the cart ID is fresh, so there is nothing to
    /// contend with.
    #[tracing::instrument(skip(self))]
    pub async fn create_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(%user_id, "user not found");
                CartError::UserNotFound(user_id)
            })?;

        let cart = self.store.save_cart(Cart::new(user.id)).await?;
        tracing::info!(cart_id = %cart.id, %user_id, "cart created");
        metrics::counter!("carts_created_total").increment(1);
        Ok(cart)
    }

    /// Adds `quantity` of the product with `code` to the cart.
    ///
    /// If the cart already holds an item for that product, the quantities
    /// are merged; a cart never holds two items for the same product.
    /// Returns the resulting item.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        cart_id: CartId,
        code: &ProductCode,
        quantity: u32,
    ) -> Result<CartItem, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let _guard = self.locks.acquire(cart_id).await;

        let cart = self.fetch_active_cart(cart_id).await?;
        let product = self
            .store
            .find_product_by_code(code)
            .await?
            .ok_or_else(|| CartError::ProductNotFound(code.clone()))?;

        let item = match self
            .store
            .find_item_by_cart_and_product(cart.id, product.id)
            .await?
        {
            Some(mut existing) => {
                existing.quantity += quantity;
                tracing::info!(
                    %cart_id, product = %code, new_quantity = existing.quantity,
                    "merged quantity into existing item"
                );
                existing
            }
            None => {
                tracing::info!(%cart_id, product = %code, quantity, "added item");
                CartItem::new(cart.id, product.id, quantity)
            }
        };

        let item = self.store.save_item(item).await?;
        metrics::counter!("cart_items_added_total").increment(1);
        Ok(item)
    }

    /// Removes the item for `product_id` from the cart.
    ///
    /// Removal always deletes the whole item; quantities are never
    /// decremented to zero.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        let _guard = self.locks.acquire(cart_id).await;

        let cart = self.fetch_active_cart(cart_id).await?;
        let product = self
            .store
            .find_product_by_id(product_id)
            .await?
            .ok_or(CartError::ProductIdNotFound(product_id))?;

        let item = self
            .store
            .find_item_by_cart_and_product(cart.id, product.id)
            .await?
            .ok_or(CartError::ItemNotFound {
                cart_id,
                product_id,
            })?;

        self.store.delete_item(item.id).await?;
        tracing::info!(%cart_id, %product_id, "removed item");
        Ok(())
    }

    /// Returns the cart's items.
    ///
    /// This read takes no lock and does not check status — Processed carts
    /// remain listable, and a reader racing a mutation may observe the cart
    /// mid-change. That weak-consistency trade-off is deliberate; readers
    /// needing a stable view must serialize at a higher level.
    pub async fn list_items(&self, cart_id: CartId) -> Result<Vec<CartItem>, CartError> {
        let cart = self
            .store
            .find_cart_by_id(cart_id)
            .await?
            .ok_or(CartError::CartNotFound(cart_id))?;
        Ok(self.store.find_items_by_cart(cart.id).await?)
    }

    /// Returns all carts owned by `user_id`, in the store's natural order.
    ///
    /// Unlocked read; see [`CartService::list_items`].
    pub async fn list_carts_by_user(&self, user_id: UserId) -> Result<Vec<Cart>, CartError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(CartError::UserNotFound(user_id))?;
        Ok(self.store.find_carts_by_user(user_id).await?)
    }

    /// Fetches the cart and verifies it still accepts item mutations.
    ///
    /// Callers must hold the cart's lock.
    async fn fetch_active_cart(&self, cart_id: CartId) -> Result<Cart, CartError> {
        let cart = self
            .store
            .find_cart_by_id(cart_id)
            .await?
            .ok_or(CartError::CartNotFound(cart_id))?;
        if !cart.status.can_modify_items() {
            tracing::warn!(%cart_id, status = %cart.status, "cart is not active");
            return Err(CartError::CartNotActive {
                cart_id,
                status: cart.status,
            });
        }
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_store::{CartStatus, CartStore, MemoryStore, Product, ProductStore, User};
    use common::Money;

    async fn setup() -> (CartService<MemoryStore>, MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store.seed_user(User::new("testuser")).await;
        store
            .seed_product(Product::new(
                "PROD001",
                "Laptop",
                Money::with_scale(120000, 2),
                "Electronics",
            ))
            .await;
        store
            .seed_product(Product::new(
                "PROD002",
                "Mouse",
                Money::with_scale(2500, 2),
                "Electronics",
            ))
            .await;
        let service = CartService::new(store.clone(), LockRegistry::new());
        (service, store, user)
    }

    #[tokio::test]
    async fn create_cart_starts_active() {
        let (service, _store, user) = setup().await;

        let cart = service.create_cart(user.id).await.unwrap();
        assert_eq!(cart.user_id, user.id);
        assert_eq!(cart.status, CartStatus::Active);
        assert!(cart.total.is_none());
    }

    #[tokio::test]
    async fn create_cart_unknown_user_fails() {
        let (service, _store, _user) = setup().await;

        let result = service.create_cart(UserId::new()).await;
        assert!(matches!(result, Err(CartError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn add_item_creates_item_with_quantity() {
        let (service, _store, user) = setup().await;
        let cart = service.create_cart(user.id).await.unwrap();

        let item = service
            .add_item(cart.id, &ProductCode::new("PROD001"), 2)
            .await
            .unwrap();
        assert_eq!(item.cart_id, cart.id);
        assert_eq!(item.quantity, 2);
    }

    #[tokio::test]
    async fn add_item_merges_quantities_for_same_product() {
        let (service, _store, user) = setup().await;
        let cart = service.create_cart(user.id).await.unwrap();
        let code = ProductCode::new("PROD001");

        let first = service.add_item(cart.id, &code, 2).await.unwrap();
        let merged = service.add_item(cart.id, &code, 3).await.unwrap();

        assert_eq!(merged.id, first.id);
        assert_eq!(merged.quantity, 5);

        let items = service.list_items(cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[tokio::test]
    async fn add_item_zero_quantity_is_rejected() {
        let (service, _store, user) = setup().await;
        let cart = service.create_cart(user.id).await.unwrap();

        let result = service
            .add_item(cart.id, &ProductCode::new("PROD001"), 0)
            .await;
        assert!(matches!(result, Err(CartError::InvalidQuantity(0))));
    }

    #[tokio::test]
    async fn add_item_unknown_product_fails() {
        let (service, _store, user) = setup().await;
        let cart = service.create_cart(user.id).await.unwrap();

        let result = service
            .add_item(cart.id, &ProductCode::new("PROD999"), 1)
            .await;
        assert!(matches!(result, Err(CartError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn add_item_unknown_cart_fails() {
        let (service, _store, _user) = setup().await;

        let result = service
            .add_item(CartId::new(), &ProductCode::new("PROD001"), 1)
            .await;
        assert!(matches!(result, Err(CartError::CartNotFound(_))));
    }

    #[tokio::test]
    async fn remove_item_deletes_the_item() {
        let (service, _store, user) = setup().await;
        let cart = service.create_cart(user.id).await.unwrap();
        let item = service
            .add_item(cart.id, &ProductCode::new("PROD001"), 2)
            .await
            .unwrap();

        service.remove_item(cart.id, item.product_id).await.unwrap();
        assert!(service.list_items(cart.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_item_never_added_fails() {
        let (service, store, user) = setup().await;
        let cart = service.create_cart(user.id).await.unwrap();
        let mouse = store
            .find_product_by_code(&ProductCode::new("PROD002"))
            .await
            .unwrap()
            .unwrap();

        let result = service.remove_item(cart.id, mouse.id).await;
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn mutations_fail_on_processed_cart() {
        let (service, store, user) = setup().await;
        let mut cart = service.create_cart(user.id).await.unwrap();
        let item = service
            .add_item(cart.id, &ProductCode::new("PROD001"), 1)
            .await
            .unwrap();

        cart.status = CartStatus::Processed;
        store.save_cart(cart.clone()).await.unwrap();

        let add = service
            .add_item(cart.id, &ProductCode::new("PROD002"), 1)
            .await;
        assert!(matches!(add, Err(CartError::CartNotActive { .. })));

        let remove = service.remove_item(cart.id, item.product_id).await;
        assert!(matches!(remove, Err(CartError::CartNotActive { .. })));
    }

    #[tokio::test]
    async fn processed_carts_remain_listable() {
        let (service, store, user) = setup().await;
        let mut cart = service.create_cart(user.id).await.unwrap();
        service
            .add_item(cart.id, &ProductCode::new("PROD001"), 1)
            .await
            .unwrap();

        cart.status = CartStatus::Processed;
        store.save_cart(cart.clone()).await.unwrap();

        let items = service.list_items(cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn list_carts_by_user_returns_only_that_users_carts() {
        let (service, store, user) = setup().await;
        let other = store.seed_user(User::new("someoneelse")).await;

        let mine = service.create_cart(user.id).await.unwrap();
        service.create_cart(other.id).await.unwrap();

        let carts = service.list_carts_by_user(user.id).await.unwrap();
        assert_eq!(carts.len(), 1);
        assert_eq!(carts[0].id, mine.id);
    }

    #[tokio::test]
    async fn list_carts_unknown_user_fails() {
        let (service, _store, _user) = setup().await;

        let result = service.list_carts_by_user(UserId::new()).await;
        assert!(matches!(result, Err(CartError::UserNotFound(_))));
    }
}
