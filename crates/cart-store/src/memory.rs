use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{CartId, CartItemId, Category, ProductCode, ProductId, UserId};

use crate::{
    Result, StoreError,
    model::{Cart, CartItem, CartStatus, Discount, Product, User},
    store::{CartItemStore, CartStore, DiscountStore, ProductStore, UserStore},
};

/// In-memory store implementation.
///
/// Backs tests and single-process deployments with the same interface a
/// database-backed implementation would provide. The handle is cheap to
/// clone; all clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    discounts: Arc<RwLock<HashMap<Category, Discount>>>,
    carts: Arc<RwLock<HashMap<CartId, Cart>>>,
    items: Arc<RwLock<HashMap<CartItemId, CartItem>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts reference data: a user.
    pub async fn seed_user(&self, user: User) -> User {
        self.users.write().await.insert(user.id, user.clone());
        user
    }

    /// Inserts reference data: a catalog product.
    pub async fn seed_product(&self, product: Product) -> Product {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        product
    }

    /// Inserts reference data: a category discount, replacing any existing
    /// discount for the same category.
    pub async fn seed_discount(&self, discount: Discount) {
        self.discounts
            .write()
            .await
            .insert(discount.category.clone(), discount);
    }

    /// Returns the number of carts stored.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }

    /// Returns the number of cart items stored.
    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.products.write().await.clear();
        self.discounts.write().await.clear();
        self.carts.write().await.clear();
        self.items.write().await.clear();
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find_product_by_code(&self, code: &ProductCode) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.values().find(|p| &p.code == code).cloned())
    }

    async fn find_product_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl DiscountStore for MemoryStore {
    async fn find_discount_by_category(&self, category: &Category) -> Result<Option<Discount>> {
        Ok(self.discounts.read().await.get(category).cloned())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_cart_by_id(&self, id: CartId) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(&id).cloned())
    }

    async fn find_cart_by_id_and_status(
        &self,
        id: CartId,
        status: CartStatus,
    ) -> Result<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts.get(&id).filter(|c| c.status == status).cloned())
    }

    async fn save_cart(&self, cart: Cart) -> Result<Cart> {
        self.carts.write().await.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn find_carts_by_user(&self, user_id: UserId) -> Result<Vec<Cart>> {
        let carts = self.carts.read().await;
        let mut owned: Vec<_> = carts
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        // Natural order: creation time, with the id as a tie-breaker so the
        // ordering is total.
        owned.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.id.as_uuid().cmp(&b.id.as_uuid()))
        });
        Ok(owned)
    }
}

#[async_trait]
impl CartItemStore for MemoryStore {
    async fn find_item_by_cart_and_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
            .cloned())
    }

    async fn find_items_by_cart(&self, cart_id: CartId) -> Result<Vec<CartItem>> {
        let items = self.items.read().await;
        let mut in_cart: Vec<_> = items
            .values()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect();
        in_cart.sort_by_key(|i| i.id);
        Ok(in_cart)
    }

    async fn save_item(&self, item: CartItem) -> Result<CartItem> {
        if !self.carts.read().await.contains_key(&item.cart_id) {
            return Err(StoreError::Integrity(format!(
                "cart {} does not exist",
                item.cart_id
            )));
        }
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn delete_item(&self, id: CartItemId) -> Result<()> {
        self.items.write().await.remove(&id);
        Ok(())
    }
}
