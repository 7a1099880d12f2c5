use async_trait::async_trait;
use common::{CartId, CartItemId, Category, ProductCode, ProductId, UserId};

use crate::{
    Result,
    model::{Cart, CartItem, CartStatus, Discount, Product, User},
};

/// Read access to users.
///
/// Users are reference data for the cart core; it never creates or mutates
/// them.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks a user up by ID.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>>;
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Looks a product up by its unique code.
    async fn find_product_by_code(&self, code: &ProductCode) -> Result<Option<Product>>;

    /// Looks a product up by ID.
    async fn find_product_by_id(&self, id: ProductId) -> Result<Option<Product>>;
}

/// Read access to category discounts.
#[async_trait]
pub trait DiscountStore: Send + Sync {
    /// Returns the discount for `category`, if one is configured.
    ///
    /// There is at most one discount per category.
    async fn find_discount_by_category(&self, category: &Category) -> Result<Option<Discount>>;
}

/// Persistence for the cart aggregate.
///
/// Implementations must provide atomic single-aggregate reads and writes;
/// no cross-cart transaction is ever required.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Looks a cart up by ID regardless of status.
    async fn find_cart_by_id(&self, id: CartId) -> Result<Option<Cart>>;

    /// Looks a cart up by ID, filtered to the given status.
    async fn find_cart_by_id_and_status(
        &self,
        id: CartId,
        status: CartStatus,
    ) -> Result<Option<Cart>>;

    /// Inserts or replaces a cart, returning the persisted aggregate.
    async fn save_cart(&self, cart: Cart) -> Result<Cart>;

    /// Returns all carts owned by `user_id`, in the store's natural order.
    async fn find_carts_by_user(&self, user_id: UserId) -> Result<Vec<Cart>>;
}

/// Persistence for cart items.
#[async_trait]
pub trait CartItemStore: Send + Sync {
    /// Returns the cart's item for `product_id`, if present.
    async fn find_item_by_cart_and_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>>;

    /// Returns all items in the cart, stably ordered by item ID.
    async fn find_items_by_cart(&self, cart_id: CartId) -> Result<Vec<CartItem>>;

    /// Inserts or replaces an item, returning the persisted row.
    async fn save_item(&self, item: CartItem) -> Result<CartItem>;

    /// Deletes an item. Deleting an item that no longer exists is a no-op.
    async fn delete_item(&self, id: CartItemId) -> Result<()>;
}

/// A store handle that backs the full cart domain.
///
/// Services and the order processor take one generic handle bound by this
/// trait; cloning must be cheap (implementations hand out `Arc`-backed
/// handles).
pub trait BackingStore:
    UserStore + ProductStore + DiscountStore + CartStore + CartItemStore + Clone + Send + Sync + 'static
{
}

impl<T> BackingStore for T where
    T: UserStore
        + ProductStore
        + DiscountStore
        + CartStore
        + CartItemStore
        + Clone
        + Send
        + Sync
        + 'static
{
}
