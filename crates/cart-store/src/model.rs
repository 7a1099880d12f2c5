//! Entity models for the cart backend.

use chrono::{DateTime, Utc};
use common::{CartId, CartItemId, Category, Money, ProductCode, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered user. Read-only from the cart core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    /// Creates a user with a fresh ID.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
        }
    }
}

/// A catalog product. Read-only from the cart core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Unique human-assigned code, the key `add_item` looks products up by.
    pub code: ProductCode,
    pub name: String,
    pub price: Money,
    pub category: Category,
}

impl Product {
    /// Creates a product with a fresh ID.
    pub fn new(
        code: impl Into<ProductCode>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            code: code.into(),
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

/// A category-scoped percentage markdown. At most one per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub category: Category,
    /// Percentage in the range 0–100.
    pub percentage: Decimal,
}

impl Discount {
    pub fn new(category: impl Into<Category>, percentage: Decimal) -> Self {
        Self {
            category: category.into(),
            percentage,
        }
    }
}

/// Lifecycle state of a cart.
///
/// State transitions:
/// ```text
/// Active ──[order processed]──► Processed
/// ```
/// The transition is one-way and happens exactly once; a Processed cart is
/// terminal and read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CartStatus {
    /// Cart accepts item mutations.
    #[default]
    Active,

    /// Order has been processed (terminal state).
    Processed,
}

impl CartStatus {
    /// Returns true if items can be added or removed in this state.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, CartStatus::Active)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CartStatus::Processed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Active => "Active",
            CartStatus::Processed => "Processed",
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The cart aggregate: owner, timestamp, status and the processing outcome.
///
/// The item collection is stored as a relation keyed by `cart_id` (see
/// [`crate::CartItemStore`]) rather than embedded here, so a cart write is
/// always a single-aggregate write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub status: CartStatus,
    /// Total computed by order processing; `None` until the cart is
    /// Processed.
    pub total: Option<Money>,
    /// Last asynchronous processing failure, recorded so fire-and-forget
    /// errors are not lost.
    pub processing_error: Option<String>,
}

impl Cart {
    /// Creates a new Active cart for `user_id`, stamped with the current
    /// time.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: CartId::new(),
            user_id,
            created_at: Utc::now(),
            status: CartStatus::Active,
            total: None,
            processing_error: None,
        }
    }
}

/// A (product, quantity) pairing inside a cart.
///
/// There is at most one item per distinct product per cart; adding the same
/// product again merges quantities instead of duplicating the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// Always at least 1; removal deletes the item rather than decrementing
    /// to zero.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new item with a fresh ID.
    pub fn new(cart_id: CartId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: CartItemId::new(),
            cart_id,
            product_id,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_active() {
        assert_eq!(CartStatus::default(), CartStatus::Active);
    }

    #[test]
    fn active_can_modify_items() {
        assert!(CartStatus::Active.can_modify_items());
        assert!(!CartStatus::Processed.can_modify_items());
    }

    #[test]
    fn processed_is_terminal() {
        assert!(!CartStatus::Active.is_terminal());
        assert!(CartStatus::Processed.is_terminal());
    }

    #[test]
    fn status_display() {
        assert_eq!(CartStatus::Active.to_string(), "Active");
        assert_eq!(CartStatus::Processed.to_string(), "Processed");
    }

    #[test]
    fn new_cart_starts_active_and_empty() {
        let user_id = UserId::new();
        let cart = Cart::new(user_id);
        assert_eq!(cart.user_id, user_id);
        assert_eq!(cart.status, CartStatus::Active);
        assert!(cart.total.is_none());
        assert!(cart.processing_error.is_none());
    }

    #[test]
    fn cart_serialization_roundtrip() {
        let cart = Cart::new(UserId::new());
        let json = serde_json::to_string(&cart).unwrap();
        let deserialized: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart, deserialized);
    }

    #[test]
    fn cart_item_serialization_roundtrip() {
        let item = CartItem::new(CartId::new(), ProductId::new(), 3);
        let json = serde_json::to_string(&item).unwrap();
        let deserialized: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }
}
