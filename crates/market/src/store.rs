//! Shared marketplace state and its locking discipline.

use std::collections::HashMap;
use std::sync::RwLock;

use storehub_carts::{Cart, CartId, CartItem, CartItemId};
use storehub_catalog::{Category, CategoryId, Product, ProductId};
use storehub_core::{BuyerIdentity, DomainError, DomainResult};
use storehub_engagement::{Favorite, FavoriteId, Reservation, ReservationId, Review, ReviewId};
use storehub_orders::{Order, OrderId, OrderItem, OrderItemId};

/// Every mutable table of the marketplace, owned as one unit.
///
/// Holding all tables behind one lock is what gives engine operations their
/// transaction boundary: a write closure sees and mutates a consistent whole,
/// so a stock decrement and its publication side-effect, or a checkout's N
/// decrements plus order creation, commit together or not at all.
#[derive(Debug, Default)]
pub struct MarketState {
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
    carts: HashMap<CartId, Cart>,
    carts_by_owner: HashMap<BuyerIdentity, CartId>,
    cart_items: HashMap<CartItemId, CartItem>,
    orders: HashMap<OrderId, Order>,
    order_items: HashMap<OrderItemId, OrderItem>,
    favorites: HashMap<FavoriteId, Favorite>,
    reviews: HashMap<ReviewId, Review>,
    reservations: HashMap<ReservationId, Reservation>,
}

impl MarketState {
    // ── categories ──────────────────────────────────────────────────────

    pub fn insert_category(&mut self, category: Category) {
        self.categories.insert(category.id_typed(), category);
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.values().find(|c| c.slug() == slug)
    }

    pub fn category_slug_taken(&self, slug: &str) -> bool {
        self.categories.values().any(|c| c.slug() == slug)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    // ── products ────────────────────────────────────────────────────────

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id_typed(), product);
    }

    pub fn product(&self, id: ProductId) -> DomainResult<&Product> {
        self.products.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn product_mut(&mut self, id: ProductId) -> DomainResult<&mut Product> {
        self.products.get_mut(&id).ok_or(DomainError::NotFound)
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.values().find(|p| p.slug() == slug)
    }

    pub fn product_slug_taken(&self, slug: &str) -> bool {
        self.products.values().any(|p| p.slug() == slug)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    // ── carts ───────────────────────────────────────────────────────────

    pub fn insert_cart(&mut self, cart: Cart) {
        self.carts_by_owner
            .insert(cart.owner().clone(), cart.id_typed());
        self.carts.insert(cart.id_typed(), cart);
    }

    pub fn cart(&self, id: CartId) -> DomainResult<&Cart> {
        self.carts.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn cart_id_for(&self, owner: &BuyerIdentity) -> Option<CartId> {
        self.carts_by_owner.get(owner).copied()
    }

    pub fn carts(&self) -> impl Iterator<Item = &Cart> {
        self.carts.values()
    }

    /// Drop a cart row (its lines are the caller's responsibility).
    pub fn remove_cart(&mut self, id: CartId) {
        if let Some(cart) = self.carts.remove(&id) {
            self.carts_by_owner.remove(cart.owner());
        }
    }

    // ── cart items ──────────────────────────────────────────────────────

    pub fn insert_cart_item(&mut self, item: CartItem) {
        self.cart_items.insert(item.id_typed(), item);
    }

    pub fn cart_item(&self, id: CartItemId) -> Option<&CartItem> {
        self.cart_items.get(&id)
    }

    pub fn cart_item_mut(&mut self, id: CartItemId) -> Option<&mut CartItem> {
        self.cart_items.get_mut(&id)
    }

    pub fn remove_cart_item(&mut self, id: CartItemId) -> Option<CartItem> {
        self.cart_items.remove(&id)
    }

    pub fn items_in_cart(&self, cart_id: CartId) -> Vec<&CartItem> {
        let mut items: Vec<&CartItem> = self
            .cart_items
            .values()
            .filter(|it| it.cart_id() == cart_id)
            .collect();
        items.sort_by_key(|it| it.created_at());
        items
    }

    pub fn item_ids_in_cart(&self, cart_id: CartId) -> Vec<CartItemId> {
        self.items_in_cart(cart_id)
            .into_iter()
            .map(|it| it.id_typed())
            .collect()
    }

    /// The at-most-one-line-per-(cart, product) lookup.
    pub fn find_cart_item(&self, cart_id: CartId, product_id: ProductId) -> Option<&CartItem> {
        self.cart_items
            .values()
            .find(|it| it.cart_id() == cart_id && it.product_id() == product_id)
    }

    pub fn find_cart_item_id(&self, cart_id: CartId, product_id: ProductId) -> Option<CartItemId> {
        self.find_cart_item(cart_id, product_id).map(|it| it.id_typed())
    }

    /// Whether any cart line anywhere still references the product. This is
    /// the Visibility Coordinator's global existence check.
    pub fn any_cart_references(&self, product_id: ProductId) -> bool {
        self.cart_items
            .values()
            .any(|it| it.product_id() == product_id)
    }

    /// Ids of every line (across all carts) referencing the product.
    pub fn item_ids_for_product(&self, product_id: ProductId) -> Vec<CartItemId> {
        self.cart_items
            .values()
            .filter(|it| it.product_id() == product_id)
            .map(|it| it.id_typed())
            .collect()
    }

    // ── orders ──────────────────────────────────────────────────────────

    pub fn insert_order(&mut self, order: Order) {
        self.orders.insert(order.id_typed(), order);
    }

    pub fn order(&self, id: OrderId) -> DomainResult<&Order> {
        self.orders.get(&id).ok_or(DomainError::NotFound)
    }

    pub fn order_mut(&mut self, id: OrderId) -> DomainResult<&mut Order> {
        self.orders.get_mut(&id).ok_or(DomainError::NotFound)
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn insert_order_item(&mut self, item: OrderItem) {
        self.order_items.insert(item.id_typed(), item);
    }

    pub fn items_in_order(&self, order_id: OrderId) -> Vec<&OrderItem> {
        self.order_items
            .values()
            .filter(|it| it.order_id() == order_id)
            .collect()
    }

    // ── engagement ──────────────────────────────────────────────────────

    pub fn insert_favorite(&mut self, favorite: Favorite) {
        self.favorites.insert(favorite.id_typed(), favorite);
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Favorite> {
        self.favorites.values()
    }

    pub fn remove_favorites(&mut self, ids: &[FavoriteId]) {
        for id in ids {
            self.favorites.remove(id);
        }
    }

    pub fn insert_review(&mut self, review: Review) {
        self.reviews.insert(review.id_typed(), review);
    }

    pub fn review_mut(&mut self, id: ReviewId) -> Option<&mut Review> {
        self.reviews.get_mut(&id)
    }

    pub fn reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.values()
    }

    pub fn insert_reservation(&mut self, reservation: Reservation) {
        self.reservations.insert(reservation.id_typed(), reservation);
    }

    pub fn reservation_mut(&mut self, id: ReservationId) -> Option<&mut Reservation> {
        self.reservations.get_mut(&id)
    }

    pub fn reservations(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations.values()
    }
}

/// Lock-serialized owner of [`MarketState`].
///
/// `write` is the engine's transaction primitive: the closure runs under the
/// exclusive guard, so concurrent operations serialize and nothing observes a
/// half-applied change. Closures must validate before mutating; an `Err`
/// return means "nothing was touched" by construction of every engine
/// operation, not by rollback.
#[derive(Debug, Default)]
pub struct MarketStore {
    inner: RwLock<MarketState>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<T>(&self, f: impl FnOnce(&MarketState) -> T) -> DomainResult<T> {
        let state = self
            .inner
            .read()
            .map_err(|_| DomainError::conflict("market store lock poisoned"))?;
        Ok(f(&state))
    }

    pub fn write<T>(&self, f: impl FnOnce(&mut MarketState) -> DomainResult<T>) -> DomainResult<T> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("market store lock poisoned"))?;
        f(&mut state)
    }
}
