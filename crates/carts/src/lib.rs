//! `storehub-carts` — cart and line-item entities.
//!
//! A cart is only a container; quantities, price snapshots, and the
//! soft-delete recovery flag live on the line items. Cross-cart rules
//! (visibility, merge, checkout) are coordinated by `storehub-market`.

pub mod cart;
pub mod item;

pub use cart::{Cart, CartId};
pub use item::{CartItem, CartItemId, total_cents};
