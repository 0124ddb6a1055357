//! `storehub-catalog` — product listings and categories.
//!
//! Entities only; cross-cart coordination (visibility, checkout) lives in
//! `storehub-market`. The stock/publication primitives here are written to be
//! called under the store's write lock so a decrement and its publication
//! side-effect land as one atomic unit.

pub mod category;
pub mod product;
pub mod slug;

pub use category::{Category, CategoryId};
pub use product::{Product, ProductId};
pub use slug::{slugify, unique_slug};
