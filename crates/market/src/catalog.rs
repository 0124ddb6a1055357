//! Catalog services: creating, publishing, and listing products.

use chrono::Utc;
use serde_json::Value as JsonValue;

use storehub_catalog::{
    Category, CategoryId, Product, ProductId, category::UNCATEGORIZED_SLUG, slugify, unique_slug,
};
use storehub_core::{AggregateId, DomainError, DomainResult, UserId};
use storehub_events::{EventBus, EventEnvelope};

use crate::Market;

impl<B> Market<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Create a listing for a seller.
    ///
    /// The slug is derived from the name and suffixed to uniqueness. Without
    /// a category the listing lands in the shared "Uncategorized" bucket.
    /// `publish` mirrors the storefront default of making fresh listings
    /// visible immediately; owners can also keep them as drafts.
    pub fn create_product(
        &self,
        owner: UserId,
        name: &str,
        description: &str,
        price_cents: u64,
        stock: i64,
        category_id: Option<CategoryId>,
        publish: bool,
    ) -> DomainResult<Product> {
        self.store().write(|state| {
            let category_id = match category_id {
                Some(id) => {
                    // Reject dangling references up front.
                    if !state.categories().any(|c| c.id_typed() == id) {
                        return Err(DomainError::NotFound);
                    }
                    id
                }
                None => match state.category_by_slug(UNCATEGORIZED_SLUG) {
                    Some(c) => c.id_typed(),
                    None => {
                        let id = CategoryId::new(AggregateId::new());
                        state.insert_category(Category::new(
                            id,
                            "Uncategorized",
                            UNCATEGORIZED_SLUG,
                        )?);
                        id
                    }
                },
            };

            let slug = unique_slug(&slugify(name), |s| state.product_slug_taken(s));

            let mut product = Product::new(
                ProductId::new(AggregateId::new()),
                category_id,
                Some(owner),
                name,
                slug,
                description,
                price_cents,
                stock,
                Utc::now(),
            )?;
            if publish {
                product.publish()?;
            }

            tracing::info!(product_id = %product.id_typed(), owner = %owner, "product created");
            state.insert_product(product.clone());
            Ok(product)
        })
    }

    /// Explicit owner publication — the counterpart of the non-republishing
    /// restore path.
    pub fn publish_product(&self, actor: UserId, product_id: ProductId) -> DomainResult<()> {
        self.store().write(|state| {
            let product = state.product(product_id)?;
            if !product.owned_by(actor) {
                return Err(DomainError::Unauthorized);
            }
            state.product_mut(product_id)?.publish()
        })
    }

    /// Public storefront listing: published, not soft-deleted, newest first.
    pub fn list_published(&self) -> DomainResult<Vec<Product>> {
        self.store().read(|state| {
            let mut products: Vec<Product> = state
                .products()
                .filter(|p| p.is_listed())
                .cloned()
                .collect();
            products.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            products
        })
    }

    /// Product detail by slug. Soft-deleted products are gone as far as the
    /// public surface is concerned.
    pub fn get_product_by_slug(&self, slug: &str) -> DomainResult<Product> {
        self.store().read(|state| {
            state
                .product_by_slug(slug)
                .filter(|p| !p.is_deleted())
                .cloned()
                .ok_or(DomainError::NotFound)
        })?
    }

    pub fn create_category(&self, name: &str) -> DomainResult<Category> {
        self.store().write(|state| {
            let slug = unique_slug(&slugify(name), |s| state.category_slug_taken(s));
            let category = Category::new(CategoryId::new(AggregateId::new()), name, slug)?;
            state.insert_category(category.clone());
            Ok(category)
        })
    }

    pub fn list_categories(&self) -> DomainResult<Vec<Category>> {
        self.store().read(|state| {
            let mut categories: Vec<Category> = state.categories().cloned().collect();
            categories.sort_by(|a, b| a.name().cmp(b.name()));
            categories
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::market;

    #[test]
    fn create_product_slugifies_and_uniquifies() {
        let m = market();
        let owner = UserId::new();

        let a = m
            .create_product(owner, "Red Chair", "", 5000, 3, None, true)
            .unwrap();
        let b = m
            .create_product(owner, "Red Chair", "", 5000, 3, None, true)
            .unwrap();

        assert_eq!(a.slug(), "red-chair");
        assert_eq!(b.slug(), "red-chair-1");
    }

    #[test]
    fn create_product_defaults_to_the_uncategorized_bucket() {
        let m = market();
        let product = m
            .create_product(UserId::new(), "Lamp", "", 900, 1, None, true)
            .unwrap();

        let categories = m.list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].slug(), "uncategorized");
        assert_eq!(product.category_id(), categories[0].id_typed());
    }

    #[test]
    fn unpublished_and_deleted_products_are_not_listed() {
        let m = market();
        let owner = UserId::new();

        let visible = m
            .create_product(owner, "Visible", "", 900, 1, None, true)
            .unwrap();
        let draft = m
            .create_product(owner, "Draft", "", 900, 1, None, false)
            .unwrap();
        let deleted = m
            .create_product(owner, "Deleted", "", 900, 1, None, true)
            .unwrap();
        m.soft_delete(owner, deleted.id_typed()).unwrap();

        let listed = m.list_published().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id_typed(), visible.id_typed());

        assert!(m.get_product_by_slug(draft.slug()).is_ok());
        assert_eq!(
            m.get_product_by_slug(deleted.slug()).unwrap_err(),
            DomainError::NotFound
        );
    }

    #[test]
    fn publish_is_owner_only_and_draft_becomes_visible() {
        let m = market();
        let owner = UserId::new();
        let draft = m
            .create_product(owner, "Draft", "", 900, 1, None, false)
            .unwrap();

        assert_eq!(
            m.publish_product(UserId::new(), draft.id_typed())
                .unwrap_err(),
            DomainError::Unauthorized
        );

        m.publish_product(owner, draft.id_typed()).unwrap();
        assert_eq!(m.list_published().unwrap().len(), 1);
    }

    #[test]
    fn unknown_category_reference_is_rejected() {
        let m = market();
        let err = m
            .create_product(
                UserId::new(),
                "Lamp",
                "",
                900,
                1,
                Some(CategoryId::new(AggregateId::new())),
                true,
            )
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }
}
