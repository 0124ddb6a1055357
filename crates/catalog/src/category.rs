use serde::{Deserialize, Serialize};

use storehub_core::{AggregateId, DomainError, DomainResult, Entity};

/// Category identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub AggregateId);

impl CategoryId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Slug of the fallback category listings land in when none is given.
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

/// Product grouping for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    slug: String,
}

impl Category {
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let slug = slug.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        if slug.trim().is_empty() {
            return Err(DomainError::validation("category slug cannot be empty"));
        }
        Ok(Self { id, name, slug })
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let err = Category::new(CategoryId::new(AggregateId::new()), "", "bikes").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn keeps_name_and_slug() {
        let c = Category::new(CategoryId::new(AggregateId::new()), "Bikes", "bikes").unwrap();
        assert_eq!(c.name(), "Bikes");
        assert_eq!(c.slug(), "bikes");
    }
}
