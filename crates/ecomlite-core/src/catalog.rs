//! # Catalog Operations
//!
//! Product drafts (the admin product form) and the pure list operations the
//! admin dashboard applies to the locally cached product list.
//!
//! ## Local Edits Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin edits never reach the catalog API. They rewrite the cached      │
//! │  list in place:                                                         │
//! │                                                                         │
//! │   cached: Some([A, B, C])                                              │
//! │        │                                                                │
//! │        ├── insert_product(new) ──► Some([new, A, B, C])                │
//! │        ├── update_product(B')  ──► Some([A, B', C])                    │
//! │        └── remove_product(B)   ──► Some([A, C])                        │
//! │                                                                         │
//! │   cached: None (never loaded)                                          │
//! │        ├── insert_product(new) ──► Some([new])                         │
//! │        ├── update_product(B')  ──► Some([B'])                          │
//! │        └── remove_product(B)   ──► Some([])                            │
//! │                                                                         │
//! │  A refresh from the API discards all local edits.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, ProductId, Rating};
use crate::validation::{validate_image_url, validate_price, validate_title, ValidationResult};
use crate::PLACEHOLDER_IMAGE;

// =============================================================================
// Product Draft
// =============================================================================

/// Values entered in the admin product form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub price: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductDraft {
    /// Creates a draft with only the required fields.
    pub fn new(title: impl Into<String>, price: Money) -> Self {
        ProductDraft {
            title: title.into(),
            price,
            description: None,
            category: None,
            image: None,
        }
    }

    /// Checks every field.
    ///
    /// ## Rules
    /// - `title`: required, at most 200 characters
    /// - `price`: at least $0.01
    /// - `image`: optional; when present, an absolute http(s) URL
    pub fn validate(&self) -> ValidationResult<()> {
        validate_title(&self.title)?;
        validate_price(self.price)?;
        if let Some(image) = self.image.as_deref().filter(|s| !s.trim().is_empty()) {
            validate_image_url(image)?;
        }
        Ok(())
    }

    /// Validates the draft and turns it into a new product with `id`.
    ///
    /// New products start with a zero rating and the placeholder image when
    /// none was given.
    pub fn into_product(self, id: ProductId) -> Result<Product, ValidationError> {
        self.validate()?;
        Ok(Product {
            id,
            title: self.title.trim().to_string(),
            price: self.price,
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            image: non_blank(self.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            rating: Some(Rating::default()),
        })
    }

    /// Validates the draft and applies it on top of an existing product.
    ///
    /// Title and price are always replaced; description, category and image
    /// only when the draft carries them. Id and rating are kept.
    pub fn apply_to(self, existing: &Product) -> Result<Product, ValidationError> {
        self.validate()?;
        Ok(Product {
            id: existing.id,
            title: self.title.trim().to_string(),
            price: self.price,
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            category: self.category.unwrap_or_else(|| existing.category.clone()),
            image: non_blank(self.image).unwrap_or_else(|| existing.image.clone()),
            rating: existing.rating,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// =============================================================================
// List Operations
// =============================================================================

/// Picks an id for a locally created product.
///
/// Uses the current epoch milliseconds, bumped past the largest id in the
/// list so two products created in the same millisecond never collide.
pub fn next_product_id(list: Option<&[Product]>, now_millis: u64) -> ProductId {
    let max_existing = list
        .and_then(|products| products.iter().map(|p| p.id).max())
        .unwrap_or(0);
    now_millis.max(max_existing.saturating_add(1))
}

/// Prepends a product to the cached list.
pub fn insert_product(list: Option<Vec<Product>>, product: Product) -> Vec<Product> {
    match list {
        Some(mut products) => {
            products.insert(0, product);
            products
        }
        None => vec![product],
    }
}

/// Replaces the product with the same id.
pub fn update_product(list: Option<Vec<Product>>, product: Product) -> Vec<Product> {
    match list {
        Some(products) => products
            .into_iter()
            .map(|p| if p.id == product.id { product.clone() } else { p })
            .collect(),
        None => vec![product],
    }
}

/// Drops the product with `id`.
pub fn remove_product(list: Option<Vec<Product>>, id: ProductId) -> Vec<Product> {
    list.map(|products| products.into_iter().filter(|p| p.id != id).collect())
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(ids: &[ProductId]) -> Vec<Product> {
        ids.iter()
            .map(|id| Product::new(*id, format!("P{}", id), Money::from_cents(100)))
            .collect()
    }

    fn ids(list: &[Product]) -> Vec<ProductId> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_draft_into_product_defaults() {
        let product = ProductDraft::new("  Desk Lamp ", Money::from_cents(2450))
            .into_product(77)
            .unwrap();

        assert_eq!(product.id, 77);
        assert_eq!(product.title, "Desk Lamp");
        assert_eq!(product.image, PLACEHOLDER_IMAGE);
        assert_eq!(product.rating, Some(Rating::default()));
    }

    #[test]
    fn test_draft_validation() {
        assert!(ProductDraft::new("", Money::from_cents(100))
            .into_product(1)
            .is_err());
        assert!(ProductDraft::new("Lamp", Money::zero())
            .into_product(1)
            .is_err());

        let mut draft = ProductDraft::new("Lamp", Money::from_cents(100));
        draft.image = Some("not-a-url".to_string());
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_draft_apply_to_keeps_unset_fields() {
        let mut existing = Product::new(5, "Old", Money::from_cents(100));
        existing.category = "jewelery".to_string();
        existing.image = "https://example.com/ring.png".to_string();
        existing.rating = Some(Rating { rate: 4.1, count: 9 });

        let mut draft = ProductDraft::new("New", Money::from_cents(250));
        draft.description = Some("Shiny".to_string());

        let updated = draft.apply_to(&existing).unwrap();
        assert_eq!(updated.id, 5);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.price, Money::from_cents(250));
        assert_eq!(updated.description, "Shiny");
        assert_eq!(updated.category, "jewelery");
        assert_eq!(updated.image, "https://example.com/ring.png");
        assert_eq!(updated.rating, existing.rating);
    }

    #[test]
    fn test_next_product_id() {
        assert_eq!(next_product_id(None, 1_700_000_000_000), 1_700_000_000_000);

        let list = listed(&[1, 1_700_000_000_000]);
        assert_eq!(
            next_product_id(Some(&list), 1_700_000_000_000),
            1_700_000_000_001
        );

        let list = listed(&[u64::MAX]);
        assert_eq!(next_product_id(Some(&list), 1_700_000_000_000), u64::MAX);
    }

    #[test]
    fn test_insert_prepends() {
        let list = insert_product(Some(listed(&[1, 2])), listed(&[9]).remove(0));
        assert_eq!(ids(&list), vec![9, 1, 2]);

        let list = insert_product(None, listed(&[9]).remove(0));
        assert_eq!(ids(&list), vec![9]);
    }

    #[test]
    fn test_update_replaces_matching_id() {
        let replacement = Product::new(2, "Changed", Money::from_cents(999));
        let list = update_product(Some(listed(&[1, 2, 3])), replacement.clone());

        assert_eq!(ids(&list), vec![1, 2, 3]);
        assert_eq!(list[1], replacement);
    }

    #[test]
    fn test_remove_filters() {
        assert_eq!(ids(&remove_product(Some(listed(&[1, 2, 3])), 2)), vec![1, 3]);
        assert_eq!(ids(&remove_product(Some(listed(&[1])), 42)), vec![1]);
        assert!(remove_product(None, 1).is_empty());
    }
}
