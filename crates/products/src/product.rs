use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, Entity, Intent, Money, StatusIntent, record_id};

record_id!(
    /// Product identifier.
    ProductId
);

/// Product status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Archived,
}

impl StatusIntent for ProductStatus {
    fn intent(&self) -> Intent {
        match self {
            ProductStatus::Active => Intent::Success,
            ProductStatus::Draft => Intent::Neutral,
            ProductStatus::Archived => Intent::Warning,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }
}

impl core::str::FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(DomainError::validation(format!("unknown product status: {other}"))),
        }
    }
}

/// Catalog product.
///
/// `stock` is the on-hand quantity; it is unsigned so `stock >= 0` holds for
/// anything that deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub category: String,
    pub price: Money,
    pub stock: u64,
    #[serde(default)]
    pub sold_count: u64,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> serde_json::Value {
        json!({
            "id": "0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b",
            "sku": "SKU-001",
            "name": "Canvas Tote",
            "price": { "amount": 2500, "currency": "USD" },
            "stock": 42,
            "sold_count": 7,
            "status": "active",
            "created_at": "2024-01-05T10:00:00Z",
            "updated_at": "2024-02-01T08:30:00Z"
        })
    }

    #[test]
    fn deserializes_fixture_with_defaults() {
        let product: Product = serde_json::from_value(fixture()).unwrap();
        assert_eq!(product.sku, "SKU-001");
        assert_eq!(product.stock, 42);
        assert_eq!(product.sold_count, 7);
        assert_eq!(product.thumbnail, "");
        assert_eq!(product.status, ProductStatus::Active);
    }

    #[test]
    fn negative_stock_is_rejected_at_the_boundary() {
        let mut raw = fixture();
        raw["stock"] = json!(-1);
        assert!(serde_json::from_value::<Product>(raw).is_err());
    }

    #[test]
    fn status_labels_match_serde_names() {
        for status in [ProductStatus::Draft, ProductStatus::Active, ProductStatus::Archived] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, json!(status.label()));
        }
        assert_eq!(ProductStatus::Archived.intent(), Intent::Warning);
    }
}
