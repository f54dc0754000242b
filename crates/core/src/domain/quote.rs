use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::dimension::Dimension;
use crate::domain::product::{Product, ProductCategory};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

impl QuoteId {
    pub fn generate() -> Self {
        Self(format!("PRV-{}", Uuid::new_v4().simple()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub category: ProductCategory,
    pub name: String,
    pub price: Decimal,
}

impl From<&Product> for QuoteLine {
    fn from(product: &Product) -> Self {
        Self { category: product.category(), name: product.name.clone(), price: product.price }
    }
}

/// Optional item the user asked for that the catalog could not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub category: ProductCategory,
    pub requested_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub dimension: Dimension,
    pub material: String,
    pub color: String,
    pub manovra: Option<String>,
    pub estimated_weight_kg: Decimal,
    pub motor: QuoteLine,
    pub button: Option<QuoteLine>,
    pub accessories: Vec<QuoteLine>,
    pub skipped: Vec<SkippedItem>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    pub fn lines(&self) -> impl Iterator<Item = &QuoteLine> {
        std::iter::once(&self.motor).chain(self.button.iter()).chain(self.accessories.iter())
    }
}
