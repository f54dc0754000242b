use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Motor,
    Button,
    Accessory,
}

impl ProductCategory {
    /// Path segment and `categoria` value used by the catalog backend.
    pub fn catalog_path(self) -> &'static str {
        match self {
            Self::Motor => "motori",
            Self::Button => "pulsanti",
            Self::Accessory => "accessori",
        }
    }

    pub fn from_catalog_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "motori" | "motore" | "motor" | "motors" => Some(Self::Motor),
            "pulsanti" | "pulsante" | "button" | "buttons" => Some(Self::Button),
            "accessori" | "accessorio" | "accessory" | "accessories" => Some(Self::Accessory),
            _ => None,
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ProductKind {
    Motor { power_nm: u32 },
    Button,
    Accessory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Decimal,
    pub kind: ProductKind,
}

impl Product {
    pub fn motor(name: impl Into<String>, price: Decimal, power_nm: u32) -> Self {
        Self { name: name.into(), price, kind: ProductKind::Motor { power_nm } }
    }

    pub fn button(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price, kind: ProductKind::Button }
    }

    pub fn accessory(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price, kind: ProductKind::Accessory }
    }

    pub fn category(&self) -> ProductCategory {
        match self.kind {
            ProductKind::Motor { .. } => ProductCategory::Motor,
            ProductKind::Button => ProductCategory::Button,
            ProductKind::Accessory => ProductCategory::Accessory,
        }
    }

    pub fn power_nm(&self) -> Option<u32> {
        match self.kind {
            ProductKind::Motor { power_nm } => Some(power_nm),
            ProductKind::Button | ProductKind::Accessory => None,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}
