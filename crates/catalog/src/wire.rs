//! Backend JSON shapes. Field names follow the catalog service; English aliases are
//! accepted so fixtures and newer backends decode the same way.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use tapparelle_core::cpq::catalog::ConfiguredQuote;
use tapparelle_core::domain::product::{Product, ProductCategory};
use tapparelle_core::errors::CatalogError;

#[derive(Debug, Deserialize)]
pub(crate) struct RawProduct {
    #[serde(rename = "nome_prodotto", alias = "name", alias = "nome")]
    name: Option<String>,
    #[serde(rename = "prezzo_prodotto", alias = "price", alias = "prezzo")]
    price: Option<RawNumber>,
    #[serde(rename = "categoria", alias = "category")]
    category: Option<String>,
    #[serde(rename = "potenza_nm", alias = "power", alias = "potenza")]
    power_nm: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    fn to_decimal(&self) -> Option<Decimal> {
        let text = match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.trim().replace(',', "."),
        };
        Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).ok()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawColor {
    Name(String),
    Record {
        #[serde(rename = "nome_colore", alias = "colore", alias = "nome", alias = "name")]
        name: String,
    },
}

impl RawColor {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Record { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Bare(Vec<T>),
    Products { prodotti: Vec<T> },
    Data { data: Vec<T> },
    Colors { colori: Vec<T> },
}

impl<T> Envelope<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items)
            | Self::Products { prodotti: items }
            | Self::Data { data: items }
            | Self::Colors { colori: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigureResponse {
    preventivo: ConfiguredQuote,
}

/// Backend-reported failure (`{"errore": "..."}`), if the body carries one.
pub(crate) fn backend_error(body: &Value) -> Option<String> {
    body.get("errore").map(|value| match value {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    })
}

fn decode_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, CatalogError> {
    if let Some(message) = backend_error(&body) {
        return Err(CatalogError::Rejected(message));
    }
    serde_json::from_value::<Envelope<T>>(body)
        .map(Envelope::into_items)
        .map_err(|error| CatalogError::Unavailable(format!("unexpected response shape: {error}")))
}

/// Invalid records are dropped one by one. The fetch only fails when records came back
/// and none of them is usable.
pub(crate) fn decode_products(
    body: Value,
    requested: ProductCategory,
) -> Result<Vec<Product>, CatalogError> {
    let mut products = Vec::new();
    let mut first_rejection = None;

    for raw in decode_list::<RawProduct>(body)? {
        match raw.into_product(requested) {
            Ok(product) => products.push(product),
            Err(error) => {
                warn!(
                    event_name = "catalog.record_rejected",
                    category = %requested,
                    error = %error,
                    "catalog record rejected"
                );
                first_rejection.get_or_insert(error);
            }
        }
    }

    match first_rejection {
        Some(error) if products.is_empty() => Err(error),
        _ => Ok(products),
    }
}

pub(crate) fn decode_colors(body: Value) -> Result<Vec<String>, CatalogError> {
    Ok(decode_list::<RawColor>(body)?
        .into_iter()
        .map(RawColor::into_name)
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .collect())
}

pub(crate) fn decode_configured(body: Value) -> Result<ConfiguredQuote, CatalogError> {
    if let Some(message) = backend_error(&body) {
        return Err(CatalogError::Rejected(message));
    }
    serde_json::from_value::<ConfigureResponse>(body)
        .map(|response| response.preventivo)
        .map_err(|error| CatalogError::Unavailable(format!("unexpected quote response: {error}")))
}

impl RawProduct {
    fn into_product(self, requested: ProductCategory) -> Result<Product, CatalogError> {
        let name = self
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CatalogError::MalformedRecord("record without a name".to_owned()))?;
        let price = self.price.as_ref().and_then(RawNumber::to_decimal).ok_or_else(|| {
            CatalogError::MalformedRecord(format!("`{name}` has no readable price"))
        })?;
        if price.is_sign_negative() {
            return Err(CatalogError::MalformedRecord(format!(
                "`{name}` has a negative price {price}"
            )));
        }
        let category = self
            .category
            .as_deref()
            .and_then(ProductCategory::from_catalog_label)
            .unwrap_or(requested);

        match category {
            ProductCategory::Motor => {
                let power_nm = self
                    .power_nm
                    .as_ref()
                    .and_then(RawNumber::to_decimal)
                    .and_then(|power| power.trunc().to_u32())
                    .ok_or_else(|| {
                        CatalogError::MalformedRecord(format!("motor `{name}` has no power rating"))
                    })?;
                Ok(Product::motor(name, price, power_nm))
            }
            ProductCategory::Button => Ok(Product::button(name, price)),
            ProductCategory::Accessory => Ok(Product::accessory(name, price)),
        }
    }
}
