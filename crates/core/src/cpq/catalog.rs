use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::material::normalize_label;
use crate::domain::product::{Product, ProductCategory};
use crate::errors::CatalogError;

/// In-memory catalog slice used for one quote computation.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn push(&mut self, product: Product) {
        self.products.push(product);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn by_category(&self, category: ProductCategory) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |product| product.category() == category)
    }

    pub fn motors(&self) -> Vec<Product> {
        self.by_category(ProductCategory::Motor).cloned().collect()
    }

    /// First product of `category` whose name matches, ignoring case and padding.
    pub fn find(&self, category: ProductCategory, name: &str) -> Option<&Product> {
        self.by_category(category).find(|product| product.matches_name(name))
    }
}

/// Lookup within one catalog category; the backend exposes one endpoint per category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: ProductCategory,
    pub min_power_nm: Option<u32>,
    pub name: Option<String>,
}

impl CatalogQuery {
    pub fn category(category: ProductCategory) -> Self {
        Self { category, min_power_nm: None, name: None }
    }

    pub fn with_min_power(mut self, min_power_nm: u32) -> Self {
        self.min_power_nm = Some(min_power_nm);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if product.category() != self.category {
            return false;
        }
        if let Some(min_power_nm) = self.min_power_nm {
            if product.power_nm().map(|power| power < min_power_nm).unwrap_or(true) {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !product.matches_name(name) {
                return false;
            }
        }
        true
    }
}

/// Body of the `configura_tapparella` write request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutterConfiguration {
    #[serde(rename = "materiale")]
    pub material: String,
    #[serde(rename = "larghezza")]
    pub width_cm: u32,
    #[serde(rename = "altezza")]
    pub height_cm: u32,
    #[serde(rename = "colore")]
    pub color: String,
    #[serde(rename = "accessori", default)]
    pub accessories: Vec<String>,
}

/// Quote computed by the catalog backend for a submitted configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredQuote {
    #[serde(rename = "dimensioni", alias = "dimensions")]
    pub dimensions: String,
    #[serde(rename = "colore", alias = "color")]
    pub color: String,
    #[serde(rename = "prezzo_totale", alias = "total_price")]
    pub total_price: Decimal,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError>;

    async fn colors(&self, material: &str) -> Result<Vec<String>, CatalogError>;

    async fn configure(
        &self,
        configuration: &ShutterConfiguration,
    ) -> Result<ConfiguredQuote, CatalogError>;

    async fn motors(&self, min_power_nm: u32) -> Result<Vec<Product>, CatalogError> {
        self.products(&CatalogQuery::category(ProductCategory::Motor).with_min_power(min_power_nm))
            .await
    }

    /// Product of `category` whose name matches, ignoring case and padding.
    async fn find_by_name(
        &self,
        category: ProductCategory,
        name: &str,
    ) -> Result<Option<Product>, CatalogError> {
        let candidates =
            self.products(&CatalogQuery::category(category).with_name(name.trim())).await?;
        Ok(candidates.into_iter().find(|product| product.matches_name(name)))
    }
}

/// Fixed catalog used offline and in tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    catalog: Catalog,
    colors: BTreeMap<String, Vec<String>>,
    configured: Option<ConfiguredQuote>,
    unavailable: bool,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { catalog: Catalog::new(products), ..Self::default() }
    }

    pub fn with_colors<I, S>(mut self, material: &str, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors.insert(normalize_label(material), colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_configured_quote(mut self, quote: ConfiguredQuote) -> Self {
        self.configured = Some(quote);
        self
    }

    /// Every call fails as if the backend were down.
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn ensure_available(&self) -> Result<(), CatalogError> {
        if self.unavailable {
            return Err(CatalogError::Unavailable("static catalog marked unavailable".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        self.ensure_available()?;
        let products = self.catalog.products().iter();
        Ok(products.filter(|product| query.matches(product)).cloned().collect())
    }

    async fn colors(&self, material: &str) -> Result<Vec<String>, CatalogError> {
        self.ensure_available()?;
        Ok(self.colors.get(&normalize_label(material)).cloned().unwrap_or_default())
    }

    async fn configure(
        &self,
        configuration: &ShutterConfiguration,
    ) -> Result<ConfiguredQuote, CatalogError> {
        self.ensure_available()?;
        self.configured.clone().ok_or_else(|| {
            CatalogError::Rejected(format!(
                "configurazione non disponibile per {}",
                configuration.material
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::{
        Catalog, CatalogQuery, CatalogSource, ConfiguredQuote, ShutterConfiguration,
        StaticCatalog,
    };
    use crate::domain::product::{Product, ProductCategory};
    use crate::errors::CatalogError;

    /// Backend that ignores the name filter and lists the whole category.
    struct ListsWholeCategory(StaticCatalog);

    #[async_trait]
    impl CatalogSource for ListsWholeCategory {
        async fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
            self.0.products(&CatalogQuery { name: None, ..query.clone() }).await
        }

        async fn colors(&self, material: &str) -> Result<Vec<String>, CatalogError> {
            self.0.colors(material).await
        }

        async fn configure(
            &self,
            configuration: &ShutterConfiguration,
        ) -> Result<ConfiguredQuote, CatalogError> {
            self.0.configure(configuration).await
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product::motor("Somfy Oximo 20", Decimal::new(14_900, 2), 20),
            Product::motor("Nice Era 30", Decimal::new(17_500, 2), 30),
            Product::button("Pulsante Doppio", Decimal::new(2_500, 2)),
            Product::accessory("Zanzariera", Decimal::new(6_000, 2)),
        ]
    }

    #[test]
    fn find_matches_name_within_category_only() {
        let catalog = Catalog::new(products());

        assert!(catalog.find(ProductCategory::Button, " pulsante doppio ").is_some());
        assert!(catalog.find(ProductCategory::Accessory, "Pulsante Doppio").is_none());
    }

    #[test]
    fn query_filters_by_minimum_power() {
        let query = CatalogQuery::category(ProductCategory::Motor).with_min_power(25);
        let matching = products().into_iter().filter(|product| query.matches(product)).count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn static_catalog_serves_motors_and_names() {
        let catalog = StaticCatalog::new(products());

        let motors = catalog.motors(20).await.expect("motors");
        assert_eq!(motors.len(), 2);

        let button = catalog
            .find_by_name(ProductCategory::Button, "PULSANTE DOPPIO")
            .await
            .expect("lookup");
        assert_eq!(button.map(|product| product.name), Some("Pulsante Doppio".to_owned()));
    }

    #[tokio::test]
    async fn name_lookup_never_substitutes_another_product() {
        let catalog = ListsWholeCategory(StaticCatalog::new(products()));

        let missing =
            catalog.find_by_name(ProductCategory::Button, "Pulsante Wi-Fi").await.expect("lookup");
        assert_eq!(missing, None);

        let found =
            catalog.find_by_name(ProductCategory::Button, "pulsante doppio").await.expect("lookup");
        assert_eq!(found.map(|product| product.name), Some("Pulsante Doppio".to_owned()));
    }

    #[tokio::test]
    async fn unavailable_catalog_reports_unavailable() {
        let catalog = StaticCatalog::unavailable();
        let error = catalog.colors("pvc").await.expect_err("catalog is down");
        assert!(matches!(error, CatalogError::Unavailable(_)));
    }
}
