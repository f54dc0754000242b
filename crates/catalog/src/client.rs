use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use tapparelle_core::config::CatalogConfig;
use tapparelle_core::cpq::catalog::{
    CatalogQuery, CatalogSource, ConfiguredQuote, ShutterConfiguration,
};
use tapparelle_core::domain::product::{Product, ProductCategory};
use tapparelle_core::errors::CatalogError;

use crate::wire::{backend_error, decode_colors, decode_configured, decode_products};

/// HTTP client for the product catalog backend.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    base_url: String,
    client: Client,
    write_timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(config.read_timeout()).build().map_err(|error| {
            CatalogError::Unavailable(format!("could not build http client: {error}"))
        })?;

        Ok(Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_owned(),
            client,
            write_timeout: config.write_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn fetch_category(
        &self,
        category: ProductCategory,
        query: &CatalogQuery,
    ) -> Result<Vec<Product>, CatalogError> {
        let endpoint = category.catalog_path();
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(min_power_nm) = query.min_power_nm {
            params.push(("potenza_min", min_power_nm.to_string()));
        }
        if let Some(name) = query.name.as_deref().map(str::trim).filter(|name| !name.is_empty()) {
            params.push(("nome_prodotto", name.to_owned()));
        }

        let body = self.send(endpoint, self.client.get(self.url(endpoint)).query(&params)).await?;
        let products =
            decode_products(body, category).map_err(|error| log_failure(endpoint, error))?;

        // Backends that ignore the filter parameters still get filtered here.
        let products =
            products.into_iter().filter(|product| query.matches(product)).collect::<Vec<_>>();
        debug!(
            event_name = "catalog.products_fetched",
            endpoint,
            count = products.len(),
            "catalog products fetched"
        );
        Ok(products)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Value, CatalogError> {
        let response = request.send().await.map_err(|error| {
            log_failure(endpoint, CatalogError::Unavailable(format!("request failed: {error}")))
        })?;

        let status = response.status();
        let body = response.json::<Value>().await;

        if !status.is_success() {
            let error = match body.ok().as_ref().and_then(backend_error) {
                Some(message) => CatalogError::Rejected(message),
                None => CatalogError::Unavailable(format!("unexpected status {status}")),
            };
            return Err(log_failure(endpoint, error));
        }

        body.map_err(|error| {
            let error = CatalogError::Unavailable(format!("undecodable response: {error}"));
            log_failure(endpoint, error)
        })
    }
}

fn log_failure(endpoint: &str, error: CatalogError) -> CatalogError {
    warn!(
        event_name = "catalog.request_failed",
        endpoint,
        error = %error,
        "catalog request failed"
    );
    error
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        self.fetch_category(query.category, query).await
    }

    async fn colors(&self, material: &str) -> Result<Vec<String>, CatalogError> {
        let endpoint = "colori";
        let request = self.client.get(self.url(endpoint)).query(&[("materiale", material.trim())]);
        let body = self.send(endpoint, request).await?;
        decode_colors(body).map_err(|error| log_failure(endpoint, error))
    }

    async fn configure(
        &self,
        configuration: &ShutterConfiguration,
    ) -> Result<ConfiguredQuote, CatalogError> {
        let endpoint = "configura_tapparella";
        let request =
            self.client.post(self.url(endpoint)).timeout(self.write_timeout).json(configuration);
        let body = self.send(endpoint, request).await?;
        decode_configured(body).map_err(|error| log_failure(endpoint, error))
    }
}
