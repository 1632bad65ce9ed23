//! Product catalog lookup.
//!
//! The catalog is owned by the storefront; the engine only reads product
//! names and prices at enrollment time to freeze the snapshot.
//! [`HttpCatalog`] talks to the storefront's product API with [`reqwest`];
//! [`StaticCatalog`] serves a fixed product set for development and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use stride_core::snapshot::CatalogProduct;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the catalog lookup layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog API returned a non-2xx status code.
    #[error("Catalog API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// CatalogLookup trait
// ---------------------------------------------------------------------------

/// Read access to the product catalog.
///
/// Unknown ids are silently absent from the result rather than an error;
/// the snapshot simply omits them.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogProduct>, CatalogError>;
}

// ---------------------------------------------------------------------------
// CatalogConfig
// ---------------------------------------------------------------------------

/// Configuration for the HTTP catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the storefront product API, e.g. `http://catalog:4000`.
    pub base_url: String,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `CATALOG_BASE_URL` is not set; the caller should
    /// fall back to a [`StaticCatalog`] in that case.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("CATALOG_BASE_URL").ok()?;
        Some(Self { base_url })
    }
}

// ---------------------------------------------------------------------------
// HttpCatalog
// ---------------------------------------------------------------------------

/// Product row returned by the storefront's `GET /products` endpoint.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
}

/// HTTP client for the storefront product API.
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
        }
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    /// Fetch products by id via `GET /products?ids=a,b,c`.
    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogProduct>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(format!("{}/products", self.base_url))
            .query(&[("ids", ids.join(","))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<ProductRow> = response.json().await?;
        Ok(rows
            .into_iter()
            .map(|row| CatalogProduct {
                id: row.id,
                name: row.name,
                price_cents: row.price_cents,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// StaticCatalog
// ---------------------------------------------------------------------------

/// In-memory catalog for development runs and tests.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: BTreeMap<String, CatalogProduct>,
}

impl StaticCatalog {
    /// An empty catalog; snapshots built against it contain no products.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        }
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogProduct>, CatalogError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect())
    }
}
