//! Storefront collaborators: product metadata and order/licence lookups.
//!
//! The storefront owns this data; the add-on reads it and writes only the two
//! product metadata keys below.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pvm_common::{AppResult, VersionRecord};

/// Metadata key holding the archive file name of a product.
pub const FILE_NAME_KEY: &str = "_plugin_file_name";
/// Metadata key holding the list of released versions of a product.
pub const VERSIONS_KEY: &str = "_product_versions";

pub type ProductId = i64;
pub type OrderId = i64;
pub type CustomerId = i64;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Set when the product is a variation of another product.
    pub parent_id: Option<ProductId>,
}

impl Product {
    /// Product whose metadata applies to this one.
    pub fn metadata_owner(&self) -> ProductId {
        self.parent_id.unwrap_or(self.id)
    }
}

/// A completed order and the products on its line items.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub product_ids: Vec<ProductId>,
}

/// Licence record issued for a purchased product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LicenseInfo {
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub license_key: String,
    /// `-1` means unlimited.
    pub no_of_active_site: i64,
    pub expiry_date: String,
    pub added_sites: i64,
}

/// Billing window of a subscription.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct SubscriptionWindow {
    pub start_date: Option<DateTime<Utc>>,
    pub next_payment_date: Option<DateTime<Utc>>,
}

/// Per-product key/value metadata.
#[async_trait]
pub trait ProductMetaStore: Send + Sync {
    async fn file_name(&self, product: ProductId) -> AppResult<Option<String>>;
    async fn set_file_name(&self, product: ProductId, file_name: &str) -> AppResult<()>;
    async fn delete_file_name(&self, product: ProductId) -> AppResult<()>;

    /// Stored versions, `None` when the attribute is absent.
    async fn versions(&self, product: ProductId) -> AppResult<Option<Vec<VersionRecord>>>;
    async fn set_versions(&self, product: ProductId, versions: &[VersionRecord]) -> AppResult<()>;
    async fn delete_versions(&self, product: ProductId) -> AppResult<()>;
}

/// Read-only view of catalogue, orders, licences and subscriptions.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Completed orders of a customer, newest first.
    async fn completed_orders(&self, customer: CustomerId) -> AppResult<Vec<Order>>;
    async fn product(&self, id: ProductId) -> AppResult<Option<Product>>;
    async fn license_info(&self, order: OrderId) -> AppResult<Vec<LicenseInfo>>;
    async fn subscriptions_for_order(&self, order: OrderId) -> AppResult<Vec<SubscriptionWindow>>;
}
