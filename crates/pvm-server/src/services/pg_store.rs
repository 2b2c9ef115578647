//! PostgreSQL-backed storefront and product metadata.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;

use super::store::{
    CustomerId, LicenseInfo, Order, OrderId, Product, ProductId, ProductMetaStore, Storefront,
    SubscriptionWindow, FILE_NAME_KEY, VERSIONS_KEY,
};
use pvm_common::{AppResult, VersionRecord};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn get_meta<T: DeserializeOwned>(
        &self,
        product: ProductId,
        key: &str,
    ) -> AppResult<Option<T>> {
        let row: Option<(Json<serde_json::Value>,)> = sqlx::query_as(
            "SELECT meta_value FROM product_meta WHERE product_id = $1 AND meta_key = $2",
        )
        .bind(product)
        .bind(key)
        .fetch_optional(&self.db)
        .await?;

        let Some((Json(value),)) = row else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::warn!(product, key, "Ignoring malformed product metadata: {}", e);
                Ok(None)
            }
        }
    }

    async fn put_meta<T: Serialize + Sync>(
        &self,
        product: ProductId,
        key: &str,
        value: &T,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product_meta (product_id, meta_key, meta_value, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (product_id, meta_key) DO UPDATE SET
                meta_value = EXCLUDED.meta_value,
                updated_at = NOW()
            "#,
        )
        .bind(product)
        .bind(key)
        .bind(Json(value))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete_meta(&self, product: ProductId, key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM product_meta WHERE product_id = $1 AND meta_key = $2")
            .bind(product)
            .bind(key)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductMetaStore for PgStore {
    async fn file_name(&self, product: ProductId) -> AppResult<Option<String>> {
        self.get_meta(product, FILE_NAME_KEY).await
    }

    async fn set_file_name(&self, product: ProductId, file_name: &str) -> AppResult<()> {
        self.put_meta(product, FILE_NAME_KEY, &file_name).await
    }

    async fn delete_file_name(&self, product: ProductId) -> AppResult<()> {
        self.delete_meta(product, FILE_NAME_KEY).await
    }

    async fn versions(&self, product: ProductId) -> AppResult<Option<Vec<VersionRecord>>> {
        self.get_meta(product, VERSIONS_KEY).await
    }

    async fn set_versions(&self, product: ProductId, versions: &[VersionRecord]) -> AppResult<()> {
        self.put_meta(product, VERSIONS_KEY, &versions).await
    }

    async fn delete_versions(&self, product: ProductId) -> AppResult<()> {
        self.delete_meta(product, VERSIONS_KEY).await
    }
}

#[async_trait]
impl Storefront for PgStore {
    async fn completed_orders(&self, customer: CustomerId) -> AppResult<Vec<Order>> {
        let order_ids: Vec<(OrderId,)> = sqlx::query_as(
            "SELECT id FROM orders WHERE customer_id = $1 AND status = 'completed' ORDER BY created_at DESC, id DESC",
        )
        .bind(customer)
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<OrderId> = order_ids.into_iter().map(|(id,)| id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<(OrderId, ProductId)> = sqlx::query_as(
            "SELECT order_id, product_id FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        Ok(ids
            .into_iter()
            .map(|id| Order {
                id,
                product_ids: items
                    .iter()
                    .filter(|(order_id, _)| *order_id == id)
                    .map(|(_, product_id)| *product_id)
                    .collect(),
            })
            .collect())
    }

    async fn product(&self, id: ProductId) -> AppResult<Option<Product>> {
        let product = sqlx::query_as("SELECT id, name, parent_id FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(product)
    }

    async fn license_info(&self, order: OrderId) -> AppResult<Vec<LicenseInfo>> {
        let rows = sqlx::query_as(
            r#"SELECT order_id, product_id, license_key, no_of_active_site, expiry_date, added_sites
               FROM license_keys
               WHERE order_id = $1
               ORDER BY id"#,
        )
        .bind(order)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn subscriptions_for_order(&self, order: OrderId) -> AppResult<Vec<SubscriptionWindow>> {
        let rows = sqlx::query_as(
            r#"SELECT start_date, next_payment_date
               FROM subscriptions
               WHERE parent_order_id = $1
               ORDER BY id"#,
        )
        .bind(order)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
