//! Customer account page — purchased products and version downloads.
//!
//! GET /my-account/products

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};
use chrono::{DateTime, Utc};

use crate::api::middleware::AuthUser;
use crate::services::store::{CustomerId, Order, ProductId, ProductMetaStore, Storefront};
use crate::views::account::{self, LicenseRow, OrderSection};
use crate::views::ErrorPage;
use crate::AppState;
use pvm_common::version::eligible_versions;
use pvm_common::{AppResult, VersionRecord};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/products", get(my_products))
        .with_state(state)
}

async fn my_products(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ErrorPage> {
    let customer = auth.customer_id();
    let sections =
        load_order_sections(state.shop.as_ref(), state.meta.as_ref(), customer).await?;
    Ok(Html(account::render(&sections)))
}

/// Join every completed order of `customer` with its licences, product names
/// and the versions the customer may download.
pub async fn load_order_sections(
    shop: &dyn Storefront,
    meta: &dyn ProductMetaStore,
    customer: CustomerId,
) -> AppResult<Vec<OrderSection>> {
    let orders = shop.completed_orders(customer).await?;
    if orders.is_empty() {
        tracing::debug!(customer, "No completed orders");
        return Ok(Vec::new());
    }

    let mut sections = Vec::with_capacity(orders.len());
    for order in &orders {
        sections.push(order_section(shop, meta, order).await?);
    }
    Ok(sections)
}

async fn order_section(
    shop: &dyn Storefront,
    meta: &dyn ProductMetaStore,
    order: &Order,
) -> AppResult<OrderSection> {
    let licenses = shop.license_info(order.id).await?;
    if licenses.is_empty() {
        return Ok(OrderSection {
            order_id: order.id,
            licenses: Vec::new(),
        });
    }

    // Versions per purchased product; variations use their parent's list.
    let mut versions_by_product: HashMap<ProductId, Vec<VersionRecord>> = HashMap::new();
    for &product_id in &order.product_ids {
        if let Some(product) = shop.product(product_id).await? {
            let versions = meta
                .versions(product.metadata_owner())
                .await?
                .unwrap_or_default();
            versions_by_product.insert(product_id, versions);
        }
    }

    let cutoff = billing_cutoff(shop, order).await?;

    let mut rows = Vec::with_capacity(licenses.len());
    for info in licenses {
        let product_name = match info.product_id {
            Some(id) => shop.product(id).await?.map(|p| p.name).unwrap_or_default(),
            None => String::new(),
        };

        let eligible = match (info.product_id, cutoff) {
            (Some(id), Some(cutoff)) => versions_by_product
                .get(&id)
                .map(|versions| {
                    eligible_versions(versions, cutoff)
                        .into_iter()
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        rows.push(LicenseRow {
            info,
            product_name,
            eligible,
        });
    }

    Ok(OrderSection {
        order_id: order.id,
        licenses: rows,
    })
}

/// Next-payment moment of the order's first subscription. Versions released
/// at or after it are withheld.
async fn billing_cutoff(
    shop: &dyn Storefront,
    order: &Order,
) -> AppResult<Option<DateTime<Utc>>> {
    let subscriptions = shop.subscriptions_for_order(order.id).await?;
    let Some(first) = subscriptions.first() else {
        tracing::debug!(order_id = order.id, "Order has no subscription");
        return Ok(None);
    };

    Ok(first.next_payment_date)
}
