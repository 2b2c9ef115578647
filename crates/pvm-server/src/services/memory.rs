//! In-memory collaborators for handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use futures_util::stream::{self, StreamExt};
use reqwest::Url;

use super::file_host::{FileHost, RemoteFile};
use super::store::{
    CustomerId, LicenseInfo, Order, OrderId, Product, ProductId, ProductMetaStore, Storefront,
    SubscriptionWindow,
};
use crate::AppState;
use pvm_common::config::{
    ApiConfig, AuthConfig, DatabaseConfig, FileHostConfig, PluginConfig, ServerConfig,
};
use pvm_common::{AppConfig, AppResult, VersionRecord};

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
struct Inner {
    file_names: HashMap<ProductId, String>,
    versions: HashMap<ProductId, Vec<VersionRecord>>,
    products: HashMap<ProductId, Product>,
    orders: Vec<(CustomerId, Order)>,
    licenses: HashMap<OrderId, Vec<LicenseInfo>>,
    subscriptions: HashMap<OrderId, Vec<SubscriptionWindow>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn add_product(&self, id: ProductId, name: &str, parent_id: Option<ProductId>) {
        self.inner.lock().unwrap().products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                parent_id,
            },
        );
    }

    pub fn add_order(&self, customer: CustomerId, id: OrderId, product_ids: &[ProductId]) {
        self.inner.lock().unwrap().orders.push((
            customer,
            Order {
                id,
                product_ids: product_ids.to_vec(),
            },
        ));
    }

    pub fn add_license(&self, info: LicenseInfo) {
        self.inner
            .lock()
            .unwrap()
            .licenses
            .entry(info.order_id)
            .or_default()
            .push(info);
    }

    pub fn add_subscription(&self, order: OrderId, window: SubscriptionWindow) {
        self.inner
            .lock()
            .unwrap()
            .subscriptions
            .entry(order)
            .or_default()
            .push(window);
    }

    pub fn stored_versions(&self, product: ProductId) -> Option<Vec<VersionRecord>> {
        self.inner.lock().unwrap().versions.get(&product).cloned()
    }

    pub fn stored_file_name(&self, product: ProductId) -> Option<String> {
        self.inner.lock().unwrap().file_names.get(&product).cloned()
    }
}

#[async_trait]
impl ProductMetaStore for MemoryStore {
    async fn file_name(&self, product: ProductId) -> AppResult<Option<String>> {
        Ok(self.stored_file_name(product))
    }

    async fn set_file_name(&self, product: ProductId, file_name: &str) -> AppResult<()> {
        self.inner
            .lock()
            .unwrap()
            .file_names
            .insert(product, file_name.to_string());
        Ok(())
    }

    async fn delete_file_name(&self, product: ProductId) -> AppResult<()> {
        self.inner.lock().unwrap().file_names.remove(&product);
        Ok(())
    }

    async fn versions(&self, product: ProductId) -> AppResult<Option<Vec<VersionRecord>>> {
        Ok(self.stored_versions(product))
    }

    async fn set_versions(&self, product: ProductId, versions: &[VersionRecord]) -> AppResult<()> {
        self.inner
            .lock()
            .unwrap()
            .versions
            .insert(product, versions.to_vec());
        Ok(())
    }

    async fn delete_versions(&self, product: ProductId) -> AppResult<()> {
        self.inner.lock().unwrap().versions.remove(&product);
        Ok(())
    }
}

#[async_trait]
impl Storefront for MemoryStore {
    async fn completed_orders(&self, customer: CustomerId) -> AppResult<Vec<Order>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .orders
            .iter()
            .filter(|(c, _)| *c == customer)
            .map(|(_, o)| o.clone())
            .collect())
    }

    async fn product(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.inner.lock().unwrap().products.get(&id).cloned())
    }

    async fn license_info(&self, order: OrderId) -> AppResult<Vec<LicenseInfo>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .licenses
            .get(&order)
            .cloned()
            .unwrap_or_default())
    }

    async fn subscriptions_for_order(&self, order: OrderId) -> AppResult<Vec<SubscriptionWindow>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .subscriptions
            .get(&order)
            .cloned()
            .unwrap_or_default())
    }
}

/// File host answering every probe with a fixed status and serving `body`.
pub struct StubFileHost {
    pub status: u16,
    pub body: &'static [u8],
    pub probed: Mutex<Vec<String>>,
    pub fetched: Mutex<Vec<String>>,
}

impl StubFileHost {
    pub fn new(status: u16, body: &'static [u8]) -> Self {
        Self {
            status,
            body,
            probed: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FileHost for StubFileHost {
    async fn probe(&self, url: &Url) -> AppResult<u16> {
        self.probed.lock().unwrap().push(url.to_string());
        Ok(self.status)
    }

    async fn fetch(&self, url: &Url) -> AppResult<RemoteFile> {
        self.fetched.lock().unwrap().push(url.to_string());
        let (head, tail) = self.body.split_at(self.body.len() / 2);
        let chunks = vec![
            Ok(Bytes::from_static(head)),
            Ok(Bytes::from_static(tail)),
        ];
        Ok(RemoteFile {
            content_length: Some(self.body.len() as u64),
            body: stream::iter(chunks).boxed(),
        })
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/pvm_test".into(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.into(),
        },
        api: ApiConfig {
            namespace: "wooxperto-plugin".into(),
        },
        file_host: FileHostConfig::default(),
        plugin: PluginConfig::default(),
    }
}

pub fn test_state(store: Arc<MemoryStore>, files: Arc<StubFileHost>) -> Arc<AppState> {
    Arc::new(AppState {
        meta: store.clone(),
        shop: store,
        files,
        config: test_config(),
    })
}

/// Signed session token for `sub` with `role`.
pub fn bearer(sub: &str, role: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = crate::api::middleware::Claims {
        sub: sub.to_string(),
        email: format!("{}@example.com", sub),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}
