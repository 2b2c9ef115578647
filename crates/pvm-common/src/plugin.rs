//! Process-wide plugin constants, fixed once at start-up.

use std::sync::OnceLock;

static PLUGIN: OnceLock<PluginInfo> = OnceLock::new();

/// Release and asset location of the running add-on.
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Release number; also the cache-busting `ver` of enqueued assets.
    pub version: &'static str,
    /// URL prefix the embedded assets are served from.
    pub asset_base_url: String,
}

impl PluginInfo {
    pub fn new(asset_base_url: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            asset_base_url: asset_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Versioned URL of an enqueued asset, e.g. `/assets/admin.css?ver=1.0.1`.
    pub fn asset_url(&self, file: &str) -> String {
        format!("{}/{}?ver={}", self.asset_base_url, file, self.version)
    }
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self::new("/assets")
    }
}

/// Install the constants. Returns `false` if they were already set.
pub fn init(info: PluginInfo) -> bool {
    PLUGIN.set(info).is_ok()
}

/// The installed constants, or the defaults when `init` was never called.
pub fn info() -> &'static PluginInfo {
    PLUGIN.get_or_init(PluginInfo::default)
}
