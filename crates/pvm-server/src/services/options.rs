//! Add-on activation bookkeeping in the storefront options table.

use sqlx::PgPool;

const VERSION_OPTION: &str = "pvm_version";

/// Record the running release as the active add-on version.
pub async fn record_activation(db: &PgPool, version: &str) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO plugin_options (key, value, updated_at) \
         VALUES ($1, $2, NOW()) \
         ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()",
    )
    .bind(VERSION_OPTION)
    .bind(version)
    .execute(db)
    .await?;

    tracing::info!(version, "Add-on activated");
    Ok(())
}

/// Forget the active add-on version.
pub async fn record_deactivation(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM plugin_options WHERE key = $1")
        .bind(VERSION_OPTION)
        .execute(db)
        .await?;

    tracing::info!("Add-on deactivated");
    Ok(())
}
