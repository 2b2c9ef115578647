//! "Plugin Version Manage" panel of the product edit screen.

use pvm_common::{plugin, VersionRecord};

use super::{document, escape};
use crate::services::store::ProductId;

pub fn render(product_id: ProductId, file_name: Option<&str>, versions: &[VersionRecord]) -> String {
    let mut rows = String::new();
    for version in versions {
        rows.push_str(&version_row(&version.version_name, &version.release_date));
    }

    let panel = format!(
        r#"<form method="post" action="/admin/products/{product_id}/versions">
<div id="product_variation_product_data" class="panel woocommerce_options_panel">
  <h2>Plugin Version Manage</h2>
  <div id="main-container-plugin-version">
    <p class="form-field">
      <label for="plugin-file-name">File Name:</label>
      <input id="plugin-file-name" type="text" name="plugin-file-name" placeholder="File Name" value="{file_name}">
    </p>
    <button type="button" class="button add_version">Add New Version</button>
    <div id="version_container">
{rows}    </div>
  </div>
  <p><button type="submit" class="button button-primary">Save</button></p>
</div>
</form>"#,
        product_id = product_id,
        file_name = escape(file_name.unwrap_or_default()),
        rows = rows,
    );

    let info = plugin::info();
    document(
        "Plugin Version Manage",
        &[info.asset_url("admin.css")],
        &[info.asset_url("admin.js")],
        &panel,
    )
}

fn version_row(name: &str, release_date: &str) -> String {
    format!(
        r#"      <div class="version_item">
        <input type="text" name="version_name[]" placeholder="Version Name" value="{}">
        <input type="date" name="release_date[]" placeholder="Release Date" value="{}">
        <button type="button" class="remove_version">Remove</button>
      </div>
"#,
        escape(name),
        escape(release_date)
    )
}
