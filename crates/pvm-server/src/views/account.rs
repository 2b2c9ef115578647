//! "My Products" table on the customer account page.

use pvm_common::{plugin, VersionRecord};

use super::{document, escape};
use crate::api::ADMIN_POST_PATH;
use crate::api::downloads::DOWNLOAD_ACTION;
use crate::services::store::{LicenseInfo, OrderId};

/// One completed order and the licence rows to show for it.
#[derive(Debug, Clone)]
pub struct OrderSection {
    pub order_id: OrderId,
    pub licenses: Vec<LicenseRow>,
}

#[derive(Debug, Clone)]
pub struct LicenseRow {
    pub info: LicenseInfo,
    pub product_name: String,
    /// Versions the customer may download, in stored order.
    pub eligible: Vec<VersionRecord>,
}

const COLUMNS: [&str; 7] = [
    "Order ID",
    "Product Name",
    "License Key",
    "Number of Active Sites",
    "Expiry Date",
    "Added Sites",
    "Download",
];

pub fn render(orders: &[OrderSection]) -> String {
    let mut body = String::from("<h2>My Products</h2>\n");

    if orders.is_empty() {
        body.push_str("<p>No completed orders found.</p>\n");
    } else {
        body.push_str(&table(orders));
    }

    document(
        "My Products",
        &[plugin::info().asset_url("frontend.css")],
        &[],
        &body,
    )
}

fn table(orders: &[OrderSection]) -> String {
    let mut out = String::from(
        "<div class=\"my-all-plugin-info-container\">\n\
         <table class=\"shop_table shop_table_responsive my_account_orders woocommerce-orders-table\">\n\
         <thead>\n<tr>",
    );
    for column in COLUMNS {
        out.push_str(&format!("<th>{}</th>", column));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for order in orders {
        if order.licenses.is_empty() {
            out.push_str(&format!(
                "<tr><td colspan=\"{}\">No license key information available for this order.</td></tr>\n",
                COLUMNS.len()
            ));
            continue;
        }
        for row in &order.licenses {
            out.push_str(&license_row(row));
        }
    }

    out.push_str("</tbody>\n</table>\n</div>\n");
    out
}

fn license_row(row: &LicenseRow) -> String {
    let info = &row.info;
    let active_sites = if info.no_of_active_site == -1 {
        "Unlimited".to_string()
    } else {
        info.no_of_active_site.to_string()
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        info.order_id,
        escape(&row.product_name),
        escape(&info.license_key),
        active_sites,
        escape(&info.expiry_date),
        info.added_sites.max(0),
        download_cell(row),
    )
}

fn download_cell(row: &LicenseRow) -> String {
    let product_id = match row.info.product_id {
        Some(id) if !row.eligible.is_empty() => id,
        _ => return "<span class=\"no-versions\">No versions available</span>".to_string(),
    };

    let mut options = String::new();
    for version in &row.eligible {
        let name = escape(&version.version_name);
        options.push_str(&format!("<option value=\"{}\">{}</option>", name, name));
    }

    format!(
        "<form method=\"POST\" action=\"{action_url}\">\
         <div class=\"download-container\">\
         <select class=\"version-dropdown\" name=\"selected_version\">{options}</select>\
         <input type=\"hidden\" name=\"product_id\" value=\"{product_id}\">\
         <input type=\"hidden\" name=\"action\" value=\"{action}\">\
         <button type=\"submit\" class=\"download-button\">Download</button>\
         </div></form>",
        action_url = ADMIN_POST_PATH,
        options = options,
        product_id = product_id,
        action = DOWNLOAD_ACTION,
    )
}
