//! Server-rendered HTML: admin panel, account table and error pages.

pub mod account;
pub mod admin_panel;

use axum::response::{Html, IntoResponse, Response};

use pvm_common::AppError;

/// Escape text for use in HTML content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `body` in a minimal document that links the given stylesheets and
/// scripts.
pub fn document(title: &str, styles: &[String], scripts: &[String], body: &str) -> String {
    let mut head = String::new();
    for href in styles {
        head.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape(href)
        ));
    }

    let mut tail = String::new();
    for src in scripts {
        tail.push_str(&format!("<script src=\"{}\"></script>\n", escape(src)));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}</head>\n<body>\n{}\n{}</body>\n</html>\n",
        escape(title),
        head,
        body,
        tail
    )
}

/// Error rendered as a terminal HTML page with the error's status code.
#[derive(Debug)]
pub struct ErrorPage(pub AppError);

impl From<AppError> for ErrorPage {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = format!(
            "<div class=\"pvm-die\"><p>{}</p></div>",
            escape(&self.0.public_message())
        );
        let styles = [pvm_common::plugin::info().asset_url("frontend.css")];
        (status, Html(document("Error", &styles, &[], &body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_attribute_quotes() {
        assert_eq!(
            escape(r#"<a href="x">Tom's & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#039;s &amp; co&lt;/a&gt;"
        );
    }
}
