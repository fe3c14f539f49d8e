//! Publish widget injection into served HTML pages.

const WIDGET_TEMPLATE: &str = include_str!("widget.html");

/// Closing tag the widget is inserted before.
const BODY_CLOSE: &str = "</body>";

/// Render the widget, linking to `live_url` after a successful publish.
pub fn render_widget(live_url: Option<&str>) -> String {
    let success_html = match live_url {
        Some(url) => format!(
            "Published! Live in ~60s<br><a href=\"{}\" target=\"_blank\" style=\"color:#059669\">View live site</a>",
            escape_attr(url)
        ),
        None => "Published!".to_string(),
    };

    WIDGET_TEMPLATE.replace("{{SUCCESS_HTML}}", &js_string(&success_html))
}

/// Insert `widget` before the last `</body>` (any case), or append it.
pub fn inject_widget(content: &str, widget: &str) -> String {
    let mut result = String::with_capacity(content.len() + widget.len());

    // ASCII lowercasing keeps byte offsets aligned with `content`
    match content.to_ascii_lowercase().rfind(BODY_CLOSE) {
        Some(pos) => {
            result.push_str(&content[..pos]);
            result.push_str(widget);
            result.push_str(&content[pos..]);
        }
        None => {
            result.push_str(content);
            result.push_str(widget);
        }
    }

    result
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// JavaScript string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
