use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One saved revision of a page, as stored in the remote `page_versions` table.
///
/// The row is kept as received in `raw`, so serializing a `Revision`
/// reproduces the remote row with its column order and any columns this
/// tool does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Revision {
    pub version_major: i64,
    pub version_minor: i64,

    /// Editor name; the collaborative editor leaves it null for anonymous edits
    pub updated_by: Option<String>,

    pub updated_at: String,

    pub page: String,

    /// Selector -> HTML map, either inline or as a JSON-encoded string
    pub content: Value,

    raw: Map<String, Value>,
}

/// Columns read out of a row.
#[derive(Deserialize)]
struct Columns {
    version_major: i64,
    version_minor: i64,
    #[serde(default)]
    updated_by: Option<String>,
    updated_at: String,
    page: String,
    #[serde(default)]
    content: Value,
}

impl TryFrom<Map<String, Value>> for Revision {
    type Error = serde_json::Error;

    fn try_from(raw: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let columns: Columns = serde_json::from_value(Value::Object(raw.clone()))?;
        Ok(Self {
            version_major: columns.version_major,
            version_minor: columns.version_minor,
            updated_by: columns.updated_by,
            updated_at: columns.updated_at,
            page: columns.page,
            content: columns.content,
            raw,
        })
    }
}

impl From<Revision> for Map<String, Value> {
    fn from(revision: Revision) -> Self {
        revision.raw
    }
}

impl Revision {
    /// The row exactly as the remote returned it.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// `major.minor`
    pub fn version_label(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }

    /// Editor name, or `Unknown` when the row has none.
    pub fn editor(&self) -> &str {
        self.updated_by.as_deref().unwrap_or("Unknown")
    }

    /// Decode the content column into `(selector, html)` pairs in stored order.
    ///
    /// String content is decoded once; a missing or null column is empty.
    pub fn content_entries(&self) -> Result<Vec<(String, String)>> {
        let decoded;
        let map = match &self.content {
            Value::Null => return Ok(Vec::new()),
            Value::Object(map) => map,
            Value::String(raw) => {
                decoded = serde_json::from_str::<Value>(raw).with_context(|| {
                    format!(
                        "Failed to decode content of version {} ({})",
                        self.version_label(),
                        self.page
                    )
                })?;
                match &decoded {
                    Value::Object(map) => map,
                    other => {
                        return Err(anyhow!(
                            "Content of version {} is not an object: {}",
                            self.version_label(),
                            other
                        ))
                    }
                }
            }
            other => {
                return Err(anyhow!(
                    "Content of version {} is not an object: {}",
                    self.version_label(),
                    other
                ))
            }
        };

        Ok(map
            .iter()
            .map(|(selector, html)| (selector.clone(), html_text(html)))
            .collect())
    }
}

fn html_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
