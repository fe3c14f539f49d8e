//! Markdown edit-history backup.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::html::{section_id, strip_html};
use super::record::Revision;

/// Entries listed per section before the rest are summarised.
pub const MAX_ENTRIES_PER_SECTION: usize = 5;

/// Characters of plain text kept per entry.
pub const MAX_TEXT_CHARS: usize = 200;

/// Selector/HTML pairs of one revision, grouped by section id in sorted order.
pub fn group_by_section(entries: &[(String, String)]) -> BTreeMap<&str, Vec<(&str, &str)>> {
    let mut sections: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for (selector, html) in entries {
        sections
            .entry(section_id(selector))
            .or_default()
            .push((selector.as_str(), html.as_str()));
    }
    sections
}

/// Render the backup document for `versions`, in the order given.
pub fn render_markdown(versions: &[Revision], exported_at: DateTime<Local>) -> Result<String> {
    let mut lines: Vec<String> = vec![
        "# Beacon Platform - Edit History Backup".to_string(),
        format!("\nExported: {}", exported_at.format("%Y-%m-%d %H:%M")),
        format!("\nTotal versions: {}\n", versions.len()),
        "---\n".to_string(),
    ];

    for version in versions {
        lines.push(format!("## Version {}", version.version_label()));
        lines.push(format!("- **Updated by:** {}", version.editor()));
        lines.push(format!("- **Updated at:** {}", version.updated_at));
        lines.push(format!("- **Page:** {}", version.page));
        lines.push(String::new());

        let entries = version.content_entries()?;

        lines.push("### Edited Sections\n".to_string());

        for (section, items) in group_by_section(&entries) {
            lines.push(format!("#### {section}"));
            for (selector, html) in items.iter().take(MAX_ENTRIES_PER_SECTION) {
                let text: String = strip_html(html).chars().take(MAX_TEXT_CHARS).collect();
                if !text.is_empty() {
                    lines.push(format!("- `{selector}`: {text}..."));
                }
            }
            if items.len() > MAX_ENTRIES_PER_SECTION {
                lines.push(format!(
                    "- ... and {} more edits in this section",
                    items.len() - MAX_ENTRIES_PER_SECTION
                ));
            }
            lines.push(String::new());
        }

        lines.push("---\n".to_string());
    }

    Ok(lines.join("\n"))
}

/// Write the backup to `output_file`, replacing any existing file.
pub fn export_to_markdown(versions: &[Revision], output_file: &Path) -> Result<PathBuf> {
    let document = render_markdown(versions, Local::now())?;

    fs::write(output_file, document)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;

    log::info!("Exported {} versions to {}", versions.len(), output_file.display());
    Ok(output_file.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Map, Value};

    fn revision(content: Value) -> Revision {
        serde_json::from_value(json!({
            "version_major": 2,
            "version_minor": 1,
            "updated_by": "sam",
            "updated_at": "2025-03-04T05:06:07+00:00",
            "page": "index",
            "content": content,
        }))
        .unwrap()
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let rev = revision(json!({
            "#hero h1": "<h1>Welcome</h1>",
            "footer p": "<p>Contact us</p>",
        }));

        let doc = render_markdown(&[rev], fixed_time()).unwrap();
        let expected = "# Beacon Platform - Edit History Backup\n\
\n\
Exported: 2025-03-05 09:30\n\
\n\
Total versions: 1\n\
\n\
---\n\
\n\
## Version 2.1\n\
- **Updated by:** sam\n\
- **Updated at:** 2025-03-04T05:06:07+00:00\n\
- **Page:** index\n\
\n\
### Edited Sections\n\
\n\
#### hero\n\
- `#hero h1`: Welcome...\n\
\n\
#### other\n\
- `footer p`: Contact us...\n\
\n\
---\n";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_empty_history() {
        let doc = render_markdown(&[], fixed_time()).unwrap();
        assert!(doc.contains("Total versions: 0"));
        assert!(!doc.contains("## Version"));
    }

    #[test]
    fn test_sections_sorted_and_items_in_order() {
        let rev = revision(json!({
            "#zeta .b": "<p>z1</p>",
            "#alpha .a": "<p>a1</p>",
            "#zeta .a": "<p>z2</p>",
            "#mid": "<p>m</p>",
        }));
        let doc = render_markdown(&[rev], fixed_time()).unwrap();

        let alpha = doc.find("#### alpha").unwrap();
        let mid = doc.find("#### mid").unwrap();
        let zeta = doc.find("#### zeta").unwrap();
        assert!(alpha < mid && mid < zeta);

        let z1 = doc.find("z1...").unwrap();
        let z2 = doc.find("z2...").unwrap();
        assert!(z1 < z2);
    }

    #[test]
    fn test_section_limit_and_remainder() {
        for n in [1usize, 5, 6, 9] {
            let mut content = Map::new();
            for i in 0..n {
                content.insert(format!("#faq li:nth-child({i})"), json!(format!("<li>q{i}</li>")));
            }
            let doc = render_markdown(&[revision(Value::Object(content))], fixed_time()).unwrap();

            let selector_lines = doc.lines().filter(|l| l.starts_with("- `#faq")).count();
            let more_lines: Vec<&str> = doc.lines().filter(|l| l.starts_with("- ... and")).collect();

            assert_eq!(selector_lines, n.min(MAX_ENTRIES_PER_SECTION));
            if n > MAX_ENTRIES_PER_SECTION {
                let expected = format!("- ... and {} more edits in this section", n - 5);
                assert_eq!(more_lines, vec![expected.as_str()]);
            } else {
                assert!(more_lines.is_empty());
            }
        }
    }

    #[test]
    fn test_text_truncated_and_empty_skipped() {
        let long = "x".repeat(250);
        let rev = revision(json!({
            "#a .long": format!("<p>{long}</p>"),
            "#a .img": "<img src=\"logo.png\">",
        }));
        let doc = render_markdown(&[rev], fixed_time()).unwrap();

        assert!(doc.contains(&format!("- `#a .long`: {}...", "x".repeat(200))));
        assert!(!doc.contains(&"x".repeat(201)));
        assert!(!doc.contains("#a .img"));
    }

    #[test]
    fn test_export_overwrites_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("backup.md");
        fs::write(&path, "stale").unwrap();

        let returned = export_to_markdown(&[revision(json!({}))], &path).unwrap();
        assert_eq!(returned, path);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Beacon Platform - Edit History Backup"));
        assert!(!written.contains("stale"));
    }
}
