//! Plain-text rendering of stored HTML fragments.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static SECTION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\w-]+)").expect("valid section pattern"));

/// Entities decoded by [`strip_html`], applied in this order.
const ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&quot;", "\""),
];

/// Section used for selectors without an `#id` token.
pub const FALLBACK_SECTION: &str = "other";

/// Reduce an HTML fragment to a single line of text.
///
/// Tags become spaces, a fixed set of entities is decoded, whitespace runs
/// collapse to one space and the ends are trimmed. Other entities are left
/// as written.
pub fn strip_html(html: &str) -> String {
    let mut text = TAG.replace_all(html, " ").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Section identifier for a selector: the first `#token`, else `other`.
pub fn section_id(selector: &str) -> &str {
    SECTION_ID
        .captures(selector)
        .and_then(|caps| caps.get(1))
        .map_or(FALLBACK_SECTION, |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<p>Hello <b>world</b></p>", "Hello world")]
    #[case("Fish &amp; Chips", "Fish & Chips")]
    #[case("a&nbsp;&nbsp;b", "a b")]
    #[case("say &quot;hi&quot;", "say \"hi\"")]
    #[case("  \n\t<div>\n  spaced\n\n out </div>  ", "spaced out")]
    #[case("line<br>break", "line break")]
    #[case("&copy; 2025", "&copy; 2025")]
    #[case("", "")]
    fn test_strip_html(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_html(input), expected);
    }

    #[test]
    fn test_decoded_angle_brackets_are_kept() {
        assert_eq!(strip_html("1 &lt; 2"), "1 < 2");
    }

    #[test]
    fn test_no_tags_or_double_spaces_remain() {
        let inputs = [
            "<section id=\"hero\"><h1 class=\"title\">Beacon</h1>\n\n<p>Data   for <em>all</em></p></section>",
            "<ul><li>one</li><li>two</li></ul>",
            "text with <unclosed",
            "<a href='x'>link</a> text",
            "\u{a0}non\u{a0}\u{a0}breaking ",
        ];
        for input in inputs {
            let out = strip_html(input);
            assert!(!out.contains('>'), "{out:?}");
            assert!(!out.contains("  "), "{out:?}");
            assert_eq!(out, out.trim());
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "<p>Hello   <i>there</i></p>",
            "Fish &amp; Chips &quot;to go&quot;",
            "plain text",
            "<div>\n<span>x</span>\n</div>",
        ];
        for input in inputs {
            let once = strip_html(input);
            assert_eq!(strip_html(&once), once);
        }
    }

    #[rstest]
    #[case("#hero .title", "hero")]
    #[case("section#pricing-table > td", "pricing-table")]
    #[case("div.card p", "other")]
    #[case("#a_b #second", "a_b")]
    #[case("#", "other")]
    fn test_section_id(#[case] selector: &str, #[case] expected: &str) {
        assert_eq!(section_id(selector), expected);
    }
}
