//! HTML to plain-text conversion for fetched evidence pages.

use regex::Regex;

/// Reduces an HTML document to the visible text, one block per line.
///
/// Script, style, and comment content is removed outright; block-level
/// closing tags become newlines so headings and table cells stay separated;
/// everything else is tag-stripped, entity-decoded, and whitespace-collapsed.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let script_re =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid script regex");
    let style_re = Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid style regex");
    let comment_re = Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex");
    let block_re = Regex::new(r"(?i)<(?:br\s*/?|/p|/div|/li|/tr|/h[1-6]|/dd|/dt|/td|/th)>")
        .expect("valid block-tag regex");
    let tag_re = Regex::new(r"(?s)<[^>]+>").expect("valid tag regex");

    let text = script_re.replace_all(html, " ");
    let text = style_re.replace_all(&text, " ");
    let text = comment_re.replace_all(&text, " ");
    let text = block_re.replace_all(&text, "\n");
    let text = tag_re.replace_all(&text, " ");
    let text = decode_entities(&text);

    // Collapse intra-line whitespace and drop empty lines.
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Truncates to at most `max_chars` characters, never splitting a character.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let html = "<html><head><style>body{color:red}</style>\
                    <script>alert('x')</script></head>\
                    <body><h1>会社概要</h1><p>代表取締役 山田太郎</p></body></html>";
        let text = html_to_text(html);
        assert!(!text.contains("alert"));
        assert!(!text.contains("color:red"));
        assert!(text.contains("会社概要"));
        assert!(text.contains("代表取締役 山田太郎"));
    }

    #[test]
    fn block_tags_become_line_breaks() {
        let html = "<dl><dt>商号</dt><dd>株式会社テスト</dd><dt>代表者</dt><dd>山田太郎</dd></dl>";
        let text = html_to_text(html);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() >= 4, "expected separated lines, got: {text:?}");
        assert!(lines.iter().any(|l| *l == "株式会社テスト"));
    }

    #[test]
    fn decodes_common_entities() {
        let text = html_to_text("<p>A &amp; B &lt;C&gt; &quot;D&quot;&nbsp;E</p>");
        assert_eq!(text, "A & B <C> \"D\" E");
    }

    #[test]
    fn comments_are_removed() {
        let text = html_to_text("<p>before<!-- hidden note -->after</p>");
        assert!(!text.contains("hidden"));
        assert!(text.contains("before"));
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        let s = "あいうえお";
        assert_eq!(truncate_chars(s, 3), "あいう");
        assert_eq!(truncate_chars(s, 5), "あいうえお");
        assert_eq!(truncate_chars(s, 10), "あいうえお");
    }

    #[test]
    fn truncate_chars_empty_input() {
        assert_eq!(truncate_chars("", 100), "");
    }
}
