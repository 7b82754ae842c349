// ABOUTME: HTML to plain text conversion for the text fallback body
// ABOUTME: Ships a small tag-stripping converter behind the HtmlToText trait

pub trait HtmlToText: Send + Sync {
    fn convert(&self, html: &str) -> String;
}

/// Minimal converter: drops tags and script/style content, turns the
/// common block-level closers and breaks into newlines, decodes the basic
/// entities, and collapses runs of blank lines.
#[derive(Debug, Clone, Default)]
pub struct TagStrippingConverter;

impl TagStrippingConverter {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlToText for TagStrippingConverter {
    fn convert(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;

        while let Some(open) = rest.find('<') {
            out.push_str(&rest[..open]);
            rest = &rest[open..];

            let Some(close) = rest.find('>') else {
                // Unterminated tag, keep the remainder as text.
                out.push_str(rest);
                rest = "";
                break;
            };

            let tag = &rest[1..close];
            let name = tag
                .trim_start_matches('/')
                .split([' ', '\t', '\n', '/'])
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();

            rest = &rest[close + 1..];

            match name.as_str() {
                "script" | "style" if !tag.starts_with('/') => {
                    let closer = format!("</{}", name);
                    match rest.to_ascii_lowercase().find(&closer) {
                        Some(end) => {
                            rest = &rest[end..];
                            if let Some(close) = rest.find('>') {
                                rest = &rest[close + 1..];
                            } else {
                                rest = "";
                            }
                        }
                        None => rest = "",
                    }
                }
                "br" => out.push('\n'),
                "p" | "div" | "tr" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        }
        out.push_str(rest);

        let decoded = out
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        // Collapse 3+ consecutive newlines down to a blank line.
        let mut text = String::with_capacity(decoded.len());
        let mut newlines = 0;
        for c in decoded.chars() {
            if c == '\n' {
                newlines += 1;
                if newlines <= 2 {
                    text.push(c);
                }
            } else {
                newlines = 0;
                text.push(c);
            }
        }

        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let converter = TagStrippingConverter::new();
        assert_eq!(converter.convert("just text"), "just text");
    }

    #[test]
    fn test_tags_stripped_and_blocks_break() {
        let converter = TagStrippingConverter::new();
        let html = "<p>Hello <b>world</b></p><p>Second</p>";
        assert_eq!(converter.convert(html), "Hello world\nSecond");
    }

    #[test]
    fn test_script_content_dropped() {
        let converter = TagStrippingConverter::new();
        let html = "before<script>alert('x')</script>after";
        assert_eq!(converter.convert(html), "beforeafter");
    }

    #[test]
    fn test_entities_decoded() {
        let converter = TagStrippingConverter::new();
        assert_eq!(converter.convert("a &amp; b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        let converter = TagStrippingConverter::new();
        let html = "a<br><br><br><br>b";
        assert_eq!(converter.convert(html), "a\n\nb");
    }
}
