// ABOUTME: Scanner locating the outermost balanced {{..}} spans in a template
// ABOUTME: Tracks nesting depth so inner tags and dangling closers are handled correctly

/// Byte span of one top-level tag, markers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan {
    /// Offset of the opening `{{`.
    pub start: usize,
    /// Offset one past the closing `}}`.
    pub end: usize,
}

impl TagSpan {
    /// The text strictly between the opening and closing marker pairs.
    pub fn inner<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start + 2..self.end - 2]
    }
}

/// Find the next top-level tag at or after `from`.
///
/// A depth counter tracks marker pairs: `{{` increments (recording the tag
/// start on the 0→1 transition), `}}` decrements, and the span is complete
/// when the counter returns to 0. A `}}` seen at depth 0 is a dangling
/// closer and is skipped over as plain text, as is an opener that never
/// closes before the end of input.
pub fn next_tag(input: &str, from: usize) -> Option<TagSpan> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = from;

    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if depth == 0 {
                start = i;
            }
            depth += 1;
            i += 2;
        } else if bytes[i] == b'}' && bytes[i + 1] == b'}' && depth > 0 {
            depth -= 1;
            if depth == 0 {
                return Some(TagSpan { start, end: i + 2 });
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tag() {
        let span = next_tag("Hello {{name}}!", 0).unwrap();
        assert_eq!(span, TagSpan { start: 6, end: 14 });
        assert_eq!(span.inner("Hello {{name}}!"), "name");
    }

    #[test]
    fn test_no_tag() {
        assert_eq!(next_tag("plain text", 0), None);
        assert_eq!(next_tag("", 0), None);
        assert_eq!(next_tag("{", 0), None);
    }

    #[test]
    fn test_nested_tag_spans_outer() {
        let input = "{{ {{a}} }}";
        let span = next_tag(input, 0).unwrap();
        assert_eq!(span, TagSpan { start: 0, end: input.len() });
        assert_eq!(span.inner(input), " {{a}} ");
    }

    #[test]
    fn test_dangling_closer_ignored() {
        assert_eq!(next_tag("abc}}def", 0), None);

        let input = "}}{{a}}";
        let span = next_tag(input, 0).unwrap();
        assert_eq!(span.inner(input), "a");
    }

    #[test]
    fn test_unterminated_opener() {
        assert_eq!(next_tag("{{never closed", 0), None);
        assert_eq!(next_tag("{{outer {{inner}}", 0), None);
    }

    #[test]
    fn test_scan_from_offset() {
        let input = "{{a}} and {{b}}";
        let span = next_tag(input, 5).unwrap();
        assert_eq!(span.inner(input), "b");
    }

    #[test]
    fn test_inner_closer_not_double_counted() {
        let input = "{{x{{y}}z}}tail";
        let span = next_tag(input, 0).unwrap();
        assert_eq!(span.end, 11);
        assert_eq!(span.inner(input), "x{{y}}z");
    }
}
