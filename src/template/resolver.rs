// ABOUTME: Whole-string template resolution over the tag scanner and evaluator
// ABOUTME: Splices replacements left to right without re-scanning inserted text

use super::evaluator;
use super::scanner;
use crate::rows::RowDictionary;

/// Rewrite `template`, replacing every top-level tag with its resolved
/// value, left to right.
///
/// The scan cursor advances past each spliced-in replacement, so text a
/// substitution introduces is never re-scanned for tags; recursion is
/// bounded by the nesting depth of the source template. Dangling closers
/// and unterminated openers pass through verbatim. Resolution never
/// mutates the row dictionary and is idempotent per row.
pub fn resolve(template: &str, row: &RowDictionary) -> String {
    let mut output = template.to_string();
    let mut cursor = 0;

    while let Some(span) = scanner::next_tag(&output, cursor) {
        let replacement = evaluator::evaluate(span.inner(&output), row);
        output.replace_range(span.start..span.end, &replacement);
        cursor = span.start + replacement.len();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::RowDictionary;

    #[test]
    fn test_tagless_template_unchanged() {
        let row = RowDictionary::from([("a", "1")]);
        assert_eq!(resolve("no tags here", &row), "no tags here");
        assert_eq!(resolve("", &row), "");
    }

    #[test]
    fn test_simple_substitution() {
        let row = RowDictionary::from([("name", "Alice")]);
        assert_eq!(resolve("Hello {{name}}!", &row), "Hello Alice!");
    }

    #[test]
    fn test_unknown_field_resolves_empty() {
        let row = RowDictionary::new();
        assert_eq!(resolve("{{f}}", &row), "");
        assert_eq!(resolve("a{{f}}b", &row), "ab");
    }

    #[test]
    fn test_multiple_tags_left_to_right() {
        let row = RowDictionary::from([("a", "1"), ("b", "2")]);
        assert_eq!(resolve("{{a}}-{{b}}-{{a}}", &row), "1-2-1");
    }

    #[test]
    fn test_nested_tag_computes_field_name() {
        let row = RowDictionary::from([("a", "b"), ("b", "value")]);
        assert_eq!(resolve("{{ {{a}} }}", &row), "value");
    }

    #[test]
    fn test_inserted_text_not_rescanned() {
        let row = RowDictionary::from([("a", "{{b}}"), ("b", "boom")]);
        assert_eq!(resolve("{{a}}", &row), "{{b}}");
    }

    #[test]
    fn test_idempotence_on_resolved_output() {
        let row = RowDictionary::from([("name", "Alice"), ("n", "2")]);
        let once = resolve("Hi {{name}}, {{n|>|1|several|one}}", &row);
        let empty = RowDictionary::new();
        assert_eq!(resolve(&once, &empty), once);
    }

    #[test]
    fn test_dangling_closer_verbatim() {
        let row = RowDictionary::new();
        assert_eq!(resolve("abc}}def", &row), "abc}}def");
    }

    #[test]
    fn test_unterminated_opener_verbatim() {
        let row = RowDictionary::from([("a", "1")]);
        assert_eq!(resolve("{{a}} and {{open", &row), "1 and {{open");
    }

    #[test]
    fn test_conditional_inside_text() {
        let row = RowDictionary::from([("status", "inactive")]);
        assert_eq!(
            resolve("Account: {{status|active|Enabled|Disabled}}", &row),
            "Account: Disabled"
        );
    }

    #[test]
    fn test_malformed_tag_keeps_literal() {
        let row = RowDictionary::new();
        assert_eq!(resolve("{{a|b}}", &row), "a|b");
    }

    #[test]
    fn test_nested_conditional_operand() {
        let row = RowDictionary::from([("field", "count"), ("count", "5")]);
        assert_eq!(resolve("{{ {{field}}|>|3|big|small }}", &row), "big");
    }
}
