// ABOUTME: Integration tests for the template resolution engine
// ABOUTME: Covers field references, conditionals, nesting, and degradation behavior

use mailmill::rows::RowDictionary;
use mailmill::template::resolve;

#[test]
fn test_template_without_tags_is_unchanged() {
    let row = RowDictionary::from([("a", "1")]);
    for template in ["", "plain", "a } b { c", "email: user@host"] {
        assert_eq!(resolve(template, &row), template);
    }
}

#[test]
fn test_missing_field_resolves_to_empty() {
    let row = RowDictionary::new();
    assert_eq!(resolve("{{f}}", &row), "");
}

#[test]
fn test_resolution_is_idempotent() {
    let row = RowDictionary::from([("name", "Alice"), ("status", "active")]);
    let resolved = resolve("Hi {{name}}, you are {{status|active|in|out}}", &row);
    assert_eq!(resolved, "Hi Alice, you are in");

    let empty = RowDictionary::new();
    assert_eq!(resolve(&resolved, &empty), resolved);
}

#[test]
fn test_nested_tags_compute_field_name() {
    let row = RowDictionary::from([("a", "b"), ("b", "value")]);
    assert_eq!(resolve("{{ {{a}} }}", &row), "value");
}

#[test]
fn test_comparator_form() {
    let row = RowDictionary::from([("name", "john")]);
    assert_eq!(resolve("{{name|*|oh|yes|no}}", &row), "no");

    let row = RowDictionary::from([("name", "john oh")]);
    assert_eq!(resolve("{{name|*|oh|yes|no}}", &row), "yes");
}

#[test]
fn test_numeric_strings_compare_numerically() {
    let row = RowDictionary::from([("n", "10")]);
    assert_eq!(resolve("{{n|>|9|more|less}}", &row), "more");
    assert_eq!(resolve("{{n|<|9|less|more}}", &row), "more");
    assert_eq!(resolve("{{n|>=|10|yes|no}}", &row), "yes");
}

#[test]
fn test_equality_form_with_and_without_else() {
    let row = RowDictionary::from([("status", "inactive")]);
    assert_eq!(resolve("{{status|active|Enabled}}", &row), "");
    assert_eq!(resolve("{{status|active|Enabled|Disabled}}", &row), "Disabled");

    let row = RowDictionary::from([("status", "active")]);
    assert_eq!(resolve("{{status|active|Enabled}}", &row), "Enabled");
}

#[test]
fn test_malformed_tag_passes_through() {
    let row = RowDictionary::new();
    assert_eq!(resolve("{{a|b}}", &row), "a|b");
}

#[test]
fn test_dangling_closer_passes_through() {
    let row = RowDictionary::new();
    assert_eq!(resolve("abc}}def", &row), "abc}}def");
}

#[test]
fn test_substituted_markers_are_not_rescanned() {
    let row = RowDictionary::from([("a", "{{b}}"), ("b", "nope")]);
    assert_eq!(resolve("start {{a}} end", &row), "start {{b}} end");
}

#[test]
fn test_conditional_branches_can_carry_resolved_values() {
    // Branch values inside the tag are resolved before the split, as part
    // of the tag's inner material.
    let row = RowDictionary::from([("name", "Alice"), ("vip", "yes")]);
    assert_eq!(
        resolve("{{vip|yes|Dear {{name}}|Hello}}", &row),
        "Dear Alice"
    );
}

#[test]
fn test_whole_message_template() {
    let row = RowDictionary::from([
        ("name", "Alice"),
        ("count", "3"),
        ("plan", "pro"),
    ]);

    let template = "Dear {{name}},\n\
        You have {{count}} item{{count|==|1||s}} waiting.\n\
        Plan: {{plan|pro|Professional|Basic}}.";
    let resolved = resolve(template, &row);

    assert!(resolved.starts_with("Dear Alice,"));
    assert!(resolved.contains("You have 3 items waiting."));
    assert!(resolved.contains("Plan: Professional."));
}
