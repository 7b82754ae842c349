// ABOUTME: Evaluates one tag's inner text against a row dictionary
// ABOUTME: Handles field references, comparator conditionals, and the equality form

use std::cmp::Ordering;
use tracing::debug;

use super::resolver::resolve;
use crate::rows::RowDictionary;

/// Comparator operators usable in the five-token conditional form
/// `{{field|op|compare|then|else}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `*` — the field value contains the operand.
    Contains,
    /// `^` — the field value starts with the operand.
    StartsWith,
    /// `$` — the field value ends with the operand.
    EndsWith,
    /// `==` — loose equality.
    Equal,
    /// `>` — greater than.
    Greater,
    /// `>=` — greater than or equal.
    GreaterOrEqual,
    /// `<` — less than.
    Less,
    /// `<=` — less than or equal.
    LessOrEqual,
}

impl CompareOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Self::Contains),
            "^" => Some(Self::StartsWith),
            "$" => Some(Self::EndsWith),
            "==" => Some(Self::Equal),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterOrEqual),
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            _ => None,
        }
    }

    /// Apply the operator to a field value and a literal operand.
    ///
    /// Coercion rule for the ordered operators and `==`: when both sides
    /// parse as f64 they compare numerically (so "10" > "9"), otherwise
    /// byte-wise lexicographically, with `==` falling back to exact string
    /// equality.
    pub fn eval(&self, value: &str, operand: &str) -> bool {
        match self {
            Self::Contains => value.contains(operand),
            Self::StartsWith => value.starts_with(operand),
            Self::EndsWith => value.ends_with(operand),
            Self::Equal => compare(value, operand) == Ordering::Equal,
            Self::Greater => compare(value, operand) == Ordering::Greater,
            Self::GreaterOrEqual => compare(value, operand) != Ordering::Less,
            Self::Less => compare(value, operand) == Ordering::Less,
            Self::LessOrEqual => compare(value, operand) != Ordering::Greater,
        }
    }
}

fn compare(value: &str, operand: &str) -> Ordering {
    if let (Ok(a), Ok(b)) = (value.parse::<f64>(), operand.parse::<f64>()) {
        if let Some(ordering) = a.partial_cmp(&b) {
            return ordering;
        }
    }
    value.cmp(operand)
}

/// Resolve one tag's inner text to its literal replacement.
///
/// Nested tags are resolved first, once, so a field name or conditional
/// operand may itself be computed from other fields. The fully resolved
/// text is then classified: no pipe means a field reference (absent fields
/// degrade to empty), otherwise it is split on pipes into a conditional.
/// The split tokens are never re-resolved.
pub fn evaluate(inner: &str, row: &RowDictionary) -> String {
    let resolved = resolve(inner, row);
    let literal = resolved.trim();

    if !literal.contains('|') {
        return match row.get(literal) {
            Some(value) => value.to_string(),
            None => {
                debug!("Unknown field '{}' resolves to empty", literal);
                String::new()
            }
        };
    }

    let tokens: Vec<&str> = literal.split('|').collect();

    if tokens.len() >= 5 {
        if let Some(op) = CompareOp::from_token(tokens[1]) {
            let value = row.get(tokens[0]).unwrap_or("");
            let branch = if op.eval(value, tokens[2]) {
                tokens[3]
            } else {
                tokens[4]
            };
            return branch.to_string();
        }
    }

    if tokens.len() >= 3 {
        let matched = row.get(tokens[0]) == Some(tokens[1]);
        if matched {
            return tokens[2].to_string();
        }
        return tokens.get(3).copied().unwrap_or("").to_string();
    }

    // Fewer than 3 tokens around a stray pipe: malformed, keep the literal.
    debug!("Malformed conditional tag '{}' left unchanged", literal);
    literal.to_string()
}
