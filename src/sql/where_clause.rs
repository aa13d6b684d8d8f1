//! WHERE-clause mini-language.
//!
//! Conditions are an ordered list of `(key, value)` pairs. A `None` value
//! means the key is itself a complete boolean literal and binds nothing;
//! otherwise the key is either `column operator` (one placeholder appended)
//! or a bare column name (rendered as `column = ?`).

use crate::types::RowValues;

use super::escape::escape_column_name;

/// Comparison/operator tokens recognized at the end of a condition key,
/// checked longest-first so `not in` does not shadow `in`. `*=` is a
/// driver-specific equality variant kept for compatibility.
const OPERATOR_TOKENS: [&str; 10] = [
    "is not", "not in", "between", ">=", "<=", "<>", "*=", "is", "in", "=",
];

/// Whether the key already ends in a recognized operator token preceded by
/// whitespace (explicit ASCII check, no regex).
#[must_use]
pub fn ends_with_operator(key: &str) -> bool {
    let lowered = key.trim_end().to_ascii_lowercase();
    OPERATOR_TOKENS.iter().any(|op| {
        lowered.strip_suffix(op).is_some_and(|head| {
            head.ends_with(|c: char| c.is_ascii_whitespace())
        })
    })
}

/// Whether a rendered fragment supplies its own `AND`/`OR` joiner.
fn starts_with_joiner(fragment: &str) -> bool {
    let lowered = fragment.trim_start().to_ascii_lowercase();
    ["and", "or"].iter().any(|kw| {
        lowered
            .strip_prefix(kw)
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_whitespace()))
    })
}

/// Build a `WHERE` fragment and its bound values from ordered conditions.
///
/// Returns `None` for empty input (the caller omits the clause). Bound
/// values are the non-`None` input values in original order.
#[must_use]
pub fn build_where(conditions: &[(&str, Option<RowValues>)]) -> Option<(String, Vec<RowValues>)> {
    if conditions.is_empty() {
        return None;
    }

    let mut fragments = Vec::with_capacity(conditions.len());
    let mut values = Vec::new();

    for (key, value) in conditions {
        let fragment = match value {
            // Key is a complete boolean literal, nothing to bind.
            None => (*key).to_string(),
            Some(val) => {
                values.push(val.clone());
                if ends_with_operator(key) {
                    format!("{} ?", key.trim_end())
                } else {
                    format!("{} = ?", escape_column_name(key))
                }
            }
        };

        if fragments.is_empty() || starts_with_joiner(&fragment) {
            fragments.push(fragment);
        } else {
            fragments.push(format!("AND {fragment}"));
        }
    }

    Some((format!("WHERE {}", fragments.join(" ")), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_clause() {
        assert!(build_where(&[]).is_none());
    }

    #[test]
    fn bare_column_renders_equality() {
        let (sql, values) = build_where(&[("status", Some(RowValues::Text("ok".into())))]).unwrap();
        assert_eq!(sql, "WHERE \"status\" = ?");
        assert_eq!(values, vec![RowValues::Text("ok".into())]);
    }

    #[test]
    fn trailing_operator_is_kept_verbatim() {
        let (sql, values) = build_where(&[
            ("age >=", Some(RowValues::Int(18))),
            ("name <>", Some(RowValues::Text("bob".into()))),
        ])
        .unwrap();
        assert_eq!(sql, "WHERE age >= ? AND name <> ?");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn multi_word_operators_are_recognized() {
        assert!(ends_with_operator("deleted_at is not"));
        assert!(ends_with_operator("id not in"));
        assert!(ends_with_operator("id in "));
        assert!(ends_with_operator("created between"));
        assert!(ends_with_operator("a *="));
        // Bare columns whose names merely end in an operator's letters.
        assert!(!ends_with_operator("margin"));
        assert!(!ends_with_operator("basis"));
        assert!(!ends_with_operator("status"));
    }

    #[test]
    fn null_value_keeps_key_as_boolean_literal() {
        let (sql, values) = build_where(&[
            ("age >=", Some(RowValues::Int(18))),
            ("status is not null", None),
        ])
        .unwrap();
        assert_eq!(sql, "WHERE age >= ? AND status is not null");
        assert_eq!(values, vec![RowValues::Int(18)]);
    }

    #[test]
    fn caller_supplied_joiner_suppresses_and() {
        let (sql, values) = build_where(&[
            ("a", Some(RowValues::Int(1))),
            ("or b is null", None),
        ])
        .unwrap();
        assert_eq!(sql, "WHERE \"a\" = ? or b is null");
        assert_eq!(values, vec![RowValues::Int(1)]);
    }

    #[test]
    fn values_preserve_input_order() {
        let (_, values) = build_where(&[
            ("a", Some(RowValues::Int(1))),
            ("b", Some(RowValues::Int(2))),
            ("c is null", None),
            ("d", Some(RowValues::Int(3))),
        ])
        .unwrap();
        assert_eq!(
            values,
            vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)]
        );
    }
}
