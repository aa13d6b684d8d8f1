//! Identifier escaping and normalization.
//!
//! Table and column names are lower-cased, trimmed, and wrapped in ANSI
//! double quotes (valid on both shipped drivers). Aliases written as
//! `name alias` or `name as alias` come back as two quoted tokens joined
//! with `AS`; wildcard and function-call expressions pass through as-is.

/// Wrap one identifier token in double quotes, doubling embedded quotes.
fn quote(token: &str) -> String {
    format!("\"{}\"", token.replace('"', "\"\""))
}

/// Escape and normalize a table name, honoring `base alias` and
/// `base as alias` forms.
#[must_use]
pub fn escape_table_name(table: &str) -> String {
    let table = table.trim().to_ascii_lowercase();

    if table.contains(' ') {
        let (base, alias) = match table.split_once(" as ") {
            Some(parts) => parts,
            None => table.split_once(' ').unwrap_or((table.as_str(), "")),
        };
        format!("{} AS {}", quote(base.trim()), quote(alias.trim()))
    } else {
        quote(&table)
    }
}

/// Escape and normalize a column name.
///
/// The wildcard `*` and any expression containing an open parenthesis
/// (function call or subquery) pass through unescaped. A leading
/// `alias.` prefix and a trailing ` as alias` are each quoted separately.
#[must_use]
pub fn escape_column_name(column: &str) -> String {
    if column == "*" {
        return column.to_string();
    }

    // Subqueries and function calls cannot be escaped.
    if column.contains('(') {
        return column.to_string();
    }

    let lowered = column.trim().to_ascii_lowercase();

    let (table_alias, col) = match lowered.split_once('.') {
        Some((alias, rest)) => (format!("{}.", quote(alias)), rest),
        None => (String::new(), lowered.as_str()),
    };

    if let Some((name, alias)) = col.split_once(" as ") {
        format!(
            "{}{} AS {}",
            table_alias,
            quote(name.trim()),
            quote(alias.trim())
        )
    } else {
        format!("{}{}", table_alias, quote(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_table_name_is_quoted_and_lowered() {
        assert_eq!(escape_table_name("Orders"), "\"orders\"");
        assert_eq!(escape_table_name("  users  "), "\"users\"");
    }

    #[test]
    fn table_alias_forms() {
        assert_eq!(escape_table_name("users u"), "\"users\" AS \"u\"");
        assert_eq!(escape_table_name("users as u"), "\"users\" AS \"u\"");
    }

    #[test]
    fn wildcard_and_functions_pass_through() {
        assert_eq!(escape_column_name("*"), "*");
        assert_eq!(escape_column_name("count(*)"), "count(*)");
        assert_eq!(
            escape_column_name("(select max(id) from t)"),
            "(select max(id) from t)"
        );
    }

    #[test]
    fn dotted_column_quotes_both_parts() {
        assert_eq!(escape_column_name("a.b"), "\"a\".\"b\"");
        assert_eq!(escape_column_name("U.Name"), "\"u\".\"name\"");
    }

    #[test]
    fn column_alias_forms() {
        assert_eq!(escape_column_name("a as x"), "\"a\" AS \"x\"");
        assert_eq!(escape_column_name("t.a as x"), "\"t\".\"a\" AS \"x\"");
    }

    #[test]
    fn embedded_quote_is_doubled() {
        assert_eq!(escape_column_name("we\"ird"), "\"we\"\"ird\"");
    }
}
