//! Placeholder translation between driver dialects.
//!
//! The builder and the executor write positional `?` placeholders. SQLite
//! consumes them natively; Postgres wants numbered `$N` markers, so the
//! statement is rewritten on the way out. The scanner skips string
//! literals, quoted identifiers, and comments so a `?` inside them is left
//! alone.

use std::borrow::Cow;

/// Target placeholder style for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Positional `?` markers (SQLite).
    Question,
    /// Numbered `$1`, `$2`, ... markers (Postgres).
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Rewrite bare `?` placeholders to sequential `$N` when the target style is
/// numbered. Returns a borrowed `Cow` when nothing changes.
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    if target == PlaceholderStyle::Question {
        return Cow::Borrowed(sql);
    }

    let mut out: Option<Vec<u8>> = None;
    let mut state = State::Normal;
    let mut next_index = 1u32;
    let bytes = sql.as_bytes();
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        let mut replaced = false;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => state = State::LineComment,
                b'/' if bytes.get(idx + 1) == Some(&b'*') => state = State::BlockComment,
                b'?' => {
                    let buf = out.get_or_insert_with(|| bytes[..idx].to_vec());
                    buf.push(b'$');
                    buf.extend_from_slice(next_index.to_string().as_bytes());
                    next_index += 1;
                    replaced = true;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        // Escaped quote, copy both bytes and stay in the literal.
                        if let Some(ref mut buf) = out {
                            buf.extend_from_slice(b"''");
                        }
                        replaced = true;
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        if let Some(ref mut buf) = out {
                            buf.extend_from_slice(b"\"\"");
                        }
                        replaced = true;
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    if let Some(ref mut buf) = out {
                        buf.extend_from_slice(b"*/");
                    }
                    replaced = true;
                    state = State::Normal;
                    idx += 1;
                }
            }
        }

        if let Some(ref mut buf) = out {
            if !replaced {
                buf.push(b);
            }
        }

        idx += 1;
    }

    match out {
        // Only ASCII was inserted into a valid UTF-8 source, so this cannot fail.
        Some(buf) => Cow::Owned(String::from_utf8(buf).unwrap_or_else(|e| {
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        })),
        None => Cow::Borrowed(sql),
    }
}
