//! Shared helper functions for SQL dialect implementations.

use super::super::token::{Token, TokenStream};

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Numbered placeholder (`$1`, `$2`, ...).
pub fn placeholder_numbered(index: usize) -> String {
    format!("${}", index)
}

/// Anonymous placeholder (`?`), bound by position.
pub fn placeholder_anonymous(_index: usize) -> String {
    "?".into()
}

/// Row count literal, saturating at `i64::MAX`.
fn count(n: u64) -> Token {
    Token::LitInt(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Emit LIMIT ... OFFSET ... (standard SQL).
/// Used by: Postgres
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit).space().push(count(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset).space().push(count(off));
    }

    ts
}

/// Emit LIMIT ... OFFSET ..., substituting `unbounded` for a missing LIMIT
/// whenever an OFFSET is present.
/// Used by: SQLite (`-1`), MySQL (`18446744073709551615`)
pub fn emit_limit_offset_required_limit(
    limit: Option<u64>,
    offset: Option<u64>,
    unbounded: &str,
) -> TokenStream {
    let mut ts = TokenStream::new();

    match (limit, offset) {
        (Some(lim), _) => {
            ts.push(Token::Limit).space().push(count(lim));
        }
        (None, Some(_)) => {
            ts.push(Token::Limit).space().push(Token::Raw(unbounded.into()));
        }
        (None, None) => {}
    }

    if let Some(off) = offset {
        ts.space().push(Token::Offset).space().push(count(off));
    }

    ts
}
