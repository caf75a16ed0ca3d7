//! Stub rendering: a query rendered against a synthetic table, reduced to the
//! clauses following `FROM`.

use std::sync::LazyLock;

use regex::Regex;

use crate::sql::{Dialect, Query, RenderedSql};

/// Table name of the disposable stub query.
pub const STUB_TABLE: &str = "stubs";

static STUB_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^SELECT\s+\*?\s*FROM\s+["'`]?stubs["'`]?(\s+AS\s+["'`]?stubs["'`]?)?\s*"#)
        .unwrap()
});

/// Render the JOIN/WHERE/GROUP BY/LIMIT/OFFSET tail of `query`.
///
/// ORDER BY is always removed. Placeholders are numbered from 1, so the
/// fragment can be appended to any statement whose head binds no arguments.
pub fn render_fragment(query: &Query, dialect: Dialect) -> RenderedSql {
    let rendered = query.clone().unordered().to_sql(STUB_TABLE, dialect);
    RenderedSql {
        sql: STUB_PREFIX.replace(&rendered.sql, "").into_owned(),
        args: rendered.args,
    }
}
