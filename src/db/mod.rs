//! Database collaborator.
//!
//! The scope layer never owns a connection. It renders SQL for the handle's
//! dialect and asks the handle to execute it.

mod sqlite;

use crate::error::ScopeResult;
use crate::scope::Scope;
use crate::sql::{Dialect, Query, Value};

/// A read-only handle capable of executing rendered statements.
pub trait Database {
    /// Dialect used to render SQL for this handle.
    fn dialect(&self) -> Dialect;

    /// Execute `sql` with positional `args` and return every row.
    fn fetch_rows(&self, sql: &str, args: &[Value]) -> ScopeResult<Vec<Vec<Value>>>;
}

/// List rows of `table` through a (usually flattened) scope.
pub fn find_rows(db: &dyn Database, table: &str, scope: &Scope) -> ScopeResult<Vec<Vec<Value>>> {
    let rendered = scope.apply(Query::new()).to_sql(table, db.dialect());
    log::debug!("find_rows: {} {:?}", rendered.sql, rendered.args);
    db.fetch_rows(&rendered.sql, &rendered.args)
}
