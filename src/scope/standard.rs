//! Standard scopes shared by every resource.

use std::collections::BTreeSet;

use uuid::Uuid;

use super::Scope;
use crate::catalog::Model;
use crate::sql::Value;

/// Always-false condition used when a scope cannot match anything.
pub const FAIL_QUERY: &str = "1 = 0";

fn fail() -> Scope {
    Scope::new(|q| q.filter(FAIL_QUERY, vec![]))
}

fn qualified(table: Option<&str>, column: &str) -> String {
    match table {
        Some(table) => format!("{}.{}", table, column),
        None => column.to_string(),
    }
}

fn parse_id(id: &str) -> Option<Uuid> {
    if id.is_empty() {
        return None;
    }
    match Uuid::parse_str(id) {
        Ok(uuid) => Some(uuid),
        Err(err) => {
            log::warn!("invalid id '{}': {}", id, err);
            None
        }
    }
}

fn id_condition(table: Option<&str>, op: &str, id: &str) -> Scope {
    let Some(uuid) = parse_id(id) else {
        return fail();
    };
    let sql = format!("{} {} ?", qualified(table, "id"), op);
    Scope::new(move |q| q.filter(sql.clone(), vec![uuid.into()]))
}

fn id_set_condition(table: Option<&str>, op: &str, ids: &[Uuid]) -> Scope {
    let set: BTreeSet<Uuid> = ids.iter().copied().collect();
    if set.is_empty() {
        return fail();
    }
    let placeholders = vec!["?"; set.len()].join(", ");
    let sql = format!("{} {} ({})", qualified(table, "id"), op, placeholders);
    let args: Vec<Value> = set.into_iter().map(Value::from).collect();
    Scope::new(move |q| q.filter(sql.clone(), args.clone()))
}

pub fn for_limit(limit: u64) -> Scope {
    Scope::new(move |q| q.limit(limit))
}

pub fn for_one() -> Scope {
    for_limit(1)
}

/// The oldest record by `created_at`.
pub fn for_first() -> Scope {
    Scope::new(|q| q.order("created_at ASC, id ASC").limit(1))
}

/// The newest record by `created_at`.
pub fn for_last() -> Scope {
    Scope::new(|q| q.order("created_at DESC, id DESC").limit(1))
}

/// Order by each clause in turn, e.g. `for_order(&["name ASC"])`.
pub fn for_order(clauses: &[&str]) -> Scope {
    let clauses: Vec<String> = clauses.iter().map(|c| c.to_string()).collect();
    Scope::new(move |q| clauses.iter().fold(q, |q, c| q.order(c.clone())))
}

pub fn for_id(id: &str) -> Scope {
    id_condition(None, "=", id)
}

pub fn for_id_with_table_name(id: &str, table: &str) -> Scope {
    id_condition(Some(table), "=", id)
}

pub fn for_id_for_model(id: &str, model: &dyn Model) -> Scope {
    id_condition(Some(model.table_name()), "=", id)
}

pub fn for_ids(ids: &[Uuid]) -> Scope {
    id_set_condition(None, "in", ids)
}

pub fn for_ids_with_table_name(ids: &[Uuid], table: &str) -> Scope {
    id_set_condition(Some(table), "in", ids)
}

pub fn for_ids_for_model(ids: &[Uuid], model: &dyn Model) -> Scope {
    id_set_condition(Some(model.table_name()), "in", ids)
}

pub fn for_not_id(id: &str) -> Scope {
    id_condition(None, "!=", id)
}

pub fn for_not_id_with_table_name(id: &str, table: &str) -> Scope {
    id_condition(Some(table), "!=", id)
}

pub fn for_not_id_for_model(id: &str, model: &dyn Model) -> Scope {
    id_condition(Some(model.table_name()), "!=", id)
}

pub fn for_not_ids(ids: &[Uuid]) -> Scope {
    id_set_condition(None, "not in", ids)
}

pub fn for_not_ids_with_table_name(ids: &[Uuid], table: &str) -> Scope {
    id_set_condition(Some(table), "not in", ids)
}

pub fn for_not_ids_for_model(ids: &[Uuid], model: &dyn Model) -> Scope {
    id_set_condition(Some(model.table_name()), "not in", ids)
}

pub fn for_uuid_id(id: Uuid) -> Scope {
    Scope::new(move |q| q.filter("id = ?", vec![id.into()]))
}

pub fn for_not_uuid_id(id: Uuid) -> Scope {
    Scope::new(move |q| q.filter("id != ?", vec![id.into()]))
}

/// `id = ?` for `Some`, the failure clause for `None`.
pub fn for_optional_uuid_id(id: Option<Uuid>) -> Scope {
    match id {
        Some(id) => for_uuid_id(id),
        None => fail(),
    }
}

pub fn for_null_deleted_at() -> Scope {
    for_null("deleted_at")
}

pub fn for_null_deleted_at_for_model(model: &dyn Model) -> Scope {
    for_null(&qualified(Some(model.table_name()), "deleted_at"))
}

pub fn for_not_null_deleted_at() -> Scope {
    for_not_null("deleted_at")
}

pub fn for_not_null_deleted_at_for_model(model: &dyn Model) -> Scope {
    for_not_null(&qualified(Some(model.table_name()), "deleted_at"))
}

/// `<field> is null` for a column or statement.
pub fn for_null(field: &str) -> Scope {
    let sql = format!("{} is null", field);
    Scope::new(move |q| q.filter(sql.clone(), vec![]))
}

/// `<field> is not null` for a column or statement.
pub fn for_not_null(field: &str) -> Scope {
    let sql = format!("{} is not null", field);
    Scope::new(move |q| q.filter(sql.clone(), vec![]))
}
