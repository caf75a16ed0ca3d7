//! Shared fixture: a `widgets` model declared in TOML and an in-memory
//! SQLite database holding its table.

#![allow(dead_code)]

use rusqlite::{params, Connection};
use scopekit::catalog::ModelDescriptor;
use scopekit::config::Settings;

pub const WIDGETS_TOML: &str = r#"
[dsl]
separator = "|"
args_separator = ","

[[models]]
name = "widget"
table = "widgets"

[[models.fields]]
name = "id"
column = "id"
type = "uuid"

[[models.fields]]
name = "num"
column = "num"
type = "integer"
nullable = true

[[models.fields]]
name = "name"
column = "name"
type = "text"

[[models.fields]]
name = "created_at"
column = "created_at"
type = "text"

[[models.fields]]
name = "secret"
column = "-"
type = "text"

[[models.custom_filters]]
name = "name_length"
statement = "length(widgets.name)"
type = "integer"

[[models.custom_sorts]]
name = "num"
statement = "coalesce(widgets.num, 0)"
type = "integer"
"#;

pub const ID_A: &str = "00000000-0000-4000-8000-000000000001";
pub const ID_B: &str = "00000000-0000-4000-8000-000000000002";
pub const ID_C: &str = "00000000-0000-4000-8000-000000000003";

pub fn settings() -> Settings {
    Settings::from_toml_str(WIDGETS_TOML).expect("fixture settings parse")
}

pub fn widgets() -> ModelDescriptor {
    settings().get_model("widget").expect("widget model").clone()
}

/// An empty `widgets` table.
pub fn connection() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(
        "CREATE TABLE widgets (
            id TEXT PRIMARY KEY,
            num INTEGER,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .expect("create widgets");
    conn
}

pub fn insert(conn: &Connection, id: &str, num: Option<i64>, name: &str) {
    conn.execute(
        "INSERT INTO widgets (id, num, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, num, name, "2024-01-01T00:00:00Z"],
    )
    .expect("insert widget");
}

/// Widgets A and B with `num = 123`.
pub fn two_widgets_same_num() -> Connection {
    let conn = connection();
    insert(&conn, ID_A, Some(123), "alpha");
    insert(&conn, ID_B, Some(123), "beta");
    conn
}
