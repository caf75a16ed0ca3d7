//! Query builder - the value every scope transforms.
//!
//! A [`Query`] collects raw SQL clauses with `?` placeholders and their bound
//! arguments. It is rendered against a table name for a [`Dialect`], at which
//! point placeholders are renumbered across the whole statement.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};
use super::value::Value;

// =============================================================================
// Clauses
// =============================================================================

/// A raw SQL fragment with `?` placeholders and the arguments bound to them.
///
/// A `?` inside a quoted literal or identifier is not a placeholder, and `??`
/// renders as a literal `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Clause {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        let sql = sql.into();
        let expected = placeholder_count(&sql);
        if expected != args.len() {
            log::warn!(
                "clause `{}` has {} placeholder(s) but {} argument(s)",
                sql,
                expected,
                args.len()
            );
        }
        Self { sql, args }
    }

    /// Convert to tokens, numbering placeholders from `*next_param`.
    fn to_tokens(&self, next_param: &mut usize) -> TokenStream {
        let mut ts = TokenStream::new();
        for piece in split_placeholders(&self.sql) {
            match piece {
                Piece::Sql(s) => ts.push(Token::Raw(s)),
                Piece::Param => {
                    *next_param += 1;
                    ts.push(Token::Param(*next_param))
                }
            };
        }
        ts
    }

    /// Whether this clause has to be parenthesized before being ANDed with
    /// other clauses.
    fn needs_grouping(&self) -> bool {
        has_top_level_or(&self.sql)
    }
}

/// Whether `sql` contains an `OR` outside every parenthesis and quote.
fn has_top_level_or(sql: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut word = String::new();

    for c in sql.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' || c == '.' {
            if depth == 0 {
                word.push(c);
            }
            continue;
        }
        if depth == 0 && word.eq_ignore_ascii_case("or") {
            return true;
        }
        word.clear();
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

enum Piece {
    Sql(String),
    Param,
}

fn split_placeholders(sql: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '?' if chars.peek() == Some(&'?') => {
                    chars.next();
                    current.push('?');
                }
                '?' => {
                    if !current.is_empty() {
                        pieces.push(Piece::Sql(std::mem::take(&mut current)));
                    }
                    pieces.push(Piece::Param);
                }
                _ => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        pieces.push(Piece::Sql(current));
    }
    pieces
}

/// Count the placeholders in a clause.
pub fn placeholder_count(sql: &str) -> usize {
    split_placeholders(sql)
        .iter()
        .filter(|p| matches!(p, Piece::Param))
        .count()
}

// =============================================================================
// Select list
// =============================================================================

/// A SELECT list item: raw statement with optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub statement: String,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Raw(self.statement.clone()));
        if let Some(alias) = &self.alias {
            ts.space().push(Token::As).space().push(Token::Raw(alias.clone()));
        }
        ts
    }
}

// =============================================================================
// Rendered output
// =============================================================================

/// SQL text with its positional arguments, ready for execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedSql {
    pub sql: String,
    pub args: Vec<Value>,
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query under construction.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until rendered with to_sql()"]
pub struct Query {
    pub select: Vec<SelectItem>,
    pub joins: Vec<Clause>,
    pub where_clauses: Vec<Clause>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list. An empty list renders as `SELECT *`.
    pub fn select(mut self, items: Vec<SelectItem>) -> Self {
        self.select = items;
        self
    }

    /// Add a raw JOIN clause.
    pub fn join(mut self, sql: impl Into<String>, args: Vec<Value>) -> Self {
        self.joins.push(Clause::new(sql, args));
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, sql: impl Into<String>, args: Vec<Value>) -> Self {
        self.where_clauses.push(Clause::new(sql, args));
        self
    }

    /// Add a GROUP BY expression.
    pub fn group_by(mut self, statement: impl Into<String>) -> Self {
        self.group_by.push(statement.into());
        self
    }

    /// Add an ORDER BY clause, e.g. `name DESC`.
    pub fn order(mut self, clause: impl Into<String>) -> Self {
        self.order_by.push(clause.into());
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Drop every ORDER BY clause.
    pub fn unordered(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// All bound arguments in render order.
    pub fn args(&self) -> Vec<Value> {
        self.joins
            .iter()
            .chain(self.where_clauses.iter())
            .flat_map(|c| c.args.iter().cloned())
            .collect()
    }

    /// Convert to token stream for `FROM table AS table`.
    pub fn to_tokens(&self, table: &str) -> TokenStream {
        let mut ts = TokenStream::new();
        let mut next_param = 0;

        ts.push(Token::Select).space();
        if self.select.is_empty() {
            ts.push(Token::Star);
        } else {
            for (i, item) in self.select.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&item.to_tokens());
            }
        }

        ts.space()
            .push(Token::From)
            .space()
            .push(Token::Ident(table.into()))
            .space()
            .push(Token::As)
            .space()
            .push(Token::Ident(table.into()));

        for join in &self.joins {
            ts.space().append(&join.to_tokens(&mut next_param));
        }

        if !self.where_clauses.is_empty() {
            ts.space().push(Token::Where).space();
            let grouped = self.where_clauses.len() > 1;
            for (i, clause) in self.where_clauses.iter().enumerate() {
                if i > 0 {
                    ts.space().push(Token::And).space();
                }
                if grouped && clause.needs_grouping() {
                    ts.lparen()
                        .append(&clause.to_tokens(&mut next_param))
                        .rparen();
                } else {
                    ts.append(&clause.to_tokens(&mut next_param));
                }
            }
        }

        if !self.group_by.is_empty() {
            ts.space()
                .push(Token::GroupBy)
                .space()
                .push(Token::Raw(self.group_by.join(", ")));
        }

        if !self.order_by.is_empty() {
            ts.space()
                .push(Token::OrderBy)
                .space()
                .push(Token::Raw(self.order_by.join(", ")));
        }

        ts
    }

    /// Generate SQL and arguments for a specific dialect.
    pub fn to_sql(&self, table: &str, dialect: Dialect) -> RenderedSql {
        let mut ts = self.to_tokens(table);

        let pagination = dialect.emit_limit_offset(self.limit, self.offset);
        if !pagination.is_empty() {
            ts.space().append(&pagination);
        }

        RenderedSql {
            sql: ts.serialize(dialect),
            args: self.args(),
        }
    }
}
