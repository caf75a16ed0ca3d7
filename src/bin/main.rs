//! Scopekit CLI - Inspect models and run scoped queries
//!
//! Usage:
//!   scopekit columns <model>
//!   scopekit compile <model> [key=value ...] [--dialect <dialect>]
//!   scopekit aggregate <model> [key=value ...] [--db <file.sqlite>]
//!   scopekit options <model> <column> [key=value ...] [--db <file.sqlite>]
//!
//! Examples:
//!   scopekit compile widgets filter_columns=num filter_types=GT filter_values=3 sort_columns=num sort_directions=DESC
//!   scopekit aggregate widgets aggregation_column=num aggregation_type=SUM --db widgets.db
//!   scopekit options widgets name --db widgets.db

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use scopekit::aggregate::{
    aggregate_from_params, aggregate_grouped_from_params, filter_options, AGGREGATION_GROUPER_KEY,
};
use scopekit::catalog::{filter_columns, sort_columns, ModelDescriptor};
use scopekit::config::{Settings, SettingsError};
use scopekit::filter::for_filters_from_params;
use scopekit::params::{ParamValues, Params};
use scopekit::scope::for_paginate_from_params;
use scopekit::sort::for_sort_from_params;
use scopekit::{Collection, Dialect, Query, Scope, ScopeError};

#[derive(Parser)]
#[command(name = "scopekit")]
#[command(about = "Scopekit - Compile filter/sort/aggregation parameters to scoped SQL")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to $SCOPEKIT_CONFIG, ./scopekit.toml, ~/.config/scopekit/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the filter and sort columns of a model
    Columns {
        /// Model name from the settings file
        model: String,
    },

    /// Print the SQL a parameter set compiles to
    Compile {
        model: String,

        /// Request parameters as key=value
        params: Vec<String>,

        /// SQL dialect to generate
        #[arg(short, long, default_value = "postgres")]
        dialect: DialectArg,
    },

    /// Run an aggregation against a SQLite database
    Aggregate {
        model: String,

        /// Request parameters as key=value
        params: Vec<String>,

        /// SQLite database (defaults to database.path from settings)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List the distinct values of a filter column
    Options {
        model: String,

        /// Filter column name
        column: String,

        /// Request parameters as key=value
        params: Vec<String>,

        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Sqlite,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("invalid parameter: {0}")]
    Param(String),

    #[error("no database given: pass --db or set database.path")]
    MissingDatabase,

    #[error("cannot open database '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    match cli.command {
        Commands::Columns { model } => cmd_columns(&settings, &model),
        Commands::Compile {
            model,
            params,
            dialect,
        } => cmd_compile(&settings, &model, &params, dialect.into()),
        Commands::Aggregate { model, params, db } => {
            cmd_aggregate(&settings, &model, &params, db)
        }
        Commands::Options {
            model,
            column,
            params,
            db,
        } => cmd_options(&settings, &model, &column, &params, db),
    }
}

fn parse_params(raw: &[String]) -> Result<Params, CliError> {
    Params::from_pairs(raw).map_err(CliError::Param)
}

fn open_database(settings: &Settings, db: Option<PathBuf>) -> Result<Connection, CliError> {
    let path = match db {
        Some(path) => path,
        None => settings
            .database
            .resolved_path()?
            .ok_or(CliError::MissingDatabase)?,
    };
    log::info!("opening {}", path.display());
    Connection::open(&path).map_err(|source| CliError::Open { path, source })
}

/// Filter and sort scopes compiled from request parameters.
fn request_scopes(
    settings: &Settings,
    model: &ModelDescriptor,
    params: &Params,
) -> Result<Vec<Scope>, CliError> {
    Ok(vec![
        for_filters_from_params(model, params, &settings.dsl)?,
        for_sort_from_params(model, params, &settings.dsl)?,
    ])
}

fn cmd_columns(settings: &Settings, name: &str) -> Result<(), CliError> {
    let model = settings.get_model(name)?;
    let output = serde_json::json!({
        "model": model.name,
        "table": model.table,
        "filter": filter_columns(model)?.iter().collect::<Vec<_>>(),
        "sort": sort_columns(model)?.iter().collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_compile(
    settings: &Settings,
    name: &str,
    raw: &[String],
    dialect: Dialect,
) -> Result<(), CliError> {
    let model = settings.get_model(name)?;
    let params = parse_params(raw)?;

    let mut scopes = Collection::with_dialect(dialect);
    scopes
        .extend(request_scopes(settings, model, &params)?)
        .push(for_paginate_from_params(&params, &settings.pagination));

    let rendered = scopes
        .flatten()?
        .apply(Query::new())
        .to_sql(&model.table, dialect);

    println!("{}", rendered.sql);
    if !rendered.args.is_empty() {
        println!("-- args: {}", serde_json::to_string(&rendered.args)?);
    }
    Ok(())
}

fn cmd_aggregate(
    settings: &Settings,
    name: &str,
    raw: &[String],
    db: Option<PathBuf>,
) -> Result<(), CliError> {
    let model = settings.get_model(name)?;
    let params = parse_params(raw)?;
    let conn = open_database(settings, db)?;
    let scopes = request_scopes(settings, model, &params)?;

    let output = if params.get_non_blank(AGGREGATION_GROUPER_KEY).is_some() {
        let rows = aggregate_grouped_from_params(&conn, model, &params, &settings.dsl, &scopes)?;
        serde_json::to_string_pretty(&rows)?
    } else {
        let record = aggregate_from_params(&conn, model, &params, &settings.dsl, &scopes)?;
        serde_json::to_string_pretty(&record)?
    };
    println!("{}", output);
    Ok(())
}

fn cmd_options(
    settings: &Settings,
    name: &str,
    column: &str,
    raw: &[String],
    db: Option<PathBuf>,
) -> Result<(), CliError> {
    let model = settings.get_model(name)?;
    let params = parse_params(raw)?;
    let conn = open_database(settings, db)?;

    let mut scopes = Collection::with_connection(&conn);
    scopes.extend(request_scopes(settings, model, &params)?);

    let values = filter_options(&conn, model, column, &scopes)?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
