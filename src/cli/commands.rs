//! CLI command implementations
//!
//! One-shot commands open the store, act, print JSON to stdout and exit;
//! `serve` builds a tokio runtime and hands the store to the HTTP server.

use std::path::Path;
use std::sync::Arc;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use crate::http_server::{ApiState, HttpServer, HttpServerConfig};
use crate::store::{SqliteStore, Store};
use crate::value::{Kind, Value};

/// Dispatch a parsed command line
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Serve { db, bind, port } => serve(&db, bind, port),
        Command::Get { db, key } => get(&db, &key),
        Command::Set { db, key, kind, data } => set(&db, &key, kind, &data),
        Command::Delete { db, key } => delete(&db, &key),
        Command::List { db } => list(&db),
    }
}

fn open(db: &Path) -> CliResult<SqliteStore> {
    Ok(Store::open(db)?)
}

fn serve(db: &Path, bind: String, port: u16) -> CliResult<()> {
    let store = open(db)?;
    let config = HttpServerConfig {
        bind_addr: bind,
        port,
        ..HttpServerConfig::default()
    };
    let server = HttpServer::with_config(config, Arc::new(ApiState::new(store)));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.run())?;
    Ok(())
}

fn get(db: &Path, key: &str) -> CliResult<()> {
    let store = open(db)?;
    match store.get(key)? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        None => Err(CliError::NotFound(key.to_owned())),
    }
}

fn set(db: &Path, key: &str, kind: i64, data: &str) -> CliResult<()> {
    let kind = Kind::from_code(kind)?;
    let data: serde_json::Value = serde_json::from_str(data)?;
    let value = Value::from_kind_and_json(kind, &data)?;
    let store = open(db)?;
    store.set(key, &value)?;
    Ok(())
}

fn delete(db: &Path, key: &str) -> CliResult<()> {
    let store = open(db)?;
    store.delete(key)?;
    Ok(())
}

fn list(db: &Path) -> CliResult<()> {
    let store = open(db)?;
    let all = store.get_all()?;
    println!("{}", serde_json::to_string_pretty(&all)?);
    Ok(())
}
