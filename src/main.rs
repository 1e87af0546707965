use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repobase::config::Config;
use repobase::{logger, ProcedureParam, ProcedureReader, Storage};
use serde_json::Value as JsonValue;

/// Call stored procedures and print their rows as nested JSON
#[derive(Parser, Debug)]
#[command(name = "repobase", version, about)]
struct Cli {
    /// Configuration file (defaults to ./repobase.toml or the XDG config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call a stored procedure
    Call {
        /// Procedure name without schema
        procedure: String,
        /// Parameters as name=value
        #[arg(short, long = "param")]
        params: Vec<String>,
        /// Override the configured schema
        #[arg(long)]
        schema: Option<String>,
    },
    /// Run a raw SQL query; dotted column aliases become nested objects
    Query { sql: String },
    /// Write a default configuration file
    InitConfig { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => Config::get_default_config_path()?,
            };
            Config::generate_default_config(&path)?;
            println!("{}", path.display());
            Ok(())
        }
        command => run(cli.config.as_deref(), command).await,
    }
}

async fn run(config_path: Option<&Path>, command: Command) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    logger::init(&config.logging)?;

    let storage = Storage::connect(&config.database)
        .await
        .with_context(|| format!("Failed to connect to {}", config.database.url))?;
    let reader = ProcedureReader::from_config(&config.procedures);

    let rows: Vec<JsonValue> = match command {
        Command::Call {
            procedure,
            params,
            schema,
        } => {
            let params = params
                .iter()
                .map(|arg| ProcedureParam::parse(arg))
                .collect::<Result<Vec<_>, _>>()?;
            let mut call = reader.call(procedure).params(params);
            if let Some(schema) = schema {
                call = call.schema(schema);
            }
            reader.execute(storage.conn(), &call).await?
        }
        Command::Query { sql } => reader.read(storage.conn(), storage.statement(sql)).await?,
        Command::InitConfig { .. } => Vec::new(),
    };

    println!("{}", serde_json::to_string_pretty(&rows)?);
    storage.close().await?;
    Ok(())
}
