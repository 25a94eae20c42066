pub mod accessors;
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod remote;
pub mod services;
pub mod sync;
pub mod views;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::sync::Arc;

use crate::cli::{Cli, Command, LiveTable, Table};
use crate::config::AppConfig;
use crate::remote::{RemoteDataService, SupabaseService};
use crate::services::{ConsoleService, ServerService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn load_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().context("Remote service is not configured")
}

fn connect(config: &AppConfig) -> Result<Arc<dyn RemoteDataService>> {
    let service = SupabaseService::new(config.remote.clone())?;
    Ok(Arc::new(service))
}

pub fn handle_serve(port: u16, assets: &str) -> Result<()> {
    let config = load_config()?.with_server(port, assets);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = ServerService::new(config.clone(), connect(&config)?);
        service.run().await
    })
}

pub fn handle_show(table: Table) -> Result<()> {
    let config = load_config()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { ConsoleService::new(connect(&config)?).show(table).await })
}

pub fn handle_watch(table: LiveTable) -> Result<()> {
    let config = load_config()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { ConsoleService::new(connect(&config)?).watch(table).await })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
