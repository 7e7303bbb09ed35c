// src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env é opcional: em produção as variáveis vêm do ambiente
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("condo_complaints=debug,tower_http=info,sqlx=warn")),
        )
        .with_target(false)
        .compact()
        .init();

    Cli::parse().run().await
}
