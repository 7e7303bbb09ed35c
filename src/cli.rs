// src/cli.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::{connect_database, AppState, DatabaseConfig, ServerConfig},
    models::auth::Role,
    routes,
    services::auth::AuthSettings,
};

#[derive(Parser)]
#[command(name = "condo-complaints")]
#[command(about = "Backend de reclamações do condomínio: API HTTP e ferramentas de administração")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sobe o servidor HTTP (aplica as migrações antes)
    Serve(ServerConfig),

    /// Define a role de um usuário pelo e-mail
    ///
    /// Único jeito de criar o primeiro síndico:
    ///   condo-complaints set-role --email sindico@condominio.com --role sindico
    SetRole {
        #[command(flatten)]
        database: DatabaseConfig,

        /// E-mail do usuário já registrado
        #[arg(long)]
        email: String,

        /// Nova role: morador, admin_bloco ou sindico
        #[arg(long)]
        role: Role,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(config) => serve(config).await,
            Commands::SetRole { database, email, role } => set_role(database, &email, role).await,
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let db_pool = connect_database(&config.database).await?;
    let app_state = AppState::new(db_pool, config.auth_settings());

    let app = routes::create_router(app_state)
        .layer(routes::cors_layer(config.cors_allowed_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Falha ao escutar em {}", config.bind_address))?;

    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

async fn set_role(database: DatabaseConfig, email: &str, role: Role) -> Result<()> {
    let db_pool = connect_database(&database).await?;

    // Sem requisitante: as regras de acesso da API não se aplicam aqui
    let app_state = AppState::new(
        db_pool,
        AuthSettings {
            jwt_secret: String::new(),
            token_ttl: chrono::Duration::zero(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        },
    );

    let user = app_state
        .user_service
        .set_role_by_email(email, role)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!(
        "✅ {} (id {}, registrado em {}) agora é {}.",
        user.email,
        user.id,
        user.created_at.format("%d/%m/%Y"),
        user.role
    );
    Ok(())
}
