use anyhow::Context;
use cookbook::{
    AppState, CookbookConfig, build_app,
    auth::{Argon2Verifier, AuthService},
    cli::{
        Cli, Commands,
        init::{self, InitConfig, InitResult},
        output::Output,
    },
    db::{DatabaseProvider, TursoClient},
    services::user::MIN_PASSWORD_CHARS,
    utils::config::SeedPassword,
};
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init { path, force }) => match init::run(InitConfig { path, force }, &output) {
            InitResult::Success | InitResult::AlreadyExists => Ok(()),
            InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
        },
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        Some(Commands::Serve) | None => serve(&cli.config, cli.verbose).await,
    }
}

fn show_config(path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = match CookbookConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("{}: {}", path.display(), e));
            anyhow::bail!("invalid configuration");
        }
    };

    if validate {
        output.success(&format!("{} is valid", path.display()));
        return Ok(());
    }

    let set_or_unset = |env: &str| {
        if config.resolve_env(env).is_some() {
            format!("{} (set)", env)
        } else {
            format!("{} (unset)", env)
        }
    };

    output.header("Server");
    output.kv("address", &config.bind_address());
    output.kv("log_level", &config.server.log_level);
    output.kv("log_format", &config.server.log_format);

    output.header("Auth");
    output.kv("jwt_secret_env", &set_or_unset(&config.auth.jwt_secret_env));
    output.kv("token_expiry_hours", &config.auth.token_expiry_hours.to_string());
    output.kv("cookie_name", &config.auth.cookie_name);

    output.header("Database");
    output.kv("url", &config.database.url);
    if let Some(ref env) = config.database.turso_url_env {
        output.kv("turso_url_env", &set_or_unset(env));
    }

    output.header("Admin");
    output.kv("username", &config.admin.username);
    output.kv("password_env", &set_or_unset(&config.admin.password_env));
    output.newline();

    Ok(())
}

fn init_tracing(config: &CookbookConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[cfg(feature = "turso")]
fn remote_provider(config: &CookbookConfig) -> Option<DatabaseProvider> {
    config
        .turso_credentials()
        .map(|(url, auth_token)| DatabaseProvider::Turso { url, auth_token })
}

#[cfg(not(feature = "turso"))]
fn remote_provider(_config: &CookbookConfig) -> Option<DatabaseProvider> {
    None
}

async fn open_database(config: &CookbookConfig) -> anyhow::Result<TursoClient> {
    let provider = match remote_provider(config) {
        Some(provider) => {
            tracing::info!("opening remote database");
            provider
        }
        None => {
            tracing::info!(url = %config.database.url, "opening database");
            DatabaseProvider::from_url(&config.database.url)
        }
    };

    provider
        .create_client()
        .await
        .context("failed to open database")
}

async fn seed_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = &state.config.admin;
    let seed = state.config.admin_password();
    match seed {
        SeedPassword::Configured(_) => {}
        SeedPassword::Unset => tracing::warn!(
            env = %admin.password_env,
            "admin password variable unset, seeding with the default password"
        ),
        SeedPassword::TooShort => tracing::warn!(
            env = %admin.password_env,
            min_chars = MIN_PASSWORD_CHARS,
            "admin password too short to log in with, seeding with the default password"
        ),
    }
    let password = seed.into_password();

    let created = state
        .users
        .ensure_seed_account(&admin.username, &password, true)
        .await
        .context("failed to seed admin account")?;

    if created {
        tracing::info!(username = %admin.username, "admin account created");
    } else {
        tracing::debug!(username = %admin.username, "admin account already present");
    }

    Ok(())
}

async fn serve(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = CookbookConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    init_tracing(&config, verbose);

    let db = Arc::new(open_database(&config).await?);
    let auth_service = Arc::new(AuthService::new(
        config.jwt_secret()?,
        config.auth.token_expiry_secs(),
    ));
    let address = config.bind_address();

    let state = AppState::new(config, db, auth_service, Arc::new(Argon2Verifier));
    seed_admin(&state).await?;

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!(%address, "cookbook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}
