use anyhow::Context;
use lexgate::{
    api::routes::create_app,
    auth::paseto::generate_keypair,
    cli::{
        output::{Output, Tone},
        Cli, Commands,
    },
    AppState, AuthService, DatabaseProvider, LexgateConfig, SessionTokenService,
};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets usually live in .env during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::new(!cli.no_color);

    match cli.command {
        Some(Commands::Keygen { env }) => keygen(&output, env),
        Some(Commands::Config { validate }) => show_config(&output, &cli.config, validate),
        Some(Commands::Serve) | None => serve(&output, &cli.config, cli.verbose).await,
    }
}

fn keygen(output: &Output, as_env: bool) -> anyhow::Result<()> {
    let (secret, public) = generate_keypair()?;
    let defaults = lexgate::utils::toml_config::AuthConfig::default();

    if as_env {
        println!("{}={}", defaults.paseto_secret_key_env, secret);
        println!("{}={}", defaults.paseto_public_key_env, public);
        return Ok(());
    }

    output.section("PASETO v4.public key pair");
    output.field("secret", &secret);
    output.field("public", &public);
    output.suggest(
        "Store these in the env vars named by [auth] in lexgate.toml",
        Some("lexgate-server keygen --env >> .env"),
    );
    Ok(())
}

fn show_config(output: &Output, path: &Path, validate: bool) -> anyhow::Result<()> {
    let config = match LexgateConfig::read(path) {
        Ok(config) => config,
        Err(e) => {
            output.status(Tone::Fail, &e.to_string());
            anyhow::bail!("configuration could not be loaded");
        }
    };

    if validate {
        return match config.validate() {
            Ok(()) => {
                output.status(Tone::Ok, &format!("{} is valid", path.display()));
                Ok(())
            }
            Err(e) => {
                output.status(Tone::Fail, &e.to_string());
                anyhow::bail!("configuration is invalid");
            }
        };
    }

    let secret_row = |name: &str| output.secret_field(name, config.resolve_env(name).as_deref());

    output.section("Server");
    output.field("bind", &config.bind_address());
    output.field("log_level", &config.server.log_level);
    output.field("cors_origin", &config.server.cors_origin);
    output.field("secure_cookies", &config.server.secure_cookies.to_string());

    output.section("Auth");
    secret_row(&config.auth.paseto_secret_key_env);
    secret_row(&config.auth.paseto_public_key_env);
    output.field("issuer", &config.auth.issuer);
    output.field("audience", &config.auth.audience);
    output.field("token_ttl_hours", &config.auth.token_ttl_hours.to_string());
    output.field(
        "clock_tolerance_secs",
        &config.auth.clock_tolerance_secs.to_string(),
    );

    output.section("Database");
    output.field("url", &config.database.url);
    if let Some(env) = &config.database.turso_url_env {
        secret_row(env);
    }
    if let Some(env) = &config.database.turso_token_env {
        secret_row(env);
    }
    output.blank();

    if !config.server.secure_cookies {
        output.status(
            Tone::Warn,
            "secure_cookies is disabled; cookies will be sent over plain HTTP",
        );
    }
    Ok(())
}

async fn serve(output: &Output, path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = match LexgateConfig::read(path) {
        Ok(config) => config,
        Err(e) => {
            output.status(Tone::Fail, &e.to_string());
            output.suggest(
                "Copy lexgate.toml from the repository root and set the key env vars",
                None,
            );
            anyhow::bail!("configuration could not be loaded");
        }
    };

    if let Err(e) = config.validate() {
        output.status(Tone::Fail, &e.to_string());
        output.suggest(
            "Generate signing keys with:",
            Some("lexgate-server keygen --env >> .env"),
        );
        anyhow::bail!("configuration is invalid");
    }

    // RUST_LOG wins over the configured level
    let default_filter = if verbose {
        "debug".to_string()
    } else {
        config.server.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let users = DatabaseProvider::from_config(&config.database)?
        .create_client()
        .await
        .context("failed to open user database")?;
    tracing::info!("User database ready: {}", config.database.url);

    let session_tokens = Arc::new(SessionTokenService::from_hex(
        &config.paseto_secret_key()?,
        &config.paseto_public_key()?,
        config.auth.token_settings(),
    )?);
    let auth_service = Arc::new(AuthService::new(users, session_tokens.clone()));

    let bind_address = config.bind_address();
    if !config.server.secure_cookies {
        tracing::warn!("secure_cookies is disabled; session cookies lack the Secure flag");
    }

    let state = AppState {
        config: Arc::new(config),
        auth_service,
        session_tokens,
    };
    let app = create_app(state)?;

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    tracing::info!("Lexgate listening on http://{}", bind_address);
    output.banner(&bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Lexgate shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
