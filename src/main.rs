use anyhow::Context;
use parley::{
    AppState, ChainOfThought, ParleyConfig, Provider,
    api::routes::create_router,
    cli::{
        Cli, Commands, init,
        output::{Mark, Output},
        parse_provider,
    },
    utils::config::LogFormat,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command.take() {
        Some(Commands::Init {
            path,
            force,
            provider,
            host,
            port,
        }) => {
            let result = init::run(
                init::InitConfig {
                    path,
                    force,
                    provider: parse_provider(&provider),
                    host,
                    port,
                },
                &output,
            );
            if let init::InitResult::Error(e) = result {
                anyhow::bail!(e);
            }
            Ok(())
        }
        Some(Commands::Config { validate }) => {
            let config = ParleyConfig::load(&cli.config)
                .with_context(|| format!("Invalid configuration in {}", cli.config.display()))?;
            if validate {
                output.status(Mark::Ok, &format!("{} is valid", cli.config.display()));
            } else {
                output.section("configuration");
                output.config_summary(&cli.config, &config);
                println!(
                    "\n{}",
                    config.to_toml().context("Failed to render configuration")?
                );
            }
            Ok(())
        }
        Some(Commands::Serve { host, port }) => serve(&cli, host, port, &output).await,
        None => serve(&cli, None, None, &output).await,
    }
}

async fn serve(
    cli: &Cli,
    host: Option<String>,
    port: Option<u16>,
    output: &Output,
) -> anyhow::Result<()> {
    let mut config = ParleyConfig::load(&cli.config)
        .with_context(|| format!("Invalid configuration in {}", cli.config.display()))?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    init_tracing(&config, cli.verbose);
    output.banner();

    let provider = Provider::from_config(&config.reasoner)?;
    let client = provider.create_client()?;
    info!(provider = provider.name(), model = provider.model(), "Reasoner initialized");

    let addr = config.server.bind_addr();
    let state = AppState::new(config, Arc::new(ChainOfThought::new(client)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Parley listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &ParleyConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parley={0},parley_server={0},tower_http={0}",
            default_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
