mod cli;

use asciimation::{config, server};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

struct StartOverrides {
    host: Option<String>,
    port: Option<u16>,
    movie: Option<PathBuf>,
    index: Option<PathBuf>,
}

async fn start_server(overrides: StartOverrides, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(movie) = overrides.movie {
        config.movie.path = movie;
    }
    if let Some(index) = overrides.index {
        config.server.index = index;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting asciimation server");

    // The movie must be fully loaded before the first connection is accepted.
    let movie_path = config.movie.path.clone();
    let movie = tokio::task::spawn_blocking(move || asciimation_movie::load_movie(&movie_path))
        .await
        .context("Movie loader panicked")?
        .with_context(|| format!("Failed to load movie {:?}", config.movie.path))?;

    server::start_server(config, movie).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "asciimation=trace,asciimation_movie=debug,tower_http=debug".to_string()
        } else {
            "asciimation=info,asciimation_movie=info,tower_http=info".to_string()
        }
    });

    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start {
            host,
            port,
            movie,
            index,
        } => {
            let overrides = StartOverrides {
                host,
                port,
                movie,
                index,
            };
            let rt = tokio::runtime::Runtime::new()?;
            let result = rt.block_on(start_server(overrides, cli.config.as_deref()));
            if let Err(ref e) = result {
                tracing::error!("{:#}", e);
            }
            result
        }
        Commands::Inspect { movie, json } => inspect_movie(movie, cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("asciimation {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn inspect_movie(movie: Option<PathBuf>, config_path: Option<&Path>, json: bool) -> Result<()> {
    let path = match movie {
        Some(path) => path,
        None => config::load_config_or_default(config_path)?.movie.path,
    };

    let movie = asciimation_movie::load_movie(&path)
        .with_context(|| format!("Failed to load movie {:?}", path))?;
    let first_delay = movie.frames().first().map(|f| f.delay());
    let last_delay = movie.frames().last().map(|f| f.delay());

    if json {
        let summary = serde_json::json!({
            "path": path,
            "frames": movie.len(),
            "duration_ms": movie.total_duration().as_millis() as u64,
            "first_delay_ms": first_delay.map(|d| d.as_millis() as u64),
            "last_delay_ms": last_delay.map(|d| d.as_millis() as u64),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let secs = movie.total_duration().as_secs();
        println!("File: {}", path.display());
        println!("Frames: {}", movie.len());
        println!(
            "Duration: {:02}:{:02}:{:02}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        );
        if let (Some(first), Some(last)) = (first_delay, last_delay) {
            println!("First frame delay: {:?}", first);
            println!("Last frame delay: {:?}", last);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Index: {}", config.server.index.display());
            println!("  Keep-alive: {}s", config.server.keep_alive_secs);
            println!("  Movie: {}", config.movie.path.display());
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Movie: {}", config.movie.path.display());
        }
    }

    Ok(())
}
