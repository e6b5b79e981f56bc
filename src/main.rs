use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kokoro_core::config::Config;
use kokoro_core::provider::{CompletionProvider, GeminiProvider};
use kokoro_core::service::http::{serve, AppState};
use kokoro_core::store::file_store::FileDocumentStore;

#[derive(Parser)]
#[command(
    name = "kokoro",
    about = "kokoro - AI mental health companion backend",
    version = kokoro_core::VERSION,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Server port
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Validate configuration and storage, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional; deployments may set process env directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kokoro=info".parse().unwrap())
                .add_directive("kokoro_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => cmd_serve(host, port).await?,
        Commands::Check => cmd_check()?,
    }

    Ok(())
}

// ====== Commands ======

fn load_config_or_exit() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn cmd_serve(host: String, port: u16) -> Result<()> {
    let config = load_config_or_exit();

    let store = FileDocumentStore::open(&config.store.path, &config.store.database)?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(GeminiProvider::new(
        config.gemini.api_key.clone(),
        config.gemini.api_base.clone(),
    ));

    let state = Arc::new(AppState::new(config, Box::new(store), provider));

    let addr = format!("{}:{}", host, port);
    serve(&addr, state).await?;
    Ok(())
}

fn cmd_check() -> Result<()> {
    let config = load_config_or_exit();

    println!("✓ GOOGLE_API_KEY set");
    println!("✓ Store path: {}", config.store.path.display());
    println!("  Database: {}", config.store.database);
    println!(
        "  CORS origins: {}",
        if config.cors.allow_any() {
            "* (any)".to_string()
        } else {
            config.cors.allowed_origins.join(", ")
        }
    );

    match FileDocumentStore::open(&config.store.path, &config.store.database) {
        Ok(_) => println!("✓ Store directory ready"),
        Err(e) => {
            eprintln!("✗ Store: {}", e);
            std::process::exit(1);
        }
    }

    println!("\nConfiguration OK");
    Ok(())
}
