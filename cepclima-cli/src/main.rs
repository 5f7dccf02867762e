//! CEP Clima CLI
//!
//! Runs the lookup service and exposes its pieces from the command line.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cepclima_api::{ApiConfig, ApiServer, AppState};
use cepclima_core::{convert, validator};

/// CEP Clima - current temperature for a Brazilian postal code
#[derive(Parser)]
#[command(name = "cepclima")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on (defaults to PORT or 8081)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Look up the current temperature for a CEP
    Lookup {
        /// Postal code, with or without the hyphen
        cep: String,
        /// Print the response body as JSON
        #[arg(long)]
        raw: bool,
    },

    /// Convert a temperature to all three scales
    Convert {
        /// Temperature value
        #[arg(allow_hyphen_values = true)]
        value: f64,
        /// Scale of the input value
        #[arg(short, long, value_enum, default_value_t = Scale::Celsius)]
        from: Scale,
    },

    /// Validate and normalize a CEP
    Validate {
        /// Postal code to check
        cep: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scale {
    #[value(alias = "c")]
    Celsius,
    #[value(alias = "f")]
    Fahrenheit,
    #[value(alias = "k")]
    Kelvin,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "cepclima=debug,tower_http=debug,info"
    } else {
        "cepclima=info,warn"
    };

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));
    if cli.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Lookup { cep, raw } => cmd_lookup(&cep, raw).await,
        Commands::Convert { value, from } => cmd_convert(value, from),
        Commands::Validate { cep } => cmd_validate(&cep),
    }
}

fn load_config() -> Result<ApiConfig> {
    let config = ApiConfig::from_env().context("Failed to read configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the API server
async fn cmd_serve(port: Option<u16>, bind: &str) -> Result<()> {
    let mut config = load_config()?;
    if let Some(port) = port {
        config.port = port;
    }
    let addr: SocketAddr = format!("{}:{}", bind, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {bind}"))?;

    println!("{}", "🌡️  Starting CEP Clima API server...".cyan().bold());
    println!("   {} http://{}", "Listening on:".green(), addr);
    println!("   {} http://{}/health", "Health check:".dimmed(), addr);
    println!("   {} http://{}/cache/stats", "Cache stats:".dimmed(), addr);
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to build upstream clients")?;
    info!(%addr, "Starting server");
    server.run(addr).await.context("Server error")?;

    println!("{}", "👋 Server stopped.".dimmed());
    Ok(())
}

/// Look up a CEP without starting the server
async fn cmd_lookup(cep: &str, raw: bool) -> Result<()> {
    let state = AppState::new(load_config()?).context("Failed to build upstream clients")?;

    if !raw {
        println!("{} {}", "🔍 Looking up:".cyan().bold(), cep);
    }

    let outcome = match state.orchestrator.lookup(cep).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let summary = format!("{} {}", err.status_code(), err.message());
            return Err(anyhow::Error::new(err).context(summary));
        }
    };

    if raw {
        println!("{}", serde_json::to_string(&outcome.result)?);
        return Ok(());
    }

    let result = &outcome.result;
    println!("\n{}", "✅ Current temperature:".green().bold());
    println!("   {} {}", "CEP:".dimmed(), outcome.postal_code.formatted());
    println!("   {} {}", "City:".dimmed(), result.city);
    println!("   {} {:.1} °C", "Celsius:".dimmed(), result.temp_c);
    println!("   {} {:.1} °F", "Fahrenheit:".dimmed(), result.temp_f);
    println!("   {} {:.1} K", "Kelvin:".dimmed(), result.temp_k);
    println!("   {} {}", "Feels:".dimmed(), convert::describe(result.temp_c).label());

    Ok(())
}

/// Convert a temperature between scales
fn cmd_convert(value: f64, from: Scale) -> Result<()> {
    let celsius = match from {
        Scale::Celsius => value,
        Scale::Fahrenheit => convert::fahrenheit_to_celsius(value),
        Scale::Kelvin => convert::kelvin_to_celsius(value),
    };
    let result = convert::convert_all(celsius, "");

    println!("{}", "🌡️  Conversion:".cyan().bold());
    println!("   {} {:.1} °C", "Celsius:".dimmed(), result.temp_c);
    println!("   {} {:.1} °F", "Fahrenheit:".dimmed(), result.temp_f);
    println!("   {} {:.1} K", "Kelvin:".dimmed(), result.temp_k);
    println!("   {} {}", "Feels:".dimmed(), convert::describe(celsius).label());

    if !convert::is_plausible(celsius) {
        println!("   {}", "⚠️  Outside the plausible surface range".yellow());
    }

    Ok(())
}

/// Validate a CEP
fn cmd_validate(cep: &str) -> Result<()> {
    match validator::validate_and_normalize(cep) {
        Ok(code) => {
            println!("{} {}", "✅ Valid CEP:".green().bold(), code.formatted());
            println!("   {} {}", "Normalized:".dimmed(), code);
            Ok(())
        }
        Err(err) => {
            println!("{} {:?}", "❌ Invalid CEP:".red().bold(), cep);
            Err(err).context("invalid zipcode")
        }
    }
}
