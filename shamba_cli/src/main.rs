use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod plan;
mod zones;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the visiting order for a pickup trip
    Optimize {
        #[arg(short, long)]
        input: PathBuf,

        /// Average collection speed in km/h (overrides the request)
        #[arg(short, long)]
        speed_kmh: Option<f64>,

        /// Emit the plan as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check a new zone's geometry against existing zones
    ValidateZone {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Find the best zone for a farmer location
    ResolveZone {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the JSON schema for pickup plan requests
    Schema,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Optimize {
            input,
            speed_kmh,
            json,
        } => plan::optimize(&input, speed_kmh, json)?,
        Commands::ValidateZone { input } => zones::validate(&input)?,
        Commands::ResolveZone { input } => zones::resolve(&input)?,
        Commands::Schema => println!("{}", shamba_core::json::schema::generate_json_schema()?),
    }

    Ok(())
}
