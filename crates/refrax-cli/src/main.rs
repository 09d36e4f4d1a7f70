//! Refrax CLI — caustic lens design from density images.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::DesignArgs;

#[derive(Parser)]
#[command(name = "refrax")]
#[command(version, about = "Refrax — freeform caustic lens designer")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design a lens and export it as a solid OBJ.
    Design(DesignArgs),

    /// Check a design config file without running it.
    Validate {
        /// Path to design config (TOML).
        path: String,
    },

    /// Design a lens and report how closely traced rays hit their targets.
    Trace(DesignArgs),
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Design(args) => commands::design(&args),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Trace(args) => commands::trace(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
