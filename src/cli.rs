use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asciimation")]
#[command(author, version, about = "Stream ASCII-art movies over Server-Sent Events")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the movie and start streaming it
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Gzip-compressed movie file (overrides config)
        #[arg(short, long)]
        movie: Option<PathBuf>,

        /// Index page served at / (overrides config)
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// Load a movie file and print a summary
    Inspect {
        /// Movie file (uses the configured movie if not specified)
        movie: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
