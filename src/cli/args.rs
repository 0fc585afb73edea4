//! CLI argument definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "enigma")]
#[command(about = "Encrypt and decrypt messages with a simulated rotor cipher machine")]
#[command(version)]
pub struct Cli {
    /// Machine configuration file
    pub config: PathBuf,

    /// Input file with settings lines and messages (standard input if omitted)
    pub input: Option<PathBuf>,

    /// Output file (standard output if omitted)
    pub output: Option<PathBuf>,

    /// Print rotor positions and plugboard stage of every symbol to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration format (auto-detected if not specified)
    #[arg(short = 'f', long)]
    pub format: Option<ConfigFormat>,

    /// Write the parsed configuration in this format to the output and exit
    #[arg(long, value_name = "FORMAT")]
    pub emit_config: Option<ConfigFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// Whitespace separated text (alphabet, counts, rotor descriptors)
    Text,
    /// JSON document
    #[cfg(feature = "serialization")]
    Json,
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            #[cfg(feature = "serialization")]
            Self::Json => write!(f, "json"),
        }
    }
}
