//! enigma - rotor cipher machine simulator
//!
//! Usage: `enigma [--verbose] CONFIG [INPUT [OUTPUT]]`

use clap::Parser;
use colored::Colorize;
use std::process;

use libenigma::cli::commands;
use libenigma::cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
