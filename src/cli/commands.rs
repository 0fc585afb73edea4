//! CLI command implementations

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::MachineConfig;
use crate::machine::Machine;
use crate::stream::{self, ProcessStats};
use crate::trace::{StepObserver, StepTrace};

use super::args::{Cli, ConfigFormat};
use super::detect::detect_format;

/// Observer printing one line per converted symbol to stderr
#[derive(Debug, Default)]
pub struct VerboseObserver;

impl StepObserver for VerboseObserver {
    fn observe(&mut self, trace: &StepTrace) {
        eprintln!("{}", verbose_line(trace));
    }
}

/// One trace line as printed by `--verbose`
fn verbose_line(trace: &StepTrace) -> ColoredString {
    trace.to_string().cyan()
}

/// Execute the CLI
pub fn execute(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config, cli.format)?;

    if let Some(format) = cli.emit_config {
        let mut output = open_output(cli.output.as_deref())?;
        write_config(&config, format, &mut output)?;
        return output.flush().context("Failed to flush output");
    }

    let mut machine = config
        .build()
        .with_context(|| format!("Invalid configuration: {}", cli.config.display()))?;

    let input = open_input(cli.input.as_deref())?;
    let output = open_output(cli.output.as_deref())?;

    let stats = run(&mut machine, input, output, cli.verbose)?;
    if cli.verbose {
        eprintln!(
            "{} {} settings line(s), {} message(s), {} symbol(s)",
            "Done:".bold(),
            stats.settings,
            stats.messages,
            stats.symbols
        );
    }
    Ok(())
}

/// Run every line of `input` through `machine`
pub fn run<R: BufRead, W: Write>(
    machine: &mut Machine,
    input: R,
    output: W,
    verbose: bool,
) -> Result<ProcessStats> {
    let stats = if verbose {
        stream::process(machine, input, output, VerboseObserver)
    } else {
        stream::process(machine, input, output, crate::trace::NoopObserver)
    };
    Ok(stats?)
}

/// Read and parse a configuration file, detecting its format
pub fn load_config(path: &Path, format: Option<ConfigFormat>) -> Result<MachineConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("could not open {}", path.display()))?;

    let detection = detect_format(path, &contents, format);
    let config = match detection.format {
        ConfigFormat::Text => MachineConfig::parse(&contents),
        #[cfg(feature = "serialization")]
        ConfigFormat::Json => MachineConfig::from_json(&contents),
    };

    config.with_context(|| {
        format!(
            "Failed to parse {} configuration {} (format {})",
            detection.format,
            path.display(),
            detection.method
        )
    })
}

/// Serialize `config` in `format`
pub fn write_config<W: Write>(config: &MachineConfig, format: ConfigFormat, mut writer: W) -> Result<()> {
    match format {
        ConfigFormat::Text => write!(writer, "{}", config)?,
        #[cfg(feature = "serialization")]
        ConfigFormat::Json => writeln!(writer, "{}", config.to_json()?)?,
    }
    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
