//! kicad-expand - replicate plural components, pins and nets
//!
//! # Usage
//!
//! As a KiCad netlist exporter command:
//!
//! ```bash
//! kicad-expand netlist "%I" "%O.net"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use kicad_netlist_expand::{
    expand::is_plural, expand_name, read_netlist, transform, write_netlist, Error,
};
use tracing::{error, info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "kicad-expand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More logging, repeat for trace output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a KiCad netlist
    Netlist {
        /// Netlist exported by eeschema
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the expanded .net file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Write the output even if some pins or nets could not be expanded
        #[arg(long)]
        force: bool,
    },

    /// Print the expansion of names, one per line
    Names {
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn expand_netlist(input: &Path, output: &Path, force: bool) -> Result<ExitCode, Error> {
    let mut netlist = read_netlist(input)?;
    info!("read {}", input.display());

    let errors = match transform(&mut netlist) {
        Ok(()) => vec![],
        Err(errors) if errors.iter().any(|e| e.is_fatal()) => return Ok(ExitCode::FAILURE),
        Err(errors) => errors,
    };

    if !errors.is_empty() && !force {
        error!(
            "{} record(s) could not be expanded, not writing {}",
            errors.len(),
            output.display()
        );
        return Ok(ExitCode::FAILURE);
    }
    if !errors.is_empty() {
        warn!("{} record(s) could not be expanded", errors.len());
    }

    write_netlist(output, &netlist)?;
    info!("wrote {}", output.display());

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_names(names: &[String]) -> ExitCode {
    let mut status = ExitCode::SUCCESS;
    for name in names {
        match expand_name(name) {
            Ok(expanded) => {
                if !is_plural(name) {
                    warn!("{} is not plural", name);
                }
                for n in expanded {
                    println!("{}", n);
                }
            }
            Err(e) => {
                error!("{}", e);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match &cli.command {
        Command::Netlist {
            input,
            output,
            force,
        } => expand_netlist(input, output, *force),
        Command::Names { names } => Ok(print_names(names)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
