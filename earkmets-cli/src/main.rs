//! earkmets CLI - Command-line interface
//!
//! Generates, links and inspects METS descriptors of archival Information
//! Packages using the `earkmets` library.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use earkmets::logging::{init_logging, LogConfig};

use commands::generate::GenerateArgs;
use commands::inspect::InspectArgs;
use commands::inventory::InventoryArgs;
use commands::link::LinkArgs;

#[derive(Debug, Parser)]
#[command(name = "earkmets", version, about = "METS descriptors for Information Packages")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the descriptor of a package directory
    Generate(GenerateArgs),
    /// Record a parent or child package in an existing descriptor
    Link(LinkArgs),
    /// Show identifier, type, schema location and files of a descriptor
    Inspect(InspectArgs),
    /// List the object identifiers of every descriptor below a directory
    Inventory(InventoryArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        verbosity: cli.verbose,
        log_file: cli.log_file.clone(),
    };
    let guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Link(args) => commands::link::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Inventory(args) => commands::inventory::run(args),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        // The file writer flushes on drop; exit skips destructors.
        drop(guard);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "earkmets", "-vv", "generate", "/pkg", "--id", "urn:uuid:1", "--type", "AIP",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.root, PathBuf::from("/pkg"));
        assert_eq!(args.package_type.as_deref(), Some("AIP"));
    }

    #[test]
    fn test_parse_link() {
        let cli = Cli::try_parse_from([
            "earkmets", "link", "child", "/pkg", "urn:uuid:c", "--type", "AIP",
        ])
        .unwrap();
        let Commands::Link(args) = cli.command else {
            panic!("expected link");
        };
        assert_eq!(args.identifier, "urn:uuid:c");
    }

    #[test]
    fn test_link_requires_type() {
        let result = Cli::try_parse_from(["earkmets", "link", "parent", "/pkg", "urn:uuid:p"]);
        assert!(result.is_err());
    }
}
