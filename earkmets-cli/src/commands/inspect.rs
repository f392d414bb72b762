//! `inspect` command.

use std::path::PathBuf;

use clap::Args;
use earkmets::mets::{DescriptorReader, DescriptorSummary};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Descriptor file to read
    pub file: PathBuf,

    /// Package root that schema locations resolve against
    /// (default: the descriptor's directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InspectArgs) -> Result<(), CliError> {
    let summary = read_summary(&args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn read_summary(args: &InspectArgs) -> Result<DescriptorSummary, CliError> {
    let reader = match &args.root {
        Some(root) => {
            let mut reader = DescriptorReader::new(root);
            reader.load(&args.file)?;
            reader
        }
        None => DescriptorReader::open(&args.file)?,
    };
    Ok(reader.summary()?)
}

fn print_summary(summary: &DescriptorSummary) {
    println!("Object ID:       {}", summary.object_id);
    println!("Package type:    {}", summary.package_type);
    let schema_location = match summary.schema_location.as_str() {
        "" => "(none)",
        location => location,
    };
    println!("Schema location: {}", schema_location);
    println!("Files:           {}", summary.files.len());
    for file in &summary.files {
        println!(
            "  {}  {} {}  {}",
            file.id, file.checksum_algorithm, file.checksum, file.reference
        );
    }
}
