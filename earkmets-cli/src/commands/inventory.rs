//! `inventory` command.

use std::path::PathBuf;

use clap::Args;
use earkmets::inventory::{descriptor_object_id, find_descriptors, object_ids};
use tracing::warn;

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Directory to search
    pub base: PathBuf,

    /// Print each descriptor path next to its identifier
    #[arg(long)]
    pub paths: bool,
}

pub fn run(args: InventoryArgs) -> Result<(), CliError> {
    if !args.paths {
        for id in object_ids(&args.base)? {
            println!("{}", id);
        }
        return Ok(());
    }

    for path in find_descriptors(&args.base)? {
        match descriptor_object_id(&path) {
            Ok(id) => println!("{}\t{}", id, path.display()),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable descriptor"),
        }
    }
    Ok(())
}
