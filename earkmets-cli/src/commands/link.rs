//! `link` command.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use earkmets::mets::{Direction, LinkOutcome, RelationshipLinker};

use crate::error::CliError;

/// Relationship recorded in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Relation {
    Parent,
    Child,
}

impl From<Relation> for Direction {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Parent => Direction::Parent,
            Relation::Child => Direction::Child,
        }
    }
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Relationship to record
    #[arg(value_enum)]
    pub relation: Relation,

    /// Root of the package whose METS.xml is edited
    pub root: PathBuf,

    /// Identifier of the related package
    pub identifier: String,

    /// Package type used in labels
    #[arg(long = "type", value_name = "TYPE")]
    pub package_type: String,
}

pub fn run(args: LinkArgs) -> Result<(), CliError> {
    let linker = RelationshipLinker::new(&args.root, &args.package_type);
    let direction = Direction::from(args.relation);

    match linker.link(direction, &args.identifier)? {
        LinkOutcome::Linked { pointer_id } => {
            println!(
                "Linked {} {} in {} (pointer {})",
                direction,
                args.identifier,
                linker.descriptor().display(),
                pointer_id
            );
        }
        LinkOutcome::SiblingMissing => {
            println!(
                "No descriptor at {}; nothing linked",
                linker.descriptor().display()
            );
        }
    }
    Ok(())
}
