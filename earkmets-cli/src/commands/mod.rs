//! CLI subcommands.

pub mod generate;
pub mod inspect;
pub mod inventory;
pub mod link;
