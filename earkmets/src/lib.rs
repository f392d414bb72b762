//! earkmets - METS descriptors for archival Information Packages
//!
//! This library walks an Information Package directory tree and produces a
//! METS descriptor following the E-ARK Common Specification for Information
//! Packages (CSIP). It also records parent/child relationships between
//! sibling packages and reads back the key facts of existing descriptors.
//!
//! # Example
//!
//! ```no_run
//! use earkmets::config::PackageConfig;
//! use earkmets::mets::MetsGenerator;
//!
//! let config = PackageConfig::new("urn:uuid:0b6e1c9a-5b1f-4c3e-9d7a-2f8e4a6b1c0d", "AIP");
//! let report = MetsGenerator::new("/archive/aip-0001").generate(&config)?;
//! println!("wrote {} ({} files)", report.output.display(), report.files_registered);
//! # Ok::<(), earkmets::mets::MetsError>(())
//! ```

pub mod classify;
pub mod config;
pub mod inspect;
pub mod inventory;
pub mod logging;
pub mod mets;
pub mod profile;
pub mod xml;
