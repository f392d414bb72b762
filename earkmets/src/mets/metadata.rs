//! Classification of the package metadata folder.
//!
//! Only `<root>/metadata` is classified; every sub-folder is either
//! migration-scoped (its name matches [`MIGRATION_PATTERN`]) or regular.
//! Which section a file lands in is decided by [`MetadataScope::section_for`],
//! a lookup over a fixed rule table:
//!
//! | Scope     | Folder name    | Section     |
//! |-----------|----------------|-------------|
//! | migration | `descriptive`  | descriptive |
//! | migration | `preservation` | provenance  |
//! | regular   | `descriptive`  | descriptive |
//! | regular   | `preservation` | provenance  |
//! | regular   | `conduit`      | provenance  |
//!
//! For migration folders the folder name is the file's containing directory,
//! for regular folders it is the sub-folder itself.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use super::error::{MetsError, MetsResult};
use super::generator::{files_first, is_directory_link};
use super::model::{MetadataSection, MetadataType};
use crate::profile::DESCRIPTOR_FILENAME;

/// Folder name pattern of migration-scoped metadata.
pub const MIGRATION_PATTERN: &str = "*_mig-*";

/// Name of the package metadata folder.
pub const METADATA_FOLDER: &str = "metadata";

/// Name of the representations folder.
pub const REPRESENTATIONS_FOLDER: &str = "representations";

/// Kind of a metadata sub-folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataScope {
    /// Metadata of a migrated representation.
    Migration,
    /// Package-level metadata.
    Regular,
}

const SECTION_RULES: &[(MetadataScope, &str, MetadataSection)] = &[
    (MetadataScope::Migration, "descriptive", MetadataSection::Descriptive),
    (MetadataScope::Migration, "preservation", MetadataSection::Provenance),
    (MetadataScope::Regular, "descriptive", MetadataSection::Descriptive),
    (MetadataScope::Regular, "preservation", MetadataSection::Provenance),
    (MetadataScope::Regular, "conduit", MetadataSection::Provenance),
];

fn migration_pattern() -> &'static Pattern {
    static PATTERN: OnceLock<Pattern> = OnceLock::new();
    PATTERN.get_or_init(|| Pattern::new(MIGRATION_PATTERN).unwrap())
}

impl MetadataScope {
    /// Scope of a metadata sub-folder.
    pub fn of_folder(name: &str) -> Self {
        if migration_pattern().matches(name) {
            MetadataScope::Migration
        } else {
            MetadataScope::Regular
        }
    }

    /// Section for a classifying folder name, if the rules know it.
    pub fn section_for(self, folder: &str) -> Option<MetadataSection> {
        SECTION_RULES
            .iter()
            .find(|(scope, name, _)| *scope == self && *name == folder)
            .map(|(_, _, section)| *section)
    }
}

/// A metadata file with its section and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMetadata {
    pub path: PathBuf,
    pub section: MetadataSection,
    pub md_type: MetadataType,
}

/// Result of classifying the metadata folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPlan {
    /// Files to register, in walk order.
    pub files: Vec<ClassifiedMetadata>,

    /// Files no rule matched.
    pub unclassified: Vec<PathBuf>,
}

/// Classifies `<root>/metadata`.
#[derive(Debug, Clone, Copy)]
pub struct MetadataClassifier<'a> {
    root: &'a Path,
}

impl<'a> MetadataClassifier<'a> {
    /// Create a classifier for a package root.
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// The metadata folder of the package.
    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_FOLDER)
    }

    /// Classify every file below the metadata sub-folders.
    ///
    /// Files directly inside the metadata folder are not considered. A
    /// migration folder is skipped when the migrated representation already
    /// has its own descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`] if a folder cannot be listed.
    pub fn classify(&self) -> MetsResult<MetadataPlan> {
        let metadata_dir = self.metadata_dir();
        let mut plan = MetadataPlan::default();
        if !metadata_dir.is_dir() {
            return Ok(plan);
        }

        let folders = WalkDir::new(&metadata_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for folder in folders {
            let folder = folder.map_err(|e| MetsError::from_walk(e, &metadata_dir))?;
            if !folder.file_type().is_dir() || is_directory_link(&folder) {
                continue;
            }
            let Some(name) = folder.file_name().to_str() else {
                debug!(path = %folder.path().display(), "Skipping non UTF-8 metadata folder");
                continue;
            };

            let scope = MetadataScope::of_folder(name);
            if scope == MetadataScope::Migration && self.has_own_descriptor(name) {
                debug!(folder = name, "Migrated representation has its own descriptor, skipping");
                continue;
            }

            self.classify_folder(folder.path(), name, scope, &mut plan)?;
        }

        Ok(plan)
    }

    fn has_own_descriptor(&self, representation: &str) -> bool {
        self.root
            .join(REPRESENTATIONS_FOLDER)
            .join(representation)
            .join(DESCRIPTOR_FILENAME)
            .is_file()
    }

    fn classify_folder(
        &self,
        folder: &Path,
        name: &str,
        scope: MetadataScope,
        plan: &mut MetadataPlan,
    ) -> MetsResult<()> {
        for entry in WalkDir::new(folder).sort_by(files_first) {
            let entry = entry.map_err(|e| MetsError::from_walk(e, folder))?;
            let path = entry.path();
            if entry.file_type().is_dir() {
                continue;
            }
            if is_directory_link(&entry) {
                debug!(path = %path.display(), "Symbolic link to a directory, not followed");
                continue;
            }

            let classifying = match scope {
                MetadataScope::Migration => path
                    .parent()
                    .and_then(Path::file_name)
                    .and_then(|n| n.to_str())
                    .unwrap_or_default(),
                MetadataScope::Regular => name,
            };

            let Some(section) = scope.section_for(classifying) else {
                debug!(path = %path.display(), folder = classifying, "Unclassified metadata file");
                plan.unclassified.push(path.to_path_buf());
                continue;
            };

            let md_type = match section {
                MetadataSection::Descriptive => MetadataType::Other,
                MetadataSection::Provenance => MetadataType::for_provenance_file(
                    &entry.file_name().to_string_lossy(),
                ),
            };

            plan.files.push(ClassifiedMetadata {
                path: path.to_path_buf(),
                section,
                md_type,
            });
        }
        Ok(())
    }
}
