//! Descriptor generation for a package directory tree.
//!
//! [`MetsGenerator`] walks the tree once, files before sub-directories and
//! each sorted by name. What happens to a directory is decided by
//! [`directory_kind`], what happens to a file inside a regular directory by
//! [`file_action`]. All state of one run lives in a `GenerationContext`, and
//! the descriptor is written only after it has been assembled completely.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};
use walkdir::{DirEntry, WalkDir};

use super::error::{MetsError, MetsResult};
use super::metadata::{MetadataClassifier, METADATA_FOLDER, REPRESENTATIONS_FOLDER};
use super::model::{
    new_id, Agent, Descriptor, FileGroup, Header, MetadataRecord, MetadataSection, Pointer,
    SchemaLocation,
};
use super::registrar::FileRegistrar;
use super::relation::parent_struct_map;
use super::serialize::write_descriptor;
use super::structmap::{DirectoryHandle, LogicalRole, StructMapBuilder};
use crate::classify::{classify_path, FolderRole};
use crate::config::PackageConfig;
use crate::inspect::{current_timestamp, relative_href};
use crate::profile::{Profile, DESCRIPTOR_FILENAME};

/// How the walk treats a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// The package root: no division, files ignored.
    PackageRoot,
    /// Top-level `representations`: no division, files ignored.
    RepresentationsContainer,
    /// `<root>/metadata`: classified by the metadata classifier.
    RootMetadata,
    /// Any other `metadata` directory: empty division, not descended.
    NestedMetadata,
    /// Everything else.
    Regular,
}

impl DirectoryKind {
    /// Whether the directory gets a physical division.
    pub fn has_division(&self) -> bool {
        !matches!(
            self,
            DirectoryKind::PackageRoot | DirectoryKind::RepresentationsContainer
        )
    }

    /// Whether the generic walk descends into the directory.
    pub fn descends(&self) -> bool {
        !matches!(
            self,
            DirectoryKind::RootMetadata | DirectoryKind::NestedMetadata
        )
    }
}

/// Kind of a directory, given its path relative to the package root.
pub fn directory_kind(relative: &Path) -> DirectoryKind {
    if relative.as_os_str().is_empty() {
        DirectoryKind::PackageRoot
    } else if relative == Path::new(REPRESENTATIONS_FOLDER) {
        DirectoryKind::RepresentationsContainer
    } else if relative == Path::new(METADATA_FOLDER) {
        DirectoryKind::RootMetadata
    } else if relative.file_name().and_then(|n| n.to_str()) == Some(METADATA_FOLDER) {
        DirectoryKind::NestedMetadata
    } else {
        DirectoryKind::Regular
    }
}

/// What the walk does with a file inside a regular directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Descriptor of a nested package: package pointer plus a physical-only
    /// file pointer; sub-directories are not descended.
    NestedDescriptor,
    /// Schema file: registered with a schema logical pointer.
    Schema,
    /// Content file: registered with a content logical pointer.
    Content,
}

impl FileAction {
    /// Logical role of the registered file, if any.
    pub fn logical_role(&self) -> Option<LogicalRole> {
        match self {
            FileAction::NestedDescriptor => None,
            FileAction::Schema => Some(LogicalRole::Schema),
            FileAction::Content => Some(LogicalRole::Content),
        }
    }
}

/// Action for `file_name` inside a directory named `dir_name`.
pub fn file_action(dir_name: Option<&str>, file_name: &str) -> FileAction {
    if file_name.eq_ignore_ascii_case(DESCRIPTOR_FILENAME) {
        FileAction::NestedDescriptor
    } else if dir_name == Some(FolderRole::Schemas.token()) {
        FileAction::Schema
    } else {
        FileAction::Content
    }
}

/// Walk order: files before directories, then by name.
pub(crate) fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Whether an entry is a symbolic link to a directory. Such links are
/// neither descended into nor registered as files.
pub(crate) fn is_directory_link(entry: &DirEntry) -> bool {
    entry.path_is_symlink() && entry.path().is_dir()
}

/// Why a file was left out of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No file group exists for the role of the file's directory.
    NoFileGroup(FolderRole),
    /// No metadata rule matched the file.
    UnclassifiedMetadata,
}

/// A file left out of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Written descriptor.
    pub output: PathBuf,
    /// Content files registered into file groups.
    pub files_registered: usize,
    /// Metadata files registered into metadata sections.
    pub metadata_registered: usize,
    /// Nested package descriptors pointed at.
    pub nested_packages: usize,
    /// Files left out.
    pub skipped: Vec<SkippedFile>,
}

/// An assembled, not yet written descriptor.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub descriptor: Descriptor,
    pub nested_packages: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Directory currently being walked.
struct CurrentDirectory {
    path: PathBuf,
    kind: DirectoryKind,
    division: Option<DirectoryHandle>,
    role: FolderRole,
}

/// Mutable state of one generation run.
struct GenerationContext<'a> {
    root: &'a Path,
    config: &'a PackageConfig,
    registrar: FileRegistrar<'a>,
    groups: Vec<FileGroup>,
    descriptive: Vec<MetadataRecord>,
    provenance: Vec<MetadataRecord>,
    structure: StructMapBuilder,
    skipped: Vec<SkippedFile>,
    nested_packages: usize,
}

impl<'a> GenerationContext<'a> {
    fn new(root: &'a Path, config: &'a PackageConfig, groups: Vec<FileGroup>) -> Self {
        Self {
            root,
            config,
            registrar: FileRegistrar::new(root),
            groups,
            descriptive: Vec::new(),
            provenance: Vec::new(),
            structure: StructMapBuilder::new(&config.package_id),
            skipped: Vec::new(),
            nested_packages: 0,
        }
    }

    /// Register a file into the group of `role`, or record the gap.
    fn register_file(&mut self, path: &Path, role: FolderRole) -> MetsResult<Option<String>> {
        let Some(group) = self.groups.iter_mut().find(|g| g.role == role) else {
            error!(
                path = %path.display(),
                role = %role,
                "No file group for folder role, file left out"
            );
            self.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: SkipReason::NoFileGroup(role),
            });
            return Ok(None);
        };
        self.registrar.register_file(path, group).map(Some)
    }

    fn register_metadata(&mut self, division: DirectoryHandle) -> MetsResult<()> {
        let plan = MetadataClassifier::new(self.root).classify()?;

        for file in plan.files {
            let entry = self
                .registrar
                .register_metadata(&file.path, file.section, file.md_type)?;
            self.structure
                .add_entry(division, Some(LogicalRole::Metadata), &entry.id);

            let record = MetadataRecord {
                section_id: new_id(),
                created: entry.facts.created.clone(),
                entry,
            };
            match file.section {
                MetadataSection::Descriptive => self.descriptive.push(record),
                MetadataSection::Provenance => self.provenance.push(record),
            }
        }

        for path in plan.unclassified {
            self.skipped.push(SkippedFile {
                path,
                reason: SkipReason::UnclassifiedMetadata,
            });
        }
        Ok(())
    }

    fn visit_file(&mut self, path: &Path, directory: &CurrentDirectory) -> MetsResult<()> {
        let Some(division) = directory.division else {
            return Ok(());
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir_name = directory.path.file_name().and_then(|n| n.to_str());
        let action = file_action(dir_name, &file_name);

        if action == FileAction::NestedDescriptor {
            let representation = dir_name.unwrap_or_default();
            let pointer = Pointer::Package {
                id: new_id(),
                href: relative_href(path, self.root),
                title: format!(
                    "Mets file describing representation: {} of {}: urn:uuid:{}.",
                    representation,
                    self.config.package_type,
                    self.config.package_id.trim_start_matches("urn:uuid:")
                ),
            };
            self.structure.add_nested_package(division, pointer);
            self.nested_packages += 1;
            debug!(descriptor = %path.display(), "Pointing at nested package descriptor");
        }

        if let Some(id) = self.register_file(path, directory.role)? {
            self.structure
                .add_entry(division, action.logical_role(), &id);
        }
        Ok(())
    }
}

/// Generates the descriptor of one package directory tree.
#[derive(Debug, Clone)]
pub struct MetsGenerator {
    root: PathBuf,
    profile: Profile,
}

impl MetsGenerator {
    /// Create a generator for a package root with the default profile.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            profile: Profile::default(),
        }
    }

    /// Use a different descriptor profile.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Package root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Profile in use.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Generate the descriptor and write it to the configured output.
    ///
    /// Nothing is written unless the whole tree was processed.
    ///
    /// # Errors
    ///
    /// Returns configuration errors before the walk starts, and I/O or
    /// serialization errors as they occur.
    pub fn generate(&self, config: &PackageConfig) -> MetsResult<GenerationReport> {
        let root = self.resolve_root()?;
        let assembly = self.assemble_at(&root, config)?;
        let output = config.output_in(&root, DESCRIPTOR_FILENAME);

        write_descriptor(&assembly.descriptor, &output)?;

        let report = GenerationReport {
            output,
            files_registered: assembly.descriptor.file_entries().count(),
            metadata_registered: assembly.descriptor.metadata_entries().count(),
            nested_packages: assembly.nested_packages,
            skipped: assembly.skipped,
        };

        info!(
            output = %report.output.display(),
            files = report.files_registered,
            metadata = report.metadata_registered,
            skipped = report.skipped.len(),
            "Generated descriptor"
        );
        Ok(report)
    }

    /// Assemble the descriptor without writing it.
    ///
    /// # Errors
    ///
    /// Same as [`generate`](Self::generate), minus write failures.
    pub fn assemble(&self, config: &PackageConfig) -> MetsResult<Assembly> {
        let root = self.resolve_root()?;
        self.assemble_at(&root, config)
    }

    fn resolve_root(&self) -> MetsResult<PathBuf> {
        if !self.root.is_dir() {
            return Err(MetsError::PackageRootNotFound(self.root.clone()));
        }
        fs::canonicalize(&self.root).map_err(|e| MetsError::ReadFailed {
            path: self.root.clone(),
            source: e,
        })
    }

    fn assemble_at(&self, root: &Path, config: &PackageConfig) -> MetsResult<Assembly> {
        config.validate()?;
        let schema_location = self.schema_location(root, config)?;
        let groups = self.file_groups(root)?;

        debug!(
            root = %root.display(),
            groups = groups.len(),
            package_type = %config.package_type,
            "Starting package walk"
        );

        let mut ctx = GenerationContext::new(root, config, groups);
        walk_package(&mut ctx)?;

        let GenerationContext {
            groups,
            descriptive,
            provenance,
            structure,
            skipped,
            nested_packages,
            ..
        } = ctx;

        let (physical, logical) = structure.finish(&config.package_type);
        let mut struct_maps = vec![physical, logical];
        if let Some(parent_id) = &config.parent_id {
            debug!(parent = %parent_id, "Linking to parent package");
            struct_maps.push(parent_struct_map(
                &config.package_id,
                &config.package_type,
                parent_id,
            ));
        }

        let descriptor = Descriptor {
            object_id: config.package_id.clone(),
            label: format!(
                "METS file describing the {} matching the OBJID.",
                config.package_type
            ),
            profile_url: self.profile.profile_url.clone(),
            content_category: self.profile.content_category.clone(),
            content_information_type: self.profile.content_information_type.clone(),
            file_use: self.profile.file_use.clone(),
            schema_location,
            header: self.header(config),
            descriptive,
            administrative_id: new_id(),
            provenance,
            file_section_id: new_id(),
            file_groups: groups,
            struct_maps,
        };

        Ok(Assembly {
            descriptor,
            nested_packages,
            skipped,
        })
    }

    fn header(&self, config: &PackageConfig) -> Header {
        let organization = &self.profile.organization;
        Header {
            created: current_timestamp(),
            record_status: "NEW".to_string(),
            package_type: config.package_type.clone(),
            agents: vec![
                Agent::software(
                    self.profile.software_name.clone(),
                    &self.profile.software_version,
                ),
                Agent::organization("ARCHIVIST", organization.clone()),
                Agent::organization("CREATOR", organization.clone()),
                Agent::organization("PRESERVATION", organization.clone()),
            ],
            document_id: DESCRIPTOR_FILENAME.to_string(),
        }
    }

    /// Dominant group for the role of the root path, then one group per
    /// recognised immediate subdirectory.
    fn file_groups(&self, root: &Path) -> MetsResult<Vec<FileGroup>> {
        let mut groups = vec![FileGroup::new(classify_path(root))];

        let children = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for child in children {
            let child = child.map_err(|e| MetsError::from_walk(e, root))?;
            if !child.file_type().is_dir() || is_directory_link(&child) {
                continue;
            }
            let role = child
                .file_name()
                .to_str()
                .and_then(FolderRole::from_folder_name);
            if let Some(role) = role {
                if groups.iter().all(|g| g.role != role) {
                    groups.push(FileGroup::new(role));
                }
            }
        }
        Ok(groups)
    }

    /// Schema locations from the schema folder, with profile defaults for
    /// schemas it does not contain.
    fn schema_location(&self, root: &Path, config: &PackageConfig) -> MetsResult<SchemaLocation> {
        let folder = config.schema_folder_in(root);
        let mut location = SchemaLocation {
            mets: self.profile.default_mets_schema_location.clone(),
            xlink: self.profile.default_xlink_schema_location.clone(),
            csip: self.profile.csip_schema_location.clone(),
        };

        if !folder.exists() {
            debug!(folder = %folder.display(), "Schema folder absent, using default locations");
            return Ok(location);
        }
        if !folder.is_dir() {
            return Err(MetsError::InvalidConfig(format!(
                "schema folder {} is not a directory",
                folder.display()
            )));
        }
        fs::read_dir(&folder).map_err(|e| MetsError::SchemaFolderUnreadable {
            path: folder.clone(),
            source: e,
        })?;

        let mets = folder.join(&self.profile.mets_schema_file);
        if mets.is_file() {
            location.mets = relative_href(&mets, root);
        }
        let xlink = folder.join(&self.profile.xlink_schema_file);
        if xlink.is_file() {
            location.xlink = relative_href(&xlink, root);
        }
        Ok(location)
    }
}

/// Walk the package tree, driving registration and the structural maps.
fn walk_package(ctx: &mut GenerationContext<'_>) -> MetsResult<()> {
    let root = ctx.root;
    let mut walker = WalkDir::new(root).sort_by(files_first).into_iter();
    let mut current: Option<CurrentDirectory> = None;
    let mut pruned: HashSet<PathBuf> = HashSet::new();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| MetsError::from_walk(e, root))?;
        let path = entry.path();

        if is_directory_link(&entry) {
            debug!(path = %path.display(), "Symbolic link to a directory, not followed");
            continue;
        }

        if entry.file_type().is_dir() {
            if path.parent().is_some_and(|parent| pruned.contains(parent)) {
                debug!(path = %path.display(), "Below a nested package, not descending");
                walker.skip_current_dir();
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            let kind = directory_kind(relative);
            let division = kind
                .has_division()
                .then(|| ctx.structure.open_directory(relative_href(path, root)));

            if !kind.descends() {
                if let (DirectoryKind::RootMetadata, Some(division)) = (kind, division) {
                    ctx.register_metadata(division)?;
                }
                walker.skip_current_dir();
                current = None;
                continue;
            }

            current = Some(CurrentDirectory {
                path: path.to_path_buf(),
                kind,
                division,
                role: classify_path(path),
            });
            continue;
        }

        let Some(directory) = current.as_ref() else {
            continue;
        };
        if directory.kind != DirectoryKind::Regular
            || path.parent() != Some(directory.path.as_path())
        {
            continue;
        }

        ctx.visit_file(path, directory)?;

        let is_descriptor = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(DESCRIPTOR_FILENAME));
        if is_descriptor {
            pruned.insert(directory.path.clone());
        }
    }
    Ok(())
}
