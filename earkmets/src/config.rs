//! Generation configuration.
//!
//! A [`PackageConfig`] carries the caller-supplied values of one generation
//! run. Values can come from code, from an INI file, or from the command line;
//! [`PackageSettings`] holds partial values from any of these sources and
//! merges them with a precedence order before validation.
//!
//! # INI format
//!
//! ```ini
//! [package]
//! id = urn:uuid:7d5d2e1f-0000-4000-8000-000000000001
//! type = AIP
//! schemas = schemas
//! parent = urn:uuid:7d5d2e1f-0000-4000-8000-000000000000
//! output = METS.xml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;

use crate::mets::{MetsError, MetsResult};

/// INI section holding package settings.
pub const PACKAGE_SECTION: &str = "package";

/// Schema folder used when none is configured, relative to the package root.
pub const DEFAULT_SCHEMA_FOLDER: &str = "schemas";

/// Validated configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    /// Root document identifier (`OBJID`), typically a URN.
    pub package_id: String,

    /// OAIS package type (e.g. `SIP`, `AIP`, `DIP`).
    pub package_type: String,

    /// Folder holding schema files. Relative paths are resolved against the
    /// package root.
    pub schema_folder: PathBuf,

    /// Identifier of the parent package, if any.
    pub parent_id: Option<String>,

    /// Output file. Defaults to `METS.xml` in the package root.
    pub output: Option<PathBuf>,
}

impl PackageConfig {
    /// Create a configuration with the required values.
    pub fn new(package_id: impl Into<String>, package_type: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            package_type: package_type.into(),
            schema_folder: PathBuf::from(DEFAULT_SCHEMA_FOLDER),
            parent_id: None,
            output: None,
        }
    }

    /// Set the schema folder.
    pub fn with_schema_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_folder = path.into();
        self
    }

    /// Set the parent package identifier. Blank identifiers are ignored.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        let parent_id = parent_id.into();
        self.parent_id = if parent_id.trim().is_empty() {
            None
        } else {
            Some(parent_id)
        };
        self
    }

    /// Set the output file.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Check required values.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::MissingOption`] for a blank identifier or type.
    pub fn validate(&self) -> MetsResult<()> {
        if self.package_id.trim().is_empty() {
            return Err(MetsError::MissingOption("package_id"));
        }
        if self.package_type.trim().is_empty() {
            return Err(MetsError::MissingOption("package_type"));
        }
        Ok(())
    }

    /// Schema folder resolved against a package root.
    pub fn schema_folder_in(&self, root: &Path) -> PathBuf {
        if self.schema_folder.is_absolute() {
            self.schema_folder.clone()
        } else {
            root.join(&self.schema_folder)
        }
    }

    /// Output file resolved against a package root.
    pub fn output_in(&self, root: &Path, descriptor_filename: &str) -> PathBuf {
        match &self.output {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join(descriptor_filename),
        }
    }
}

/// Partial package settings from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    pub package_id: Option<String>,
    pub package_type: Option<String>,
    pub schema_folder: Option<PathBuf>,
    pub parent_id: Option<String>,
    pub output: Option<PathBuf>,
}

impl PackageSettings {
    /// Load settings from an INI file.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`] if the file cannot be read and
    /// [`MetsError::InvalidConfig`] if it is not valid INI.
    pub fn load(path: &Path) -> MetsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| MetsError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_ini_str(&content)
    }

    /// Parse settings from INI text. A missing `[package]` section yields
    /// empty settings.
    pub fn from_ini_str(content: &str) -> MetsResult<Self> {
        let ini = Ini::load_from_str(content)
            .map_err(|e| MetsError::InvalidConfig(format!("invalid INI: {}", e)))?;

        let Some(section) = ini.section(Some(PACKAGE_SECTION)) else {
            return Ok(Self::default());
        };

        let value = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            package_id: value("id"),
            package_type: value("type"),
            schema_folder: value("schemas").map(PathBuf::from),
            parent_id: value("parent"),
            output: value("output").map(PathBuf::from),
        })
    }

    /// Fill unset values from a lower-precedence source.
    pub fn or(self, fallback: PackageSettings) -> Self {
        Self {
            package_id: self.package_id.or(fallback.package_id),
            package_type: self.package_type.or(fallback.package_type),
            schema_folder: self.schema_folder.or(fallback.schema_folder),
            parent_id: self.parent_id.or(fallback.parent_id),
            output: self.output.or(fallback.output),
        }
    }

    /// Build and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::MissingOption`] if the identifier or type is unset.
    pub fn build(self) -> MetsResult<PackageConfig> {
        let package_id = self
            .package_id
            .ok_or(MetsError::MissingOption("package_id"))?;
        let package_type = self
            .package_type
            .ok_or(MetsError::MissingOption("package_type"))?;

        let mut config = PackageConfig::new(package_id, package_type);
        if let Some(folder) = self.schema_folder {
            config = config.with_schema_folder(folder);
        }
        if let Some(parent) = self.parent_id {
            config = config.with_parent(parent);
        }
        if let Some(output) = self.output {
            config = config.with_output(output);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_values() {
        let config = PackageConfig::new("urn:uuid:1", "AIP");
        assert_eq!(config.schema_folder, PathBuf::from("schemas"));
        assert!(config.parent_id.is_none());
        assert!(config.output.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PackageConfig::new("urn:uuid:1", "SIP")
            .with_schema_folder("/opt/schemas")
            .with_parent("urn:uuid:parent")
            .with_output("out/METS.xml");

        assert_eq!(config.schema_folder, PathBuf::from("/opt/schemas"));
        assert_eq!(config.parent_id.as_deref(), Some("urn:uuid:parent"));
        assert_eq!(config.output, Some(PathBuf::from("out/METS.xml")));
    }

    #[test]
    fn test_blank_parent_is_none() {
        let config = PackageConfig::new("urn:uuid:1", "AIP").with_parent("  ");
        assert!(config.parent_id.is_none());
    }

    #[test]
    fn test_validate_missing_values() {
        let err = PackageConfig::new(" ", "AIP").validate().unwrap_err();
        assert!(matches!(err, MetsError::MissingOption("package_id")));

        let err = PackageConfig::new("urn:uuid:1", "").validate().unwrap_err();
        assert!(matches!(err, MetsError::MissingOption("package_type")));
    }

    #[test]
    fn test_paths_resolved_against_root() {
        let root = Path::new("/pkg");
        let config = PackageConfig::new("urn:uuid:1", "AIP");
        assert_eq!(config.schema_folder_in(root), PathBuf::from("/pkg/schemas"));
        assert_eq!(config.output_in(root, "METS.xml"), PathBuf::from("/pkg/METS.xml"));

        let config = config
            .with_schema_folder("/shared/schemas")
            .with_output("/tmp/out.xml");
        assert_eq!(config.schema_folder_in(root), PathBuf::from("/shared/schemas"));
        assert_eq!(config.output_in(root, "METS.xml"), PathBuf::from("/tmp/out.xml"));
    }

    #[test]
    fn test_settings_from_ini() {
        let settings = PackageSettings::from_ini_str(
            "[package]\nid = urn:uuid:abc\ntype = AIP\nschemas = xsd\nparent = \n",
        )
        .unwrap();

        assert_eq!(settings.package_id.as_deref(), Some("urn:uuid:abc"));
        assert_eq!(settings.package_type.as_deref(), Some("AIP"));
        assert_eq!(settings.schema_folder, Some(PathBuf::from("xsd")));
        assert!(settings.parent_id.is_none());
    }

    #[test]
    fn test_settings_without_section() {
        let settings = PackageSettings::from_ini_str("[other]\nkey = value\n").unwrap();
        assert_eq!(settings, PackageSettings::default());
    }

    #[test]
    fn test_settings_precedence() {
        let cli = PackageSettings {
            package_id: Some("urn:uuid:cli".to_string()),
            ..Default::default()
        };
        let file = PackageSettings {
            package_id: Some("urn:uuid:file".to_string()),
            package_type: Some("SIP".to_string()),
            ..Default::default()
        };

        let config = cli.or(file).build().unwrap();
        assert_eq!(config.package_id, "urn:uuid:cli");
        assert_eq!(config.package_type, "SIP");
    }

    #[test]
    fn test_build_missing_type() {
        let settings = PackageSettings {
            package_id: Some("urn:uuid:1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.build(),
            Err(MetsError::MissingOption("package_type"))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.ini");
        fs::write(&path, "[package]\nid = urn:uuid:f\ntype = DIP\n").unwrap();

        let config = PackageSettings::load(&path).unwrap().build().unwrap();
        assert_eq!(config.package_type, "DIP");
    }

    #[test]
    fn test_load_missing_file() {
        let result = PackageSettings::load(Path::new("/nonexistent/package.ini"));
        assert!(matches!(result, Err(MetsError::ReadFailed { .. })));
    }
}
