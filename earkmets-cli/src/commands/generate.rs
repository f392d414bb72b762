//! `generate` command.

use std::path::PathBuf;

use clap::Args;
use earkmets::config::{PackageConfig, PackageSettings};
use earkmets::mets::{GenerationReport, MetsGenerator, SkipReason};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Package root directory
    pub root: PathBuf,

    /// INI file with a [package] section
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package identifier (OBJID)
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Package type (SIP, AIP or DIP)
    #[arg(long = "type", value_name = "TYPE")]
    pub package_type: Option<String>,

    /// Schema folder, relative to the package root
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,

    /// Parent package identifier
    #[arg(long, value_name = "ID")]
    pub parent: Option<String>,

    /// Descriptor output file (default: <ROOT>/METS.xml)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    fn settings(&self) -> PackageSettings {
        PackageSettings {
            package_id: self.id.clone(),
            package_type: self.package_type.clone(),
            schema_folder: self.schemas.clone(),
            parent_id: self.parent.clone(),
            output: self.output.clone(),
        }
    }
}

/// Merge command-line options with the optional settings file.
pub fn resolve_config(args: &GenerateArgs) -> Result<PackageConfig, CliError> {
    let file = match &args.config {
        Some(path) => PackageSettings::load(path)?,
        None => PackageSettings::default(),
    };

    // CLI takes precedence, then config
    Ok(args.settings().or(file).build()?)
}

pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    let report = MetsGenerator::new(&args.root).generate(&config)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!("Descriptor written: {}", report.output.display());
    println!("  Files:           {}", report.files_registered);
    println!("  Metadata files:  {}", report.metadata_registered);
    println!("  Nested packages: {}", report.nested_packages);

    if report.skipped.is_empty() {
        return;
    }
    println!();
    println!("Skipped {} file(s):", report.skipped.len());
    for skipped in &report.skipped {
        println!(
            "  {} ({})",
            skipped.path.display(),
            describe_skip(&skipped.reason)
        );
    }
}

fn describe_skip(reason: &SkipReason) -> String {
    match reason {
        SkipReason::NoFileGroup(role) => format!("no file group for {}", role),
        SkipReason::UnclassifiedMetadata => "unclassified metadata".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(root: &str) -> GenerateArgs {
        GenerateArgs {
            root: PathBuf::from(root),
            config: None,
            id: None,
            package_type: None,
            schemas: None,
            parent: None,
            output: None,
        }
    }

    #[test]
    fn test_cli_overrides_settings_file() {
        let temp = TempDir::new().unwrap();
        let ini = temp.path().join("package.ini");
        fs::write(
            &ini,
            "[package]\nid = urn:uuid:file\ntype = SIP\nparent = urn:uuid:p\n",
        )
        .unwrap();

        let mut args = args("/pkg");
        args.config = Some(ini);
        args.package_type = Some("AIP".to_string());

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.package_id, "urn:uuid:file");
        assert_eq!(config.package_type, "AIP");
        assert_eq!(config.parent_id.as_deref(), Some("urn:uuid:p"));
    }

    #[test]
    fn test_missing_type_is_config_error() {
        let mut args = args("/pkg");
        args.id = Some("urn:uuid:x".to_string());
        assert!(matches!(resolve_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_run_writes_descriptor() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("data")).unwrap();
        fs::write(temp.path().join("data/a.txt"), "a").unwrap();

        let mut args = args("");
        args.root = temp.path().to_path_buf();
        args.id = Some("urn:uuid:cli".to_string());
        args.package_type = Some("AIP".to_string());

        run(args).unwrap();
        assert!(temp.path().join("METS.xml").exists());
    }
}
