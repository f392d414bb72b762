//! Folder role classification.
//!
//! Information Packages follow a directory convention in which a handful of
//! folder names carry meaning. [`classify_path`] maps any path inside a
//! package to the role of its deepest recognised folder.

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use tracing::debug;

/// Semantic role of a folder, used as the `USE` attribute of file groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FolderRole {
    Documentation,
    Schemas,
    Representations,
    Data,
    Other,
}

impl FolderRole {
    /// Roles recognised in folder names (everything except `Other`).
    pub const RECOGNISED: [FolderRole; 4] = [
        FolderRole::Documentation,
        FolderRole::Schemas,
        FolderRole::Representations,
        FolderRole::Data,
    ];

    /// Token used in folder names and `USE` attributes.
    pub fn token(&self) -> &'static str {
        match self {
            FolderRole::Documentation => "documentation",
            FolderRole::Schemas => "schemas",
            FolderRole::Representations => "representations",
            FolderRole::Data => "data",
            FolderRole::Other => "other",
        }
    }

    /// Recognised role for an exact folder name.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::RECOGNISED
            .iter()
            .copied()
            .find(|role| role.token() == name)
    }
}

impl fmt::Display for FolderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FolderRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "other" => Ok(FolderRole::Other),
            _ => Self::from_folder_name(s).ok_or_else(|| format!("unknown folder role '{}'", s)),
        }
    }
}

/// Classify a path by its deepest recognised folder name.
///
/// Segments are scanned from the last to the first; the first one naming a
/// recognised role wins. Paths without one are [`FolderRole::Other`].
pub fn classify_path(path: &Path) -> FolderRole {
    for component in path.components().rev() {
        let Component::Normal(segment) = component else {
            continue;
        };
        match segment.to_str() {
            Some(name) => {
                if let Some(role) = FolderRole::from_folder_name(name) {
                    return role;
                }
            }
            None => debug!(path = %path.display(), "Skipping non UTF-8 path segment"),
        }
    }
    FolderRole::Other
}

/// Classify a `/`-separated path string.
pub fn classify_str(path: &str) -> FolderRole {
    path.rsplit('/')
        .find_map(FolderRole::from_folder_name)
        .unwrap_or(FolderRole::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deepest_segment_wins() {
        assert_eq!(
            classify_path(Path::new("/pkg/representations/rep1/data")),
            FolderRole::Data
        );
        assert_eq!(
            classify_path(Path::new("/pkg/data/representations")),
            FolderRole::Representations
        );
    }

    #[test]
    fn test_file_below_role_folder() {
        assert_eq!(
            classify_path(Path::new("pkg/documentation/manual/readme.txt")),
            FolderRole::Documentation
        );
        assert_eq!(classify_path(Path::new("schemas/mets.xsd")), FolderRole::Schemas);
    }

    #[test]
    fn test_unrecognised_is_other() {
        assert_eq!(classify_path(Path::new("/tmp/pkg/metadata")), FolderRole::Other);
        assert_eq!(classify_path(Path::new("")), FolderRole::Other);
        assert_eq!(classify_path(Path::new("/")), FolderRole::Other);
    }

    #[test]
    fn test_exact_segment_match_only() {
        assert_eq!(classify_path(Path::new("/pkg/mydata/x")), FolderRole::Other);
        assert_eq!(classify_path(Path::new("/pkg/Data/x")), FolderRole::Other);
    }

    #[test]
    fn test_classify_str() {
        assert_eq!(classify_str("representations/rep1/data"), FolderRole::Data);
        assert_eq!(classify_str("a/b/c"), FolderRole::Other);
        assert_eq!(classify_str(""), FolderRole::Other);
    }

    #[test]
    fn test_role_tokens_round_trip() {
        for role in FolderRole::RECOGNISED {
            assert_eq!(role.token().parse::<FolderRole>().unwrap(), role);
        }
        assert_eq!("other".parse::<FolderRole>().unwrap(), FolderRole::Other);
        assert!("metadata".parse::<FolderRole>().is_err());
    }

    #[test]
    fn test_display_matches_token() {
        assert_eq!(FolderRole::Representations.to_string(), "representations");
    }

    fn plain_segment() -> impl Strategy<Value = String> {
        "[a-z0-9_-]{1,12}".prop_filter("must not be a role token", |s| {
            FolderRole::from_folder_name(s).is_none() && s != "other"
        })
    }

    proptest! {
        #[test]
        fn prop_plain_paths_are_other(segments in prop::collection::vec(plain_segment(), 0..6)) {
            let path = segments.join("/");
            prop_assert_eq!(classify_path(Path::new(&path)), FolderRole::Other);
            prop_assert_eq!(classify_str(&path), FolderRole::Other);
        }

        #[test]
        fn prop_last_role_segment_wins(
            prefix in prop::collection::vec(plain_segment(), 0..4),
            first in 0usize..4,
            second in 0usize..4,
            suffix in prop::collection::vec(plain_segment(), 0..4),
        ) {
            let outer = FolderRole::RECOGNISED[first];
            let inner = FolderRole::RECOGNISED[second];
            let mut segments = prefix;
            segments.push(outer.token().to_string());
            segments.push(inner.token().to_string());
            segments.extend(suffix);
            let path = segments.join("/");

            prop_assert_eq!(classify_path(Path::new(&path)), inner);
            prop_assert_eq!(classify_str(&path), inner);
        }
    }
}
