//! Media type guessing from file extensions.

use std::path::Path;

use crate::profile::FALLBACK_MIME_TYPE;

/// Guess the media type of a file from its name.
///
/// Unknown extensions resolve to `application/octet-stream`.
pub fn guess_media_type(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(guess_media_type(Path::new("data/report.pdf")), "application/pdf");
        assert_eq!(guess_media_type(Path::new("a/b/photo.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(
            guess_media_type(Path::new("data/blob.unknownext")),
            FALLBACK_MIME_TYPE
        );
        assert_eq!(guess_media_type(Path::new("data/noext")), FALLBACK_MIME_TYPE);
    }
}
