use std::path::PathBuf;

/// Failures reading or persisting a manifest on disk.
///
/// Anchor mismatches are not errors; they are reported as
/// [`crate::manifest::AnchorWarning`] alongside the patched content.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest path does not exist.
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the manifest failed for a reason other than absence.
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the backup copy failed; the manifest was not touched.
    #[error("backup {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Replacing the manifest with patched content failed.
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
