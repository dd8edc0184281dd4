//! Manifest document I/O and text-level editing primitives.
//!
//! The manifest is treated as opaque text: edits are anchored on literal
//! section sentinels or regex capture groups, never on a parsed tree.
mod anchor;
mod ids;
mod records;
mod sections;

pub use anchor::{
    insert_after_pattern, insert_at_pattern, insert_at_sentinel, list_splice_pattern,
    AnchorWarning, ListKey,
};
pub(crate) use anchor::{record_pattern, splice_into_list};
pub use ids::{is_identifier, IdAllocator};
pub use records::{
    build_file_record, file_reference_record, framework_reference_record, group_record,
    list_entry, package_product_record, BuildPhase,
};
pub use sections::{scan_sections, SectionKind, SectionScan};

use crate::error::ManifestError;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read the whole manifest into memory.
pub fn load_document(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ManifestError::NotFound(path.to_path_buf())
        } else {
            ManifestError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Sibling path that holds the pre-mutation copy (`<path>.backup`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".backup");
    PathBuf::from(raw)
}

/// Copy the manifest to `<path>.backup`, replacing any earlier backup.
pub fn backup(path: &Path) -> Result<PathBuf, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }
    let dest = backup_path(path);
    fs::copy(path, &dest).map_err(|source| ManifestError::Backup {
        path: dest.clone(),
        source,
    })?;
    tracing::debug!(backup = %dest.display(), "wrote manifest backup");
    Ok(dest)
}

/// Replace the manifest through a temp file in the same directory, so a
/// failed write leaves the original intact.
///
/// Symlinks are followed and the existing file's permissions carry over to
/// the replacement.
pub fn write_document(path: &Path, content: &str) -> Result<(), ManifestError> {
    let write_err = |source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(err) if err.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(err) => return Err(write_err(err)),
    };
    let dir = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    match fs::metadata(&target) {
        Ok(meta) => tmp
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?,
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(write_err(err)),
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&target).map_err(|err| write_err(err.error))?;
    Ok(())
}
