//! Filesystem helpers shared across `cargo-l10n` modules.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::L10nError;

/// Opens a directory if it exists, returning `None` when the path is missing.
pub fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, L10nError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(L10nError::io(path)(err)),
    }
}

/// Reads a file if it exists, returning `None` when it or its directory is
/// missing.
pub fn read_optional(path: &Utf8Path) -> Result<Option<String>, L10nError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let Some(name) = path.file_name() else {
        return Ok(None);
    };
    let Some(dir) = open_optional_dir(parent)? else {
        return Ok(None);
    };
    match dir.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(L10nError::io(path)(err)),
    }
}
