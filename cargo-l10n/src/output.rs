//! Output writers for `cargo-l10n`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use l10n_codegen::GeneratedFile;
use std::io::Write;

use crate::error::L10nError;

/// Writes every generated file into `out_dir`, creating it when missing.
/// Existing files are replaced.
///
/// # Errors
///
/// Returns [`L10nError::Io`] when the directory or a file cannot be written.
pub fn write_files(
    out_dir: &Utf8Path,
    files: &[GeneratedFile],
) -> Result<Vec<Utf8PathBuf>, L10nError> {
    let dir = ensure_dir(out_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for generated in files {
        let path = out_dir.join(&generated.name);
        let mut file = dir
            .open_with(
                &generated.name,
                OpenOptions::new().write(true).create(true).truncate(true),
            )
            .map_err(L10nError::io(path.clone()))?;
        file.write_all(generated.contents.as_bytes())
            .map_err(L10nError::io(path.clone()))?;
        tracing::info!(path = %path, bytes = generated.contents.len(), "wrote generated file");
        written.push(path);
    }
    Ok(written)
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, L10nError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(L10nError::io(path))?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(L10nError::io(path))
        }
        Err(open_err) => Err(L10nError::io(path)(open_err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use test_helpers::fs::DefinitionDir;

    fn file(name: &str, contents: &str) -> GeneratedFile {
        GeneratedFile {
            name: name.to_owned(),
            contents: contents.to_owned(),
        }
    }

    #[rstest]
    fn creates_missing_directories() -> Result<()> {
        let dir = DefinitionDir::new()?;
        let out = dir.path().join("out").join("nested");
        let written = write_files(&out, &[file("mod.rs", "mod en;\n"), file("en.rs", "")])?;
        ensure!(written == vec![out.join("mod.rs"), out.join("en.rs")]);
        ensure!(dir.read("out/nested/mod.rs")? == "mod en;\n");
        ensure!(dir.read("out/nested/en.rs")?.is_empty());
        Ok(())
    }

    #[rstest]
    fn replaces_existing_files() -> Result<()> {
        let dir = DefinitionDir::new()?;
        dir.write("out/mod.rs", "stale contents that are longer\n")?;
        write_files(&dir.path().join("out"), &[file("mod.rs", "mod en;\n")])?;
        ensure!(dir.read("out/mod.rs")? == "mod en;\n");
        Ok(())
    }
}
